//! Vocabulary stores.
//!
//! A store owns the authoritative set of sensitive words and publishes every
//! mutation on two event feeds, one for additions and one for removals. A
//! [`Bridge`](crate::Bridge) consumes the feeds and applies them to a filter.
//!
//! Each feed is FIFO, but nothing orders the two feeds relative to each
//! other: an add and a remove of the same word that are both in flight may
//! reach the filter in either order, and the last one applied wins.

use crossbeam_channel::Receiver;

use crate::error::Result;

mod memory;

pub use memory::MemoryStore;

/// The pair of event feeds handed to a bridge.
#[derive(Debug)]
pub struct VocabularyFeeds {
    /// Words added to the store
    pub added: Receiver<String>,
    /// Words removed from the store
    pub removed: Receiver<String>,
}

/// Store collaborator contract consumed by the bridge.
pub trait Store: Send + Sync {
    /// Add a word and publish it on the add feed.
    fn add_word(&self, word: &str) -> Result<()>;

    /// Remove a word and publish it on the remove feed.
    fn del_word(&self, word: &str) -> Result<()>;

    /// Add several words, stopping at the first error.
    fn add_words<I, S>(&self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        for word in words {
            self.add_word(word.as_ref())?;
        }
        Ok(())
    }

    /// Remove several words, stopping at the first error.
    fn del_words<I, S>(&self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        for word in words {
            self.del_word(word.as_ref())?;
        }
        Ok(())
    }

    /// Snapshot of the current contents, in no particular order.
    fn read_words(&self) -> Vec<String>;

    /// Snapshot of the current contents as a channel that ends after the
    /// last word.
    fn read_iter(&self) -> Receiver<String> {
        let words = self.read_words();
        let (tx, rx) = crossbeam_channel::bounded(words.len().max(1));
        for word in words {
            // capacity covers every word, and rx is alive
            let _ = tx.send(word);
        }
        rx
    }

    /// Hand over the event feeds. Feeds can only be taken once.
    fn take_feeds(&self) -> Result<VocabularyFeeds>;

    fn contains(&self, word: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
