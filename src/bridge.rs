//! Vocabulary bridge.
//!
//! Keeps a filter in sync with a store: seeds the filter with the store's
//! current contents, then applies every add/remove event from the store's
//! feeds on two background listeners (one per feed). Listeners block on an
//! empty feed and exit once the feed is closed, i.e. when the store is
//! dropped.
//!
//! The bridge applies edits through the filter's own synchronization, so
//! queries stay valid while it runs. Feed capacity and the full-feed policy
//! belong to the store ([`StoreOptions`](crate::StoreOptions)).

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;

use crate::error::Result;
use crate::filter::Filter;
use crate::store::{Store, VocabularyFeeds};
use crate::types::WordEvent;

#[cfg(feature = "async")]
use tokio::task;

fn apply<F: Filter + ?Sized>(filter: &F, event: WordEvent) {
    match event {
        WordEvent::Added(word) => {
            tracing::debug!(word = %word, "applying vocabulary add");
            filter.add_word(&word);
        }
        WordEvent::Removed(word) => {
            tracing::debug!(word = %word, "applying vocabulary removal");
            filter.del_word(&word);
        }
    }
}

fn listen<F: Filter + ?Sized>(feed: Receiver<String>, filter: &F, event: fn(String) -> WordEvent) {
    for word in feed.iter() {
        apply(filter, event(word));
    }
    tracing::debug!("vocabulary feed closed, listener exiting");
}

/// Take the store's feeds and seed the filter before any event is applied.
fn attach<S, F>(store: &S, filter: &F) -> Result<VocabularyFeeds>
where
    S: Store + ?Sized,
    F: Filter,
{
    let feeds = store.take_feeds()?;
    let seed = store.read_words();
    tracing::debug!(words = seed.len(), "seeding filter from store");
    filter.add_words(seed);
    Ok(feeds)
}

/// Bridge running its listeners on dedicated threads.
///
/// ```
/// use std::sync::Arc;
/// use sensitive_word_r::{Bridge, Filter, MemoryStore, Store, TrieFilter};
///
/// let store = MemoryStore::new();
/// store.add_word("gun").unwrap();
///
/// let filter = Arc::new(TrieFilter::new());
/// let bridge = Bridge::spawn(&store, Arc::clone(&filter)).unwrap();
/// assert!(filter.is_sensitive("a gun"));
///
/// drop(store);
/// bridge.join();
/// ```
#[derive(Debug)]
pub struct Bridge {
    added: JoinHandle<()>,
    removed: JoinHandle<()>,
}

impl Bridge {
    /// Seed `filter` from `store` and start listening to its feeds.
    pub fn spawn<S, F>(store: &S, filter: Arc<F>) -> Result<Self>
    where
        S: Store + ?Sized,
        F: Filter + 'static,
    {
        let feeds = attach(store, filter.as_ref())?;

        let add_filter = Arc::clone(&filter);
        let added = thread::Builder::new()
            .name("vocab-add".into())
            .spawn(move || listen(feeds.added, add_filter.as_ref(), WordEvent::Added))?;
        let removed = thread::Builder::new()
            .name("vocab-del".into())
            .spawn(move || listen(feeds.removed, filter.as_ref(), WordEvent::Removed))?;

        Ok(Self { added, removed })
    }

    /// Wait for both listeners to exit.
    pub fn join(self) {
        for (name, handle) in [("add", self.added), ("del", self.removed)] {
            if handle.join().is_err() {
                tracing::warn!(listener = name, "vocabulary listener panicked");
            }
        }
    }
}

/// Bridge running its listeners on tokio's blocking pool.
///
/// Must be spawned from within a tokio runtime.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncBridge {
    added: task::JoinHandle<()>,
    removed: task::JoinHandle<()>,
}

#[cfg(feature = "async")]
impl AsyncBridge {
    /// Seed `filter` from `store` and start listening to its feeds.
    pub fn spawn<S, F>(store: &S, filter: Arc<F>) -> Result<Self>
    where
        S: Store + ?Sized,
        F: Filter + 'static,
    {
        let feeds = attach(store, filter.as_ref())?;

        let add_filter = Arc::clone(&filter);
        let added = task::spawn_blocking(move || {
            listen(feeds.added, add_filter.as_ref(), WordEvent::Added)
        });
        let removed = task::spawn_blocking(move || {
            listen(feeds.removed, filter.as_ref(), WordEvent::Removed)
        });

        Ok(Self { added, removed })
    }

    /// Wait for both listeners to exit.
    pub async fn join(self) {
        for (name, handle) in [("add", self.added), ("del", self.removed)] {
            if handle.await.is_err() {
                tracing::warn!(listener = name, "vocabulary listener panicked");
            }
        }
    }
}
