use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::{Mutex, RwLock};

use super::{Store, VocabularyFeeds};
use crate::error::{Result, SensitiveError};
use crate::options::{FeedPolicy, StoreOptions};

/// In-memory vocabulary store.
///
/// Feeds are bounded (see [`StoreOptions`]). Until the feeds are taken,
/// mutations only update the set: a bridge seeds its filter from
/// [`Store::read_words`] right after taking the feeds, so no event is lost and
/// no producer blocks on a feed nobody reads. Dropping the store closes both
/// feeds, which stops any listening bridge.
#[derive(Debug)]
pub struct MemoryStore {
    words: RwLock<HashSet<String>>,
    added_tx: Sender<String>,
    removed_tx: Sender<String>,
    feeds: Mutex<Option<VocabularyFeeds>>,
    attached: AtomicBool,
    policy: FeedPolicy,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::build(&StoreOptions::default())
    }
}

impl MemoryStore {
    /// Create an empty store with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given options
    pub fn with_options(options: StoreOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(&options))
    }

    fn build(options: &StoreOptions) -> Self {
        let (added_tx, added) = crossbeam_channel::bounded(options.capacity);
        let (removed_tx, removed) = crossbeam_channel::bounded(options.capacity);
        Self {
            words: RwLock::new(HashSet::new()),
            added_tx,
            removed_tx,
            feeds: Mutex::new(Some(VocabularyFeeds { added, removed })),
            attached: AtomicBool::new(false),
            policy: options.policy,
        }
    }

    pub fn policy(&self) -> FeedPolicy {
        self.policy
    }

    fn publish(&self, tx: &Sender<String>, word: &str) -> Result<()> {
        if !self.attached.load(Ordering::Acquire) {
            return Ok(());
        }
        match self.policy {
            FeedPolicy::Block => tx
                .send(word.to_string())
                .map_err(|_| SensitiveError::FeedClosed),
            FeedPolicy::Reject => match tx.try_send(word.to_string()) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(word)) => {
                    tracing::warn!(word = %word, "vocabulary feed full, event rejected");
                    Err(SensitiveError::FeedFull { word })
                }
                Err(TrySendError::Disconnected(_)) => Err(SensitiveError::FeedClosed),
            },
        }
    }
}

impl Store for MemoryStore {
    fn add_word(&self, word: &str) -> Result<()> {
        if word.is_empty() {
            return Ok(());
        }
        if !self.words.write().insert(word.to_string()) {
            return Ok(());
        }
        self.publish(&self.added_tx, word)
    }

    fn del_word(&self, word: &str) -> Result<()> {
        if !self.words.write().remove(word) {
            return Ok(());
        }
        self.publish(&self.removed_tx, word)
    }

    fn read_words(&self) -> Vec<String> {
        self.words.read().iter().cloned().collect()
    }

    fn take_feeds(&self) -> Result<VocabularyFeeds> {
        let mut feeds = self.feeds.lock();
        let taken = feeds.take().ok_or(SensitiveError::FeedsTaken)?;
        self.attached.store(true, Ordering::Release);
        Ok(taken)
    }

    fn contains(&self, word: &str) -> bool {
        self.words.read().contains(word)
    }

    fn len(&self) -> usize {
        self.words.read().len()
    }
}
