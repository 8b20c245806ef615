use serde::{Deserialize, Serialize};

/// A single match found while scanning text.
///
/// `start` and `end` are character (not byte) indices into the scanned text,
/// both inclusive, so `end` is the index of the last character of the match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// The matched word
    pub word: String,
    /// Index of the first matched character
    pub start: usize,
    /// Index of the last matched character
    pub end: usize,
}

impl Match {
    /// Create a new match
    pub fn new(word: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    /// Number of characters covered by the match
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    /// A match always covers at least one character
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Vocabulary mutation delivered through a store's event feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordEvent {
    Added(String),
    Removed(String),
}

impl WordEvent {
    /// The word carried by the event
    pub fn word(&self) -> &str {
        match self {
            WordEvent::Added(w) | WordEvent::Removed(w) => w,
        }
    }
}
