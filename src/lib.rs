//! Sensitive Word Filter - multi-pattern sensitive word detection for Rust
//!
//! This library detects, counts, masks and strips occurrences of a mutable
//! vocabulary of sensitive words inside arbitrary text:
//! - Exact, character-by-character matching over any Unicode text
//! - Two interchangeable matchers: restart-scan trie and Aho-Corasick
//! - Vocabulary edits at runtime, while queries keep running
//! - Store-to-filter synchronization through bounded event feeds
//!
//! # Example
//!
//! ```rust
//! use sensitive_word_r::{Filter, FilterKind, SensitiveFilter};
//!
//! let filter = SensitiveFilter::new(FilterKind::AhoCorasick);
//! filter.add_words(["gun", "gunpowder"]);
//!
//! let text = "a gunpowder keg";
//! assert!(filter.is_sensitive(text));
//! assert_eq!(filter.find_all(text), vec!["gun", "gunpowder"]);
//! assert_eq!(filter.replace(text, '*'), "a ********* keg");
//! assert_eq!(filter.remove(text), "a  keg");
//! ```
//!
//! # Operations
//!
//! | Operation | Result |
//! |-----------|--------|
//! | `is_sensitive` | Whether any word occurs |
//! | `find_one` | One matched word (policy differs per matcher) |
//! | `find_all` | Distinct matched words, first-seen order |
//! | `find_all_count` | Occurrences per matched word |
//! | `find_matches` | Every match span, as character indices |
//! | `replace` | Every matched character overwritten |
//! | `remove` | Every matched span deleted |
//!
//! # Matchers
//!
//! - [`TrieFilter`]: no build step, hard-deletes unused branches, O(n·m) scan.
//!   `find_one` returns the first word the scan completes.
//! - [`AcFilter`]: O(n) scan, rebuilds its automaton after edits, keeps the
//!   nodes of deleted words. `find_one` returns the longest word ending at
//!   the first position where any word ends.

pub mod bridge;
pub mod error;
pub mod filter;
pub mod options;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use bridge::Bridge;
#[cfg(feature = "async")]
pub use bridge::AsyncBridge;
pub use error::{Result, SensitiveError};
pub use filter::{AcFilter, Filter, SensitiveFilter, TrieFilter};
pub use options::{
    FeedPolicy, FilterKind, FilterOptions, RebuildPolicy, StoreOptions, DEFAULT_FEED_CAPACITY,
};
pub use store::{MemoryStore, Store, VocabularyFeeds};
pub use types::{Match, WordEvent};
