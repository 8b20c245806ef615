//! Sensitive word matchers.
//!
//! Two interchangeable implementations of the [`Filter`] contract:
//! - [`TrieFilter`]: character trie scanned with explicit restarts
//! - [`AcFilter`]: Aho-Corasick automaton with failure links
//!
//! Both accept vocabulary edits through `&self` so a single instance can be
//! shared between a [`Bridge`](crate::Bridge) and query callers.

use std::collections::{HashMap, HashSet};

mod automaton;
mod index;
mod trie;

pub use automaton::AcFilter;
pub use trie::TrieFilter;

use crate::options::{FilterKind, FilterOptions};
use crate::types::Match;

/// Matching contract shared by every matcher.
pub trait Filter: Send + Sync {
    /// Insert a word. Empty words are ignored, duplicates are idempotent.
    fn add_word(&self, word: &str);

    /// Remove a word. Absent words are ignored.
    fn del_word(&self, word: &str);

    /// Insert several words.
    fn add_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        for word in words {
            self.add_word(word.as_ref());
        }
    }

    /// Remove several words.
    fn del_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        for word in words {
            self.del_word(word.as_ref());
        }
    }

    /// Number of words currently present.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every match span found by a full scan, in discovery order.
    fn find_matches(&self, text: &str) -> Vec<Match>;

    /// The first word found, or `None`. Tie-break policy is matcher specific.
    fn find_one(&self, text: &str) -> Option<String>;

    fn is_sensitive(&self, text: &str) -> bool {
        self.find_one(text).is_some()
    }

    /// Distinct matched words in first-seen order.
    fn find_all(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.find_matches(text)
            .into_iter()
            .filter(|m| seen.insert(m.word.clone()))
            .map(|m| m.word)
            .collect()
    }

    /// Occurrences of each matched word.
    fn find_all_count(&self, text: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for m in self.find_matches(text) {
            *counts.entry(m.word).or_insert(0) += 1;
        }
        counts
    }

    /// Overwrite every matched character with `repl`. Output length in
    /// characters always equals the input's.
    fn replace(&self, text: &str, repl: char) -> String {
        let mask = span_mask(text, &self.find_matches(text));
        text.chars()
            .zip(mask)
            .map(|(c, hit)| if hit { repl } else { c })
            .collect()
    }

    /// Delete every character covered by a match, keeping the rest in order.
    fn remove(&self, text: &str) -> String {
        let mask = span_mask(text, &self.find_matches(text));
        text.chars()
            .zip(mask)
            .filter_map(|(c, hit)| (!hit).then_some(c))
            .collect()
    }
}

/// Union of all match spans as a per-character mask.
fn span_mask(text: &str, matches: &[Match]) -> Vec<bool> {
    let mut mask = vec![false; text.chars().count()];
    for m in matches {
        for hit in &mut mask[m.start..=m.end] {
            *hit = true;
        }
    }
    mask
}

/// Enum wrapper over both matcher variants
#[derive(Debug)]
pub enum SensitiveFilter {
    Trie(TrieFilter),
    AhoCorasick(AcFilter),
}

impl SensitiveFilter {
    /// Create an empty filter of the given kind
    pub fn new(kind: FilterKind) -> Self {
        Self::from_options(&FilterOptions::new().with_kind(kind))
    }

    /// Create an empty filter from options
    pub fn from_options(options: &FilterOptions) -> Self {
        match options.kind {
            FilterKind::Trie => SensitiveFilter::Trie(TrieFilter::new()),
            FilterKind::AhoCorasick => {
                SensitiveFilter::AhoCorasick(AcFilter::with_policy(options.rebuild))
            }
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            SensitiveFilter::Trie(_) => FilterKind::Trie,
            SensitiveFilter::AhoCorasick(_) => FilterKind::AhoCorasick,
        }
    }
}

impl Filter for SensitiveFilter {
    fn add_word(&self, word: &str) {
        match self {
            SensitiveFilter::Trie(f) => f.add_word(word),
            SensitiveFilter::AhoCorasick(f) => f.add_word(word),
        }
    }

    fn del_word(&self, word: &str) {
        match self {
            SensitiveFilter::Trie(f) => f.del_word(word),
            SensitiveFilter::AhoCorasick(f) => f.del_word(word),
        }
    }

    fn add_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self {
            SensitiveFilter::Trie(f) => f.add_words(words),
            SensitiveFilter::AhoCorasick(f) => f.add_words(words),
        }
    }

    fn del_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self {
            SensitiveFilter::Trie(f) => f.del_words(words),
            SensitiveFilter::AhoCorasick(f) => f.del_words(words),
        }
    }

    fn len(&self) -> usize {
        match self {
            SensitiveFilter::Trie(f) => f.len(),
            SensitiveFilter::AhoCorasick(f) => f.len(),
        }
    }

    fn find_matches(&self, text: &str) -> Vec<Match> {
        match self {
            SensitiveFilter::Trie(f) => f.find_matches(text),
            SensitiveFilter::AhoCorasick(f) => f.find_matches(text),
        }
    }

    fn find_one(&self, text: &str) -> Option<String> {
        match self {
            SensitiveFilter::Trie(f) => f.find_one(text),
            SensitiveFilter::AhoCorasick(f) => f.find_one(text),
        }
    }

    fn remove(&self, text: &str) -> String {
        match self {
            SensitiveFilter::Trie(f) => f.remove(text),
            SensitiveFilter::AhoCorasick(f) => f.remove(text),
        }
    }
}
