//! Filter and store configuration.
//!
//! Both option structs deserialize from JSON with every field optional:
//!
//! ```
//! use sensitive_word_r::{FilterKind, FilterOptions, RebuildPolicy};
//!
//! let opts = FilterOptions::from_json(r#"{"kind": "aho_corasick"}"#).unwrap();
//! assert_eq!(opts.kind, FilterKind::AhoCorasick);
//! assert_eq!(opts.rebuild, RebuildPolicy::Lazy);
//! ```

use serde::Deserialize;

use crate::error::{Result, SensitiveError};

/// Default capacity of each vocabulary event feed
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

/// Matching strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Character trie with restart scanning
    #[default]
    Trie,
    /// Aho-Corasick automaton with failure links
    AhoCorasick,
}

/// When the Aho-Corasick automaton is rebuilt after a structural edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildPolicy {
    /// Mark dirty, rebuild on the next query (amortizes bursts of edits)
    #[default]
    Lazy,
    /// Rebuild inside every edit
    Eager,
}

/// What a store does when an event feed is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPolicy {
    /// Block the mutating caller until the listener catches up
    #[default]
    Block,
    /// Keep the mutation in the store but refuse the event with `FeedFull`
    Reject,
}

/// Filter construction options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Matching strategy
    pub kind: FilterKind,
    /// Rebuild policy (automaton only)
    pub rebuild: RebuildPolicy,
}

impl FilterOptions {
    /// Create new filter options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set matching strategy.
    pub fn with_kind(mut self, kind: FilterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set rebuild policy.
    pub fn with_rebuild(mut self, rebuild: RebuildPolicy) -> Self {
        self.rebuild = rebuild;
        self
    }
}

/// Vocabulary store options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Capacity of each event feed
    pub capacity: usize,
    /// Behavior when a feed is full
    pub policy: FeedPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_FEED_CAPACITY,
            policy: FeedPolicy::default(),
        }
    }
}

impl StoreOptions {
    /// Create new store options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Set feed capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set full-feed policy.
    pub fn with_policy(mut self, policy: FeedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Zero capacity would turn every feed into a rendezvous channel.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(SensitiveError::Config(
                "feed capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
