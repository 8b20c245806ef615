//! Aho-Corasick matcher.
//!
//! Uses a "build-then-publish" pattern:
//! 1. Edits go to a mutable builder trie guarded by a mutex
//! 2. A rebuild computes failure links and output sets into a brand-new
//!    immutable `Automaton`
//! 3. The automaton is published through `ArcSwap`; queries load the current
//!    generation and scan it without any lock
//!
//! Readers therefore never observe a half-built failure-link graph.

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::index::{Arena, EdgeTable, IndexNode, NodeId};
use super::Filter;
use crate::options::RebuildPolicy;
use crate::types::Match;

#[derive(Debug, Clone, Default)]
struct BuildNode {
    edges: EdgeTable,
    word: Option<Arc<str>>,
}

impl IndexNode for BuildNode {
    fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    fn edges_mut(&mut self) -> &mut EdgeTable {
        &mut self.edges
    }
}

/// Writer-side trie. Nodes are never reclaimed: deleting a word only clears
/// its terminal mark, so failure links of other words never need repair.
#[derive(Debug, Default)]
struct AcBuilder {
    arena: Arena<BuildNode>,
    words: usize,
}

impl AcBuilder {
    /// Returns true if the vocabulary changed.
    fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let end = self.arena.insert_path(word);
        let node = self.arena.node_mut(end);
        if node.word.is_some() {
            return false;
        }
        node.word = Some(Arc::from(word));
        self.words += 1;
        true
    }

    /// Returns true if the vocabulary changed.
    fn delete(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let Some(end) = self.arena.find_path(word) else {
            return false;
        };
        if self.arena.node_mut(end).word.take().is_none() {
            return false;
        }
        self.words -= 1;
        true
    }

    /// Breadth-first failure-link construction.
    fn build(&self) -> Automaton {
        let mut states = vec![State::default(); self.arena.slots()];
        let mut words: Vec<Arc<str>> = Vec::with_capacity(self.words);
        let mut lens = Vec::with_capacity(self.words);

        let mut queue = VecDeque::new();
        queue.push_back(NodeId::ROOT);

        while let Some(id) = queue.pop_front() {
            let node = self.arena.node(id);
            states[id.index()].edges = node.edges.clone();

            for (c, next) in node.edges.iter() {
                let fail = if id.is_root() {
                    NodeId::ROOT
                } else {
                    let mut probe = states[id.index()].fail;
                    loop {
                        if let Some(target) = self.arena.child(probe, c) {
                            break target;
                        }
                        if probe.is_root() {
                            break NodeId::ROOT;
                        }
                        probe = states[probe.index()].fail;
                    }
                };

                // The fail target is shallower, so its output is final.
                let mut output = Vec::new();
                if let Some(word) = &self.arena.node(next).word {
                    output.push(words.len() as u32);
                    lens.push(word.chars().count());
                    words.push(Arc::clone(word));
                }
                output.extend_from_slice(&states[fail.index()].output);

                let state = &mut states[next.index()];
                state.fail = fail;
                state.output = output;
                queue.push_back(next);
            }
        }

        Automaton {
            states,
            words,
            lens,
        }
    }
}

#[derive(Debug, Clone)]
struct State {
    edges: EdgeTable,
    fail: NodeId,
    /// Ids of every word ending here: own word first, then inherited ones.
    output: Vec<u32>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            edges: EdgeTable::default(),
            fail: NodeId::ROOT,
            output: Vec::new(),
        }
    }
}

/// One immutable, fully built automaton generation.
#[derive(Debug)]
struct Automaton {
    states: Vec<State>,
    words: Vec<Arc<str>>,
    /// Word lengths in characters
    lens: Vec<usize>,
}

impl Automaton {
    fn empty() -> Self {
        AcBuilder::default().build()
    }

    #[inline]
    fn step(&self, mut state: NodeId, c: char) -> NodeId {
        loop {
            let current = &self.states[state.index()];
            if let Some(next) = current.edges.get(c) {
                return next;
            }
            if state.is_root() {
                return NodeId::ROOT;
            }
            state = current.fail;
        }
    }

    /// Call `emit(pos, output)` at every position whose state has output.
    fn scan<F>(&self, text: &str, mut emit: F)
    where
        F: FnMut(usize, &[u32]) -> ControlFlow<()>,
    {
        let mut state = NodeId::ROOT;
        for (pos, c) in text.chars().enumerate() {
            state = self.step(state, c);
            let output = &self.states[state.index()].output;
            if !output.is_empty() && emit(pos, output).is_break() {
                return;
            }
        }
    }
}

/// Aho-Corasick sensitive word matcher.
///
/// Scanning is O(n) in text length regardless of vocabulary overlap. Edits
/// invalidate the published automaton; with [`RebuildPolicy::Lazy`] the next
/// query rebuilds it, with [`RebuildPolicy::Eager`] the edit does. Batch edits
/// through `add_words`/`del_words` to pay for one rebuild.
///
/// `find_one` reports the longest word in the output set of the first
/// position where any word ends (`"she"` rather than `"he"` in `"ushers"`).
///
/// `remove` deletes every distinct matched word from the text as a literal
/// substring, longest first, ties in first-seen order.
///
/// Deleting a word keeps its trie nodes; only the output marking goes away.
#[derive(Debug)]
pub struct AcFilter {
    builder: Mutex<AcBuilder>,
    current: ArcSwap<Automaton>,
    dirty: AtomicBool,
    policy: RebuildPolicy,
}

impl Default for AcFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AcFilter {
    /// Create an empty filter that rebuilds lazily
    pub fn new() -> Self {
        Self::with_policy(RebuildPolicy::Lazy)
    }

    /// Create an empty filter with the given rebuild policy
    pub fn with_policy(policy: RebuildPolicy) -> Self {
        Self {
            builder: Mutex::new(AcBuilder::default()),
            current: ArcSwap::from_pointee(Automaton::empty()),
            dirty: AtomicBool::new(false),
            policy,
        }
    }

    pub fn policy(&self) -> RebuildPolicy {
        self.policy
    }

    /// Rebuild and publish the automaton now.
    pub fn build(&self) {
        let builder = self.builder.lock();
        self.publish(&builder);
    }

    /// Whether the published automaton reflects every applied edit
    pub fn is_built(&self) -> bool {
        !self.dirty.load(Ordering::Acquire)
    }

    /// Number of trie nodes ever created, root included
    pub fn node_count(&self) -> usize {
        self.builder.lock().arena.live_nodes()
    }

    fn publish(&self, builder: &AcBuilder) {
        let automaton = builder.build();
        tracing::debug!(
            states = automaton.states.len(),
            words = automaton.words.len(),
            "rebuilt automaton"
        );
        self.current.store(Arc::new(automaton));
        self.dirty.store(false, Ordering::Release);
    }

    fn edit<F>(&self, apply: F)
    where
        F: FnOnce(&mut AcBuilder) -> bool,
    {
        let mut builder = self.builder.lock();
        if !apply(&mut builder) {
            return;
        }
        match self.policy {
            RebuildPolicy::Eager => self.publish(&builder),
            RebuildPolicy::Lazy => self.dirty.store(true, Ordering::Release),
        }
    }

    /// Current generation, rebuilt first if an edit is pending.
    fn snapshot(&self) -> Arc<Automaton> {
        if self.dirty.load(Ordering::Acquire) {
            let builder = self.builder.lock();
            // another reader may have rebuilt while we waited
            if self.dirty.load(Ordering::Acquire) {
                self.publish(&builder);
            }
        }
        self.current.load_full()
    }
}

impl Filter for AcFilter {
    fn add_word(&self, word: &str) {
        self.edit(|builder| builder.insert(word));
    }

    fn del_word(&self, word: &str) {
        self.edit(|builder| builder.delete(word));
    }

    fn add_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.edit(|builder| {
            words
                .into_iter()
                .fold(false, |changed, word| builder.insert(word.as_ref()) || changed)
        });
    }

    fn del_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.edit(|builder| {
            words
                .into_iter()
                .fold(false, |changed, word| builder.delete(word.as_ref()) || changed)
        });
    }

    fn len(&self) -> usize {
        self.builder.lock().words
    }

    fn find_matches(&self, text: &str) -> Vec<Match> {
        let automaton = self.snapshot();
        let mut matches = Vec::new();
        automaton.scan(text, |pos, output| {
            for &id in output {
                let id = id as usize;
                // guard against spans reaching before the start of the text
                if let Some(start) = (pos + 1).checked_sub(automaton.lens[id]) {
                    matches.push(Match::new(automaton.words[id].to_string(), start, pos));
                }
            }
            ControlFlow::Continue(())
        });
        matches
    }

    fn find_one(&self, text: &str) -> Option<String> {
        let automaton = self.snapshot();
        let mut found = None;
        automaton.scan(text, |_, output| {
            let mut best = output[0] as usize;
            for &id in &output[1..] {
                if automaton.lens[id as usize] > automaton.lens[best] {
                    best = id as usize;
                }
            }
            found = Some(automaton.words[best].to_string());
            ControlFlow::Break(())
        });
        found
    }

    fn remove(&self, text: &str) -> String {
        let mut words = self.find_all(text);
        // stable sort: equal lengths keep first-seen order
        words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
        words
            .iter()
            .fold(text.to_string(), |acc, word| acc.replace(word.as_str(), ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn filter_with(words: &[&str]) -> AcFilter {
        let filter = AcFilter::new();
        filter.add_words(words.iter().copied());
        filter
    }

    #[test]
    fn test_empty_automaton() {
        let filter = AcFilter::new();
        assert!(filter.is_empty());
        assert!(filter.is_built());
        assert_eq!(filter.find_one("anything"), None);
        assert!(filter.find_matches("anything").is_empty());
    }

    #[test]
    fn test_failure_links_find_suffix_words() {
        let filter = filter_with(&["he", "she", "his", "hers"]);
        let matches = filter.find_matches("ushers");
        assert_eq!(
            matches,
            vec![
                Match::new("she", 1, 3),
                Match::new("he", 2, 3),
                Match::new("hers", 2, 5),
            ]
        );
    }

    #[test]
    fn test_output_inherited_through_failure_chain() {
        let filter = filter_with(&["abcd", "bcd", "cd", "d"]);
        let words: Vec<String> = filter
            .find_matches("abcd")
            .into_iter()
            .map(|m| m.word)
            .collect();
        assert_eq!(words, vec!["abcd", "bcd", "cd", "d"]);
    }

    #[test]
    fn test_find_one_prefers_longest_in_output() {
        let filter = filter_with(&["he", "she"]);
        assert_eq!(filter.find_one("ushers"), Some("she".to_string()));
    }

    #[test]
    fn test_find_one_first_position_wins() {
        let filter = filter_with(&["gun", "gunpowder"]);
        assert_eq!(filter.find_one("a gunpowder keg"), Some("gun".to_string()));
    }

    #[test]
    fn test_find_all_count() {
        let filter = filter_with(&["ab", "b"]);
        assert_eq!(
            filter.find_all_count("abab"),
            HashMap::from([("ab".to_string(), 2), ("b".to_string(), 2)])
        );
        assert_eq!(filter.find_all("abab"), vec!["ab".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_replace_masks_every_span() {
        let filter = filter_with(&["abc", "cde"]);
        assert_eq!(filter.replace("xxabcdexx", '*'), "xx*****xx");
        assert_eq!(filter.replace("no match", '*'), "no match");
    }

    #[test]
    fn test_remove_longest_first() {
        let filter = filter_with(&["gun", "gunpowder"]);
        assert_eq!(filter.remove("a gunpowder keg"), "a  keg");
    }

    #[test]
    fn test_remove_partial_overlap_deletes_first_seen_on_tie() {
        let filter = filter_with(&["abcd", "cdef"]);
        assert_eq!(filter.find_all("abcdef"), vec!["abcd".to_string(), "cdef".to_string()]);
        assert_eq!(filter.remove("abcdef"), "ef");
    }

    #[test]
    fn test_lazy_rebuild_on_query() {
        let filter = AcFilter::new();
        filter.add_word("abc");
        assert!(!filter.is_built());
        assert!(filter.is_sensitive("xxabcxx"));
        assert!(filter.is_built());
    }

    #[test]
    fn test_eager_rebuild_on_edit() {
        let filter = AcFilter::with_policy(RebuildPolicy::Eager);
        assert_eq!(filter.policy(), RebuildPolicy::Eager);
        filter.add_word("abc");
        assert!(filter.is_built());
        assert_eq!(filter.replace("xxabcxx", '*'), "xx***xx");
    }

    #[test]
    fn test_noop_edits_keep_automaton_built() {
        let filter = filter_with(&["abc"]);
        filter.build();
        filter.add_word("abc");
        filter.add_word("");
        filter.del_word("xyz");
        assert!(filter.is_built());
    }

    #[test]
    fn test_soft_delete_keeps_nodes() {
        let filter = filter_with(&["武汉海鲜市场", "武汉"]);
        let nodes = filter.node_count();

        filter.del_word("武汉海鲜市场");
        assert_eq!(filter.find_all("武汉海鲜市场"), vec!["武汉".to_string()]);
        filter.del_word("武汉");
        assert!(filter.is_empty());
        assert!(!filter.is_sensitive("武汉海鲜市场"));
        assert_eq!(filter.node_count(), nodes);
    }

    #[test]
    fn test_add_then_delete_before_query() {
        let filter = AcFilter::new();
        filter.add_word("secret");
        filter.del_word("secret");
        assert!(!filter.is_sensitive("secret"));
        filter.add_word("secret");
        assert!(filter.is_sensitive("top secret"));
    }

    #[test]
    fn test_readers_see_complete_generations() {
        let filter = Arc::new(AcFilter::new());
        let writer = {
            let filter = Arc::clone(&filter);
            std::thread::spawn(move || {
                for i in 0..200 {
                    filter.add_word(&format!("word{}", i));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let filter = Arc::clone(&filter);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        for m in filter.find_matches("xx word7 yy") {
                            assert!(m.word.starts_with("word"));
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(filter.len(), 200);
        assert!(filter.is_sensitive("word199"));
    }
}
