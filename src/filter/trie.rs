//! Character trie matcher with restart scanning.
//!
//! No failure links: whenever the current path cannot be extended, or the
//! text runs out, the scan resets to the root and resumes one character after
//! the previous scan start. Worst case is O(n·m) for text length n and longest
//! word m.

use std::ops::ControlFlow;

use parking_lot::RwLock;

use super::index::{Arena, EdgeTable, IndexNode, NodeId};
use super::Filter;
use crate::types::Match;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    edges: EdgeTable,
    terminal: bool,
}

impl IndexNode for TrieNode {
    fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    fn edges_mut(&mut self) -> &mut EdgeTable {
        &mut self.edges
    }
}

#[derive(Debug, Default)]
struct TrieIndex {
    arena: Arena<TrieNode>,
    words: usize,
}

impl TrieIndex {
    fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let end = self.arena.insert_path(word);
        let node = self.arena.node_mut(end);
        if !node.terminal {
            node.terminal = true;
            self.words += 1;
        }
    }

    fn delete(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        // path[i] = (node at depth i, char leading to depth i + 1)
        let mut path: Vec<(NodeId, char)> = Vec::new();
        let mut node = NodeId::ROOT;
        for c in word.chars() {
            match self.arena.child(node, c) {
                Some(next) => {
                    path.push((node, c));
                    node = next;
                }
                None => return,
            }
        }

        if !self.arena.node(node).terminal {
            return;
        }
        self.arena.node_mut(node).terminal = false;
        self.words -= 1;

        if !self.arena.node(node).edges.is_empty() {
            return;
        }

        // Climb to the deepest ancestor that is root, terminal or branching.
        let mut cut = path.len() - 1;
        while cut > 0 {
            let parent = self.arena.node(path[cut].0);
            if parent.terminal || parent.edges.len() > 1 {
                break;
            }
            cut -= 1;
        }

        let (anchor, c) = path[cut];
        self.arena.node_mut(anchor).edges.remove(c);
        for &(id, _) in &path[cut + 1..] {
            self.arena.release(id);
        }
        self.arena.release(node);

        tracing::trace!(
            word = %word,
            pruned = path.len() - cut,
            "pruned trie branch"
        );
    }

    /// Run the restart scan, calling `emit(start, end)` for each terminal hit.
    fn scan<F>(&self, chars: &[char], mut emit: F)
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        let len = chars.len();
        let mut start = 0;
        let mut pos = 0;
        let mut node = NodeId::ROOT;

        while pos < len {
            match self.arena.child(node, chars[pos]) {
                None => {
                    node = NodeId::ROOT;
                    start += 1;
                    pos = start;
                }
                Some(next) => {
                    if self.arena.node(next).terminal && emit(start, pos).is_break() {
                        return;
                    }
                    if pos == len - 1 {
                        node = NodeId::ROOT;
                        start += 1;
                        pos = start;
                    } else {
                        // keep extending: a longer word may share this prefix
                        node = next;
                        pos += 1;
                    }
                }
            }
        }
    }
}

/// Trie-based sensitive word matcher.
///
/// Edits take the write lock for the whole edit; queries scan under the
/// read lock. Deleting a word prunes the branch it no longer needs, so
/// memory shrinks with the vocabulary.
///
/// `find_one` reports the first word completed by the restart scan, which is
/// the leftmost match and, among matches sharing that start, the shortest
/// (`"gun"` before `"gunpowder"`).
#[derive(Debug, Default)]
pub struct TrieFilter {
    index: RwLock<TrieIndex>,
}

impl TrieFilter {
    /// Create an empty trie filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live trie nodes, root included
    pub fn node_count(&self) -> usize {
        self.index.read().arena.live_nodes()
    }
}

impl Filter for TrieFilter {
    fn add_word(&self, word: &str) {
        self.index.write().insert(word);
    }

    fn del_word(&self, word: &str) {
        self.index.write().delete(word);
    }

    fn add_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = self.index.write();
        for word in words {
            index.insert(word.as_ref());
        }
    }

    fn del_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = self.index.write();
        for word in words {
            index.delete(word.as_ref());
        }
    }

    fn len(&self) -> usize {
        self.index.read().words
    }

    fn find_matches(&self, text: &str) -> Vec<Match> {
        let chars: Vec<char> = text.chars().collect();
        let mut matches = Vec::new();
        self.index.read().scan(&chars, |start, end| {
            matches.push(Match::new(
                chars[start..=end].iter().collect::<String>(),
                start,
                end,
            ));
            ControlFlow::Continue(())
        });
        matches
    }

    fn find_one(&self, text: &str) -> Option<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut found = None;
        self.index.read().scan(&chars, |start, end| {
            found = Some(chars[start..=end].iter().collect());
            ControlFlow::Break(())
        });
        found
    }
}
