//! Arena-backed pattern index shared by both matchers.
//!
//! Nodes live in a `Vec` and are addressed by `NodeId`, so the automaton's
//! failure links can point anywhere in the tree without ownership cycles.
//!
//! Each node dispatches on the next character through an `EdgeTable`, a
//! sorted vector of `(char, NodeId)` pairs searched by binary search.

/// Index of a node in an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    /// The root is always the first slot.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// Sorted character-to-child dispatch table.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<(char, NodeId)>,
}

impl EdgeTable {
    #[inline]
    pub fn get(&self, c: char) -> Option<NodeId> {
        self.edges
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.edges[i].1)
    }

    /// Insert or overwrite the edge on `c`.
    pub fn insert(&mut self, c: char, id: NodeId) {
        match self.edges.binary_search_by_key(&c, |&(k, _)| k) {
            Ok(i) => self.edges[i].1 = id,
            Err(i) => self.edges.insert(i, (c, id)),
        }
    }

    pub fn remove(&mut self, c: char) -> Option<NodeId> {
        self.edges
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.edges.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.edges.iter().copied()
    }
}

/// A node stored in an [`Arena`].
pub trait IndexNode: Default {
    fn edges(&self) -> &EdgeTable;
    fn edges_mut(&mut self) -> &mut EdgeTable;
}

/// Node storage with slot recycling.
#[derive(Debug, Clone)]
pub struct Arena<N> {
    nodes: Vec<N>,
    free: Vec<NodeId>,
}

impl<N: IndexNode> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: IndexNode> Arena<N> {
    /// Create an arena holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![N::default()],
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn child(&self, id: NodeId, c: char) -> Option<NodeId> {
        self.node(id).edges().get(c)
    }

    /// Number of live nodes, root included.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of slots, live or free. Node ids are always below this.
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = N::default();
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(N::default());
        id
    }

    /// Return a detached node to the free list.
    pub fn release(&mut self, id: NodeId) {
        debug_assert!(!id.is_root(), "root is never released");
        self.nodes[id.index()] = N::default();
        self.free.push(id);
    }

    /// Walk the path for `word`, creating missing nodes, and return its end.
    pub fn insert_path(&mut self, word: &str) -> NodeId {
        let mut node = NodeId::ROOT;
        for c in word.chars() {
            node = match self.child(node, c) {
                Some(next) => next,
                None => {
                    let next = self.alloc();
                    self.node_mut(node).edges_mut().insert(c, next);
                    next
                }
            };
        }
        node
    }

    /// Walk the path for `word` without creating anything.
    pub fn find_path(&self, word: &str) -> Option<NodeId> {
        word.chars()
            .try_fold(NodeId::ROOT, |node, c| self.child(node, c))
    }
}
