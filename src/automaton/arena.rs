//! Arena-based node storage for the pattern trie.
//!
//! Every trie node lives in one contiguous `Vec` and is addressed by a
//! `NodeId` index. Parent-to-child edges are the only structural edges; the
//! failure and output links computed later are plain indices into the same
//! arena, so they can point back toward ancestors without ownership cycles,
//! and teardown is a single deallocation.

use smallvec::SmallVec;

use super::PatternId;

/// A node identifier - just an index into the arena.
///
/// This can be freely copied and allows back-references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node, representing the empty string.
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" (the root's parent).
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Explicit child edges, kept sorted by symbol for binary search.
pub(crate) type Edges = SmallVec<[(u8, NodeId); 4]>;

/// Look up `symbol` in a sorted edge list.
#[inline]
pub(crate) fn find_edge(edges: &Edges, symbol: u8) -> Option<NodeId> {
    edges
        .binary_search_by_key(&symbol, |&(b, _)| b)
        .ok()
        .map(|pos| edges[pos].1)
}

/// Insert `(symbol, target)` into a sorted edge list, keeping it sorted.
/// Returns false if an edge for `symbol` already exists.
#[inline]
pub(crate) fn insert_edge(edges: &mut Edges, symbol: u8, target: NodeId) -> bool {
    match edges.binary_search_by_key(&symbol, |&(b, _)| b) {
        Ok(_) => false,
        Err(pos) => {
            edges.insert(pos, (symbol, target));
            true
        }
    }
}

/// One prefix of one or more inserted patterns.
///
/// This is the immutable trie skeleton; memoized links live elsewhere.
#[derive(Clone, Debug)]
pub struct Node {
    /// Symbol on the edge from the parent. Meaningless for the root.
    pub symbol: u8,
    /// `NodeId::NONE` for the root.
    pub parent: NodeId,
    /// Length of the represented string.
    pub depth: u32,
    /// Pattern ending exactly here, if any.
    pub terminal: Option<PatternId>,
    pub(crate) children: Edges,
}

impl Node {
    fn root() -> Self {
        Self {
            symbol: 0,
            parent: NodeId::NONE,
            depth: 0,
            terminal: None,
            children: Edges::new(),
        }
    }

    /// Explicit trie child for `symbol`.
    #[inline]
    pub fn child(&self, symbol: u8) -> Option<NodeId> {
        find_edge(&self.children, symbol)
    }

    /// Explicit trie children in ascending symbol order.
    pub fn children(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.children.iter().copied()
    }
}

/// Owns every trie node.
///
/// Nodes are never removed; the arena is dropped as a whole.
#[derive(Clone, Debug)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Create an arena holding only the root.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::root());
        Self { nodes }
    }

    /// Find or create the child of `parent` labeled `symbol`.
    ///
    /// Returns `None` only when the arena index space is exhausted.
    pub fn get_or_create_child(&mut self, parent: NodeId, symbol: u8) -> Option<NodeId> {
        if let Some(child) = self[parent].child(symbol) {
            return Some(child);
        }
        let idx = u32::try_from(self.nodes.len()).ok()?;
        if idx == u32::MAX {
            return None;
        }
        let child = NodeId(idx);
        let depth = self[parent].depth + 1;
        self.nodes.push(Node {
            symbol,
            parent,
            depth,
            terminal: None,
            children: Edges::new(),
        });
        insert_edge(&mut self.nodes[parent.index()].children, symbol, child);
        Some(child)
    }

    /// Get a node by ID, or `None` if the ID is out of range.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            None
        } else {
            self.nodes.get(id.index())
        }
    }

    /// Whether `id` addresses a node of this arena.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// All node ids in allocation order. Parents precede their children.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl std::ops::IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.index()]
    }
}
