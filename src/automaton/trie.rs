//! The automaton type and its trie builder.
//!
//! Patterns are inserted into an arena-backed trie. Each insertion assigns the
//! next sequential [`PatternId`] from a counter owned by the automaton, so ids
//! are scoped to one instance and start at 1.

use std::fmt;
use std::num::NonZeroU32;

use tracing::debug;

use super::arena::{Node, NodeArena, NodeId};
use super::links::LinkTable;
use crate::error::{Error, Result};

/// Identifier of an inserted pattern. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(NonZeroU32);

impl PatternId {
    /// Wrap a raw id. Returns `None` for zero.
    #[inline]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(PatternId)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to an automaton state. Obtained from [`Automaton::start`]
/// or [`Automaton::step`], and only meaningful for the automaton that
/// produced it.
pub type StateId = NodeId;

/// 256-bit set of the symbols that label at least one trie edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SymbolSet([u64; 4]);

impl SymbolSet {
    #[inline]
    pub(crate) fn insert(&mut self, symbol: u8) {
        self.0[(symbol >> 6) as usize] |= 1 << (symbol & 63);
    }

    #[inline]
    pub(crate) fn contains(&self, symbol: u8) -> bool {
        self.0[(symbol >> 6) as usize] & (1 << (symbol & 63)) != 0
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Counters describing how much of the automaton has been resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutomatonStats {
    /// Trie nodes, root included.
    pub nodes: usize,
    /// Patterns inserted.
    pub patterns: usize,
    /// Memoized failure links.
    pub failure_links: usize,
    /// Memoized output links (resolved to a node or to "none").
    pub output_links: usize,
    /// Memoized shortcut edges.
    pub shortcuts: usize,
}

/// Multi-pattern online matcher with lazily memoized failure links.
///
/// ```
/// # use lazy_aho::Automaton;
/// let mut ac = Automaton::new();
/// let he = ac.insert("he");
/// let she = ac.insert("she");
///
/// let mut state = ac.start();
/// for &b in b"she" {
///     state = ac.step(state, b);
/// }
/// assert_eq!(ac.terminals(state), vec![she, he]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Automaton {
    pub(crate) nodes: NodeArena,
    pub(crate) links: LinkTable,
    pub(crate) symbols: SymbolSet,
    last_id: u32,
}

impl Automaton {
    /// Create an automaton with no patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an automaton from a list of patterns, ids assigned in order.
    ///
    /// # Panics
    ///
    /// Panics if any pattern is empty.
    pub fn from_patterns<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut ac = Self::new();
        for pattern in patterns {
            ac.insert(pattern);
        }
        ac
    }

    /// Insert a pattern and return its id.
    ///
    /// Inserting the same pattern twice returns a fresh id and the node
    /// reports only the newest one.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is empty or the id space is exhausted. Use
    /// [`Automaton::try_insert`] to get an error instead.
    pub fn insert(&mut self, pattern: impl AsRef<[u8]>) -> PatternId {
        match self.try_insert(pattern) {
            Ok(id) => id,
            Err(err) => panic!("Automaton::insert: {err}"),
        }
    }

    /// Insert a pattern, rejecting empty ones.
    ///
    /// Allowed after queries: memoized links are dropped and rebuilt on
    /// demand. Existing state ids keep indexing the same nodes, and a
    /// [`Cursor`](crate::Cursor) re-derives its position on its next symbol.
    pub fn try_insert(&mut self, pattern: impl AsRef<[u8]>) -> Result<PatternId> {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        let id = self
            .last_id
            .checked_add(1)
            .and_then(PatternId::new)
            .ok_or(Error::TooManyPatterns)?;

        // Memoized links describe the old trie; new nodes can shorten any of them.
        if self.links.is_populated() {
            debug!(
                resolved = self.links.len(),
                "invalidating link cache before insertion"
            );
            self.links.invalidate();
        }

        let mut node = NodeId::ROOT;
        for &symbol in pattern {
            node = self
                .nodes
                .get_or_create_child(node, symbol)
                .ok_or(Error::TooManyPatterns)?;
            self.symbols.insert(symbol);
        }

        if let Some(previous) = self.nodes[node].terminal {
            debug!(%previous, %id, "pattern re-inserted, replacing terminal id");
        }
        self.nodes[node].terminal = Some(id);
        self.last_id = id.get();

        debug!(
            %id,
            len = pattern.len(),
            nodes = self.nodes.len(),
            "inserted pattern"
        );
        Ok(id)
    }

    /// The start state (the trie root).
    #[inline]
    pub fn start(&self) -> StateId {
        NodeId::ROOT
    }

    /// The trie node behind a state.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    #[inline]
    pub fn node(&self, state: StateId) -> &Node {
        &self.nodes[state]
    }

    /// Length of the longest suffix of the input that the state represents.
    #[inline]
    pub fn depth(&self, state: StateId) -> usize {
        self.nodes[state].depth as usize
    }

    /// Whether `state` is an in-range index into this automaton's node arena.
    ///
    /// Ids are not tagged with their automaton, so an in-range id from a
    /// different automaton also passes.
    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        self.nodes.contains(state)
    }

    /// Number of patterns inserted so far.
    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.last_id as usize
    }

    /// Number of trie nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True if no pattern has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.last_id == 0
    }

    pub fn stats(&self) -> AutomatonStats {
        let (failure_links, output_links, shortcuts) = self.links.counts();
        AutomatonStats {
            nodes: self.nodes.len(),
            patterns: self.pattern_count(),
            failure_links,
            output_links,
            shortcuts,
        }
    }
}
