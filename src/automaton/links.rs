//! Lazily memoized failure links, output links and shortcut transitions.
//!
//! Three relations over the trie are computed on demand:
//!
//! - `step(node, b)`: the explicit child if there is one, the root when
//!   `node` is the root, otherwise `step(failure(node), b)`, memoized as a
//!   shortcut edge on `node`.
//! - `failure(node)`: the root for children of the root, otherwise
//!   `step(failure(parent), symbol)`.
//! - `output(node)`: the nearest node on the failure chain that ends a
//!   pattern.
//!
//! `step` and `failure` are defined in terms of each other. Every nested
//! query is on a strictly shallower node, so the unfolding is finite without
//! any cycle bookkeeping. It runs on an explicit task stack rather than the
//! call stack, so arbitrarily long patterns resolve without overflow.
//! Memoization makes each `(node, symbol)` pair and each node's links cost
//! O(1) after the first resolution.
//!
//! Memo entries live in a [`LinkTable`] beside the node arena. They are a
//! cache of values derivable from the trie alone: filling them changes the
//! cost of later queries, never their answers.

use smallvec::SmallVec;
use tracing::debug;

use super::arena::{find_edge, insert_edge, Edges, NodeId};
use super::trie::{Automaton, PatternId, StateId};
use crate::config::Alphabet;

/// Memoized output link of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputLink {
    #[default]
    Unresolved,
    Absent,
    Node(NodeId),
}

/// Memo entries for one node.
#[derive(Clone, Debug, Default)]
pub(crate) struct LinkCache {
    failure: Option<NodeId>,
    output: OutputLink,
    /// Transitions resolved through the failure chain, sorted by symbol.
    shortcuts: Edges,
}

/// Memo entries for every node, indexed like the arena.
///
/// Grown on demand so nodes that are never queried cost nothing.
#[derive(Clone, Debug, Default)]
pub(crate) struct LinkTable {
    entries: Vec<LinkCache>,
}

impl LinkTable {
    #[inline]
    fn get(&self, id: NodeId) -> Option<&LinkCache> {
        self.entries.get(id.index())
    }

    #[inline]
    fn entry(&mut self, id: NodeId) -> &mut LinkCache {
        let idx = id.index();
        if idx >= self.entries.len() {
            self.entries.resize_with(idx + 1, LinkCache::default);
        }
        &mut self.entries[idx]
    }

    #[inline]
    fn shortcut(&self, id: NodeId, symbol: u8) -> Option<NodeId> {
        self.get(id).and_then(|c| find_edge(&c.shortcuts, symbol))
    }

    /// True once anything has been memoized.
    pub(crate) fn is_populated(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of nodes with a memo entry.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop every memo entry.
    pub(crate) fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// (failure links, output links, shortcut edges) currently memoized.
    pub(crate) fn counts(&self) -> (usize, usize, usize) {
        self.entries.iter().fold((0, 0, 0), |(f, o, s), c| {
            (
                f + usize::from(c.failure.is_some()),
                o + usize::from(c.output != OutputLink::Unresolved),
                s + c.shortcuts.len(),
            )
        })
    }
}

/// One unit of work for [`Automaton::resolve`].
#[derive(Clone, Copy, Debug)]
enum Task {
    /// Resolve `step(node, symbol)`.
    Step(NodeId, u8),
    /// `step(failure(node), symbol)` just finished: memoize it on `node`.
    Shortcut(NodeId, u8),
    /// Resolve `failure(node)`.
    Failure(NodeId),
    /// `step(failure(parent), symbol)` just finished: it is `node`'s link.
    Link(NodeId),
}

/// A pattern occurrence found by [`Automaton::find_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    pub pattern: PatternId,
    /// Exclusive end offset of the occurrence in the input.
    pub end: usize,
}

impl Automaton {
    /// Follow `symbol` from `state`.
    ///
    /// Falls back through failure links when `state` has no explicit child
    /// for `symbol`, and to the start state when nothing matches. The
    /// resolved target is memoized, so repeating a `(state, symbol)` pair is
    /// O(1).
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    pub fn step(&mut self, state: StateId, symbol: u8) -> StateId {
        match self.direct_step(state, symbol) {
            Some(next) => next,
            None => self.resolve(Task::Step(state, symbol)),
        }
    }

    /// Fold [`Automaton::step`] over `symbols`.
    pub fn step_str(&mut self, state: StateId, symbols: impl AsRef<[u8]>) -> StateId {
        symbols
            .as_ref()
            .iter()
            .fold(state, |state, &symbol| self.step(state, symbol))
    }

    /// The state for the longest proper suffix of `state`'s string that is
    /// also a trie path. `None` for the start state.
    pub fn failure_link(&mut self, state: StateId) -> Option<StateId> {
        if state.is_root() {
            None
        } else {
            Some(self.resolve_failure(state))
        }
    }

    fn resolve_failure(&mut self, node: NodeId) -> NodeId {
        match self.known_failure(node) {
            Some(link) => link,
            None => self.resolve(Task::Failure(node)),
        }
    }

    /// `step` without touching the failure chain: explicit child, memoized
    /// shortcut, or the root staying put.
    #[inline]
    fn direct_step(&self, node: NodeId, symbol: u8) -> Option<NodeId> {
        if let Some(next) = self.nodes[node].child(symbol) {
            return Some(next);
        }
        if let Some(next) = self.links.shortcut(node, symbol) {
            return Some(next);
        }
        node.is_root().then_some(NodeId::ROOT)
    }

    /// Failure link of a non-root node if it needs no resolution.
    #[inline]
    fn known_failure(&self, node: NodeId) -> Option<NodeId> {
        debug_assert!(!node.is_root(), "the root has no failure link");
        if self.nodes[node].parent.is_root() {
            return Some(NodeId::ROOT);
        }
        self.links.get(node).and_then(|c| c.failure)
    }

    /// Unfold the mutual definition of `step` and `failure` on an explicit
    /// stack, so the depth of a pattern never reaches the call stack.
    ///
    /// Each task either finishes from the memo tables or schedules the
    /// queries it depends on and is revisited once they are memoized. Those
    /// queries are on shallower nodes, or are the failure link of the same
    /// node, so the stack drains.
    /// `last` holds the answer of the most recently finished task.
    fn resolve(&mut self, task: Task) -> NodeId {
        let mut pending: SmallVec<[Task; 16]> = SmallVec::new();
        pending.push(task);
        let mut last = NodeId::ROOT;

        while let Some(task) = pending.pop() {
            match task {
                Task::Step(node, symbol) => {
                    if let Some(next) = self.direct_step(node, symbol) {
                        last = next;
                    } else if let Some(fallback) = self.known_failure(node) {
                        debug_assert!(self.nodes[fallback].depth < self.nodes[node].depth);
                        pending.push(Task::Shortcut(node, symbol));
                        pending.push(Task::Step(fallback, symbol));
                    } else {
                        pending.push(task);
                        pending.push(Task::Failure(node));
                    }
                }
                Task::Shortcut(node, symbol) => {
                    insert_edge(&mut self.links.entry(node).shortcuts, symbol, last);
                }
                Task::Failure(node) => {
                    if let Some(link) = self.known_failure(node) {
                        last = link;
                        continue;
                    }
                    let parent = self.nodes[node].parent;
                    match self.known_failure(parent) {
                        Some(parent_link) => {
                            pending.push(Task::Link(node));
                            pending.push(Task::Step(parent_link, self.nodes[node].symbol));
                        }
                        None => {
                            pending.push(task);
                            pending.push(Task::Failure(parent));
                        }
                    }
                }
                Task::Link(node) => {
                    debug_assert!(self.nodes[last].depth < self.nodes[node].depth);
                    self.links.entry(node).failure = Some(last);
                }
            }
        }
        last
    }

    /// The nearest state on the failure chain of `state` where some pattern
    /// ends. `None` if there is none, and for the start state.
    pub fn output_link(&mut self, state: StateId) -> Option<StateId> {
        // Every node walked past shares the answer of the first resolved one.
        let mut walked: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut node = state;
        let output = loop {
            if node.is_root() {
                break None;
            }
            match self.links.get(node).map_or(OutputLink::Unresolved, |c| c.output) {
                OutputLink::Absent => break None,
                OutputLink::Node(found) => break Some(found),
                OutputLink::Unresolved => {}
            }
            walked.push(node);
            let link = self.resolve_failure(node);
            if self.nodes[link].terminal.is_some() {
                break Some(link);
            }
            node = link;
        };

        let memo = output.map_or(OutputLink::Absent, OutputLink::Node);
        for node in walked {
            self.links.entry(node).output = memo;
        }
        output
    }

    /// Every pattern that ends at `state`, longest first.
    ///
    /// Includes patterns that are proper suffixes of longer matches. The
    /// automaton keeps no history beyond its current state, so call this
    /// after every step.
    pub fn terminals(&mut self, state: StateId) -> Vec<PatternId> {
        let mut found = Vec::new();
        let mut cursor = Some(state);
        while let Some(node) = cursor {
            if let Some(id) = self.nodes[node].terminal {
                found.push(id);
            }
            cursor = self.output_link(node);
        }
        found
    }

    /// Stream `haystack` from the start state and report every occurrence of
    /// every pattern, ordered by end offset.
    pub fn find_all(&mut self, haystack: impl AsRef<[u8]>) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut state = self.start();
        for (i, &symbol) in haystack.as_ref().iter().enumerate() {
            state = self.step(state, symbol);
            matches.extend(
                self.terminals(state)
                    .into_iter()
                    .map(|pattern| Match { pattern, end: i + 1 }),
            );
        }
        matches
    }

    /// Resolve every failure link, output link and transition up front.
    ///
    /// Transitions are resolved for the symbols of `alphabet` plus every
    /// symbol used by an inserted pattern. Afterwards, stepping on those
    /// symbols never walks a failure chain.
    pub fn prewarm(&mut self, alphabet: Alphabet) {
        let mut symbols: SmallVec<[u8; 64]> = alphabet.symbols().collect();
        symbols.extend(self.symbols.iter().filter(|&b| !alphabet.contains(b)));

        let ids: Vec<NodeId> = self.nodes.ids().collect();
        for id in ids {
            if !id.is_root() {
                self.output_link(id);
            }
            for &symbol in &symbols {
                self.step(id, symbol);
            }
        }

        let stats = self.stats();
        debug!(
            nodes = stats.nodes,
            failure_links = stats.failure_links,
            shortcuts = stats.shortcuts,
            "prewarmed automaton"
        );
    }
}
