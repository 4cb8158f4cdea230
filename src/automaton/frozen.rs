//! Fully resolved, immutable automata.
//!
//! A [`FrozenAutomaton`] is produced by [`Automaton::freeze`]. Every
//! transition and every output chain is resolved up front, so stepping takes
//! `&self`, never allocates, and the structure is `Send + Sync`. State ids are
//! the same as in the lazy automaton it was frozen from.

use tracing::debug;

use super::arena::NodeId;
use super::links::Match;
use super::packed::PackedTable;
use super::trie::{Automaton, PatternId, StateId};

/// Immutable automaton with one packed transition row per state.
#[derive(Clone, Debug)]
pub struct FrozenAutomaton {
    rows: Vec<PackedTable>,
    /// Per state: half-open range into `terminal_ids`.
    terminal_spans: Vec<(u32, u32)>,
    terminal_ids: Vec<PatternId>,
    patterns: usize,
}

impl Automaton {
    /// Resolve the whole automaton into a [`FrozenAutomaton`].
    ///
    /// Symbols used by no pattern always lead to the start state, so only the
    /// trie's own symbols are resolved through the lazy machinery. The lazy
    /// automaton keeps the memo entries this fills in.
    pub fn freeze(&mut self) -> FrozenAutomaton {
        let symbols: Vec<u8> = self.symbols.iter().collect();
        let ids: Vec<NodeId> = self.nodes.ids().collect();

        let mut rows = Vec::with_capacity(ids.len());
        let mut terminal_spans = Vec::with_capacity(ids.len());
        let mut terminal_ids = Vec::new();

        for id in ids {
            let targets: Vec<(u8, NodeId)> = symbols
                .iter()
                .map(|&symbol| (symbol, self.step(id, symbol)))
                .collect();
            rows.push(PackedTable::from_sparse(targets));

            let start = terminal_ids.len() as u32;
            terminal_ids.extend(self.terminals(id));
            terminal_spans.push((start, terminal_ids.len() as u32));
        }

        let frozen = FrozenAutomaton {
            rows,
            terminal_spans,
            terminal_ids,
            patterns: self.pattern_count(),
        };
        debug!(
            states = frozen.state_count(),
            symbols = self.symbols.len(),
            runs = frozen.rows.iter().map(PackedTable::runs).sum::<usize>(),
            outputs = frozen.terminal_ids.len(),
            "froze automaton"
        );
        frozen
    }
}

impl Default for FrozenAutomaton {
    fn default() -> Self {
        Automaton::new().freeze()
    }
}

impl FrozenAutomaton {
    /// The start state.
    #[inline]
    pub fn start(&self) -> StateId {
        NodeId::ROOT
    }

    /// Follow `symbol` from `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    #[inline]
    pub fn step(&self, state: StateId, symbol: u8) -> StateId {
        self.rows[state.index()].get(symbol)
    }

    /// Fold [`FrozenAutomaton::step`] over `symbols`.
    pub fn step_str(&self, state: StateId, symbols: impl AsRef<[u8]>) -> StateId {
        symbols
            .as_ref()
            .iter()
            .fold(state, |state, &symbol| self.step(state, symbol))
    }

    /// Every pattern that ends at `state`, longest first.
    #[inline]
    pub fn terminals(&self, state: StateId) -> &[PatternId] {
        let (start, end) = self.terminal_spans[state.index()];
        &self.terminal_ids[start as usize..end as usize]
    }

    /// Every occurrence of every pattern in `haystack`, ordered by end offset.
    pub fn find_all(&self, haystack: impl AsRef<[u8]>) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut state = self.start();
        for (i, &symbol) in haystack.as_ref().iter().enumerate() {
            state = self.step(state, symbol);
            matches.extend(
                self.terminals(state)
                    .iter()
                    .map(|&pattern| Match { pattern, end: i + 1 }),
            );
        }
        matches
    }

    /// Whether `haystack` contains any pattern. Stops at the first hit.
    pub fn is_match(&self, haystack: impl AsRef<[u8]>) -> bool {
        let mut state = self.start();
        haystack.as_ref().iter().any(|&symbol| {
            state = self.step(state, symbol);
            !self.terminals(state).is_empty()
        })
    }

    /// Whether `state` belongs to this automaton.
    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        state.index() < self.rows.len()
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_frozen_is_send_sync() {
        assert_send_sync::<FrozenAutomaton>();
    }

    #[test]
    fn test_empty_frozen() {
        let frozen = FrozenAutomaton::default();
        assert_eq!(frozen.state_count(), 1);
        assert_eq!(frozen.pattern_count(), 0);
        assert_eq!(frozen.step(frozen.start(), b'a'), frozen.start());
        assert!(frozen.find_all("anything").is_empty());
    }

    #[test]
    fn test_frozen_agrees_with_lazy() {
        let mut lazy = Automaton::from_patterns(["he", "she", "his", "hers"]);
        let frozen = lazy.clone().freeze();
        for text in ["ushers", "hishe", "shshe", "xyz", ""] {
            assert_eq!(frozen.find_all(text), lazy.find_all(text), "text {text:?}");
        }
    }

    #[test]
    fn test_frozen_state_ids_match_lazy() {
        let mut lazy = Automaton::from_patterns(["area", "autowin"]);
        let frozen = lazy.freeze();
        let lazy_state = lazy.step_str(lazy.start(), "autoare");
        let frozen_state = frozen.step_str(frozen.start(), "autoare");
        assert_eq!(lazy_state, frozen_state);
        assert_eq!(frozen.terminals(frozen_state), lazy.terminals(lazy_state).as_slice());
    }

    #[test]
    fn test_unused_symbols_reset() {
        let mut lazy = Automaton::from_patterns(["ab"]);
        let frozen = lazy.freeze();
        let a = frozen.step(frozen.start(), b'a');
        assert_ne!(a, frozen.start());
        assert_eq!(frozen.step(a, b'!'), frozen.start());
        assert_eq!(frozen.step(a, 0xff), frozen.start());
    }

    #[test]
    fn test_is_match() {
        let frozen = Automaton::from_patterns(["hint"]).freeze();
        assert!(frozen.is_match("a hint here"));
        assert!(!frozen.is_match("hin t"));
    }
}
