//! Symbol stream driver.
//!
//! A [`Cursor`] is the per-stream state: the current automaton position plus
//! a short window of the symbols that led there. It filters raw input through
//! a [`Config`] and reports the patterns completed by each routed symbol. Any
//! number of cursors can share one automaton.
//!
//! Inserting a pattern can lengthen the suffix the stream should be at, so a
//! cursor notices when its automaton has gained patterns and replays its
//! window from the start state before taking the next symbol.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::automaton::{Automaton, FrozenAutomaton, NodeId, PatternId, StateId};
use crate::config::Config;

/// Current position of one symbol stream.
#[derive(Clone, Debug)]
pub struct Cursor {
    state: StateId,
    config: Config,
    /// Last routed symbols, oldest first, at most `config.replay_window`.
    recent: VecDeque<u8>,
    /// Pattern count of the automaton `state` was derived in.
    patterns: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Cursor {
    /// A cursor at the start state.
    pub fn new(config: Config) -> Self {
        Self {
            state: NodeId::ROOT,
            recent: VecDeque::with_capacity(config.replay_window),
            config,
            patterns: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> StateId {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return to the start state and forget the recent symbols.
    pub fn reset(&mut self) {
        self.state = NodeId::ROOT;
        self.recent.clear();
    }

    /// Re-derive the state from the recent symbols in `automaton`.
    ///
    /// [`Cursor::feed`] does this on its own when the automaton has gained
    /// patterns since the last symbol. The result is exact as long as no
    /// pattern is longer than the replay window. Nothing is reported for the
    /// replayed symbols.
    pub fn resync(&mut self, automaton: &mut Automaton) {
        let (older, newer) = self.recent.as_slices();
        let state = automaton.step_str(automaton.start(), older);
        self.state = automaton.step_str(state, newer);
        self.synced(automaton.pattern_count());
    }

    /// [`Cursor::resync`] against a frozen automaton.
    pub fn resync_frozen(&mut self, automaton: &FrozenAutomaton) {
        let (older, newer) = self.recent.as_slices();
        let state = automaton.step_str(automaton.start(), older);
        self.state = automaton.step_str(state, newer);
        self.synced(automaton.pattern_count());
    }

    fn synced(&mut self, patterns: usize) {
        debug!(
            replayed = self.recent.len(),
            patterns,
            state = self.state.index(),
            "cursor resynced"
        );
        self.patterns = patterns;
    }

    /// Route `symbol` and return the bypass decision. `true` means the
    /// automaton should see it.
    fn admit(&mut self, symbol: u8) -> bool {
        if self.config.routes(symbol) {
            return true;
        }
        if self.config.reset_on_reject {
            self.reset();
        }
        false
    }

    fn remember(&mut self, symbol: u8) {
        if self.config.replay_window == 0 {
            return;
        }
        if self.recent.len() == self.config.replay_window {
            self.recent.pop_front();
        }
        self.recent.push_back(symbol);
    }

    /// Feed one raw input symbol through a lazy automaton.
    ///
    /// Returns the patterns completed by this symbol, longest first. Symbols
    /// the configuration does not route return nothing.
    pub fn feed(&mut self, automaton: &mut Automaton, symbol: u8) -> Vec<PatternId> {
        if !self.admit(symbol) {
            return Vec::new();
        }
        if self.patterns != automaton.pattern_count() {
            self.resync(automaton);
        }
        self.remember(symbol);
        self.state = automaton.step(self.state, symbol);
        let found = automaton.terminals(self.state);
        if !found.is_empty() {
            trace!(symbol = %char::from(symbol), matched = ?found, "patterns completed");
        }
        found
    }

    /// Feed one raw input symbol through a frozen automaton.
    ///
    /// Snapshots published later by a [`SharedAutomaton`] can be passed to
    /// the same cursor; it resyncs when the pattern count changes.
    ///
    /// [`SharedAutomaton`]: crate::SharedAutomaton
    pub fn feed_frozen<'a>(
        &mut self,
        automaton: &'a FrozenAutomaton,
        symbol: u8,
    ) -> &'a [PatternId] {
        if !self.admit(symbol) {
            return &[];
        }
        if self.patterns != automaton.pattern_count() {
            self.resync_frozen(automaton);
        }
        self.remember(symbol);
        self.state = automaton.step(self.state, symbol);
        let found = automaton.terminals(self.state);
        if !found.is_empty() {
            trace!(symbol = %char::from(symbol), matched = ?found, "patterns completed");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(found: &[PatternId]) -> Vec<u32> {
        found.iter().map(|id| id.get()).collect()
    }

    #[test]
    fn test_godmode_fires_on_seventh_symbol() {
        let mut ac = Automaton::from_patterns(["godmode", "area", "autowin"]);
        let mut cursor = Cursor::default();

        for &b in b"godmod" {
            assert!(cursor.feed(&mut ac, b).is_empty());
        }
        assert_eq!(ids(&cursor.feed(&mut ac, b'e')), vec![1]);

        // 'a' then "rea" completes "area" on the fourth symbol.
        assert!(cursor.feed(&mut ac, b'a').is_empty());
        assert!(cursor.feed(&mut ac, b'r').is_empty());
        assert!(cursor.feed(&mut ac, b'e').is_empty());
        assert_eq!(ids(&cursor.feed(&mut ac, b'a')), vec![2]);
    }

    #[test]
    fn test_unrouted_symbols_reset_nothing() {
        let mut ac = Automaton::from_patterns(["hint"]);
        let mut cursor = Cursor::default();
        let mut found = Vec::new();
        for &b in b"hi NT!nt" {
            found.extend(cursor.feed(&mut ac, b));
        }
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn test_reset_on_reject() {
        let mut ac = Automaton::from_patterns(["hint"]);
        let mut cursor = Cursor::new(Config::new().with_reset_on_reject(true));
        let mut found = Vec::new();
        for &b in b"hi nt" {
            found.extend(cursor.feed(&mut ac, b));
        }
        assert!(found.is_empty());
        assert_eq!(cursor.state(), ac.start());
    }

    #[test]
    fn test_reserved_symbols_bypass() {
        let mut ac = Automaton::from_patterns(["af"]);
        let mut cursor = Cursor::new(Config::new().with_reserved(b"f"));
        assert!(cursor.feed(&mut ac, b'a').is_empty());
        assert!(cursor.feed(&mut ac, b'f').is_empty());
        assert_eq!(ac.depth(cursor.state()), 1);
    }

    #[test]
    fn test_independent_cursors_share_automaton() {
        let mut ac = Automaton::from_patterns(["area"]);
        let mut left = Cursor::default();
        let mut right = Cursor::default();

        left.feed(&mut ac, b'a');
        left.feed(&mut ac, b'r');
        right.feed(&mut ac, b'a');
        left.feed(&mut ac, b'e');
        assert_eq!(ids(&left.feed(&mut ac, b'a')), vec![1]);
        assert_eq!(ac.depth(right.state()), 1);
    }

    #[test]
    fn test_feed_frozen_matches_lazy() {
        let mut ac = Automaton::from_patterns(["he", "she", "hers"]);
        let frozen = ac.clone().freeze();
        let mut lazy_cursor = Cursor::default();
        let mut frozen_cursor = Cursor::default();
        for &b in b"ushers she" {
            let lazy = lazy_cursor.feed(&mut ac, b);
            let frozen_found = frozen_cursor.feed_frozen(&frozen, b);
            assert_eq!(lazy.as_slice(), frozen_found);
        }
    }

    #[test]
    fn test_reset() {
        let mut ac = Automaton::from_patterns(["area"]);
        let mut cursor = Cursor::default();
        for &b in b"are" {
            cursor.feed(&mut ac, b);
        }
        cursor.reset();
        assert!(cursor.feed(&mut ac, b'a').is_empty());
        assert_eq!(cursor.state(), ac.step(ac.start(), b'a'));
    }

    #[test]
    fn test_insert_mid_stream_extends_current_match() {
        let mut ac = Automaton::from_patterns(["abc"]);
        let mut cursor = Cursor::default();
        for &b in b"xb" {
            assert!(cursor.feed(&mut ac, b).is_empty());
        }
        // "b" was not a trie path when it was read.
        assert_eq!(cursor.state(), ac.start());

        let bc = ac.insert("bc");
        assert_eq!(cursor.feed(&mut ac, b'c'), vec![bc]);
    }

    #[test]
    fn test_resync_reports_nothing_for_replayed_symbols() {
        let mut ac = Automaton::from_patterns(["zz"]);
        let mut cursor = Cursor::default();
        for &b in b"ab" {
            cursor.feed(&mut ac, b);
        }
        let ab = ac.insert("ab");
        cursor.resync(&mut ac);
        assert_eq!(ac.depth(cursor.state()), 2);
        assert_eq!(ac.terminals(cursor.state()), vec![ab]);
        // Feeding continues from the re-derived state without re-reporting.
        assert!(cursor.feed(&mut ac, b'x').is_empty());
    }

    #[test]
    fn test_replay_window_bounds_history() {
        let mut ac = Automaton::from_patterns(["q"]);
        let mut cursor = Cursor::new(Config::new().with_replay_window(2));
        for &b in b"abcd" {
            cursor.feed(&mut ac, b);
        }
        assert_eq!(cursor.recent, VecDeque::from(vec![b'c', b'd']));

        // "bcd" cannot be re-derived from two symbols, "cd" can.
        let cde = ac.insert("cde");
        ac.insert("bcde");
        assert_eq!(cursor.feed(&mut ac, b'e'), vec![cde]);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut ac = Automaton::from_patterns(["zz"]);
        let mut cursor = Cursor::default();
        cursor.feed(&mut ac, b'a');
        cursor.reset();
        ac.insert("ab");
        assert!(cursor.feed(&mut ac, b'b').is_empty());
    }

    #[test]
    fn test_feed_frozen_resyncs_on_new_snapshot() {
        let mut ac = Automaton::from_patterns(["abc"]);
        let before = ac.freeze();
        let mut cursor = Cursor::default();
        for &b in b"xb" {
            assert!(cursor.feed_frozen(&before, b).is_empty());
        }

        let bc = ac.insert("bc");
        let after = ac.freeze();
        assert_eq!(cursor.feed_frozen(&after, b'c'), &[bc]);
    }
}
