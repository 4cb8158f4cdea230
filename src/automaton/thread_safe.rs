//! Thread-safe automaton.
//!
//! The lazy [`Automaton`] memoizes links while answering queries, so it needs
//! `&mut self` for every step. [`SharedAutomaton`] serializes insertion behind
//! a mutex and publishes a [`FrozenAutomaton`] snapshot after each change.
//! Stepping reads the current snapshot without taking the lock.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;

use super::frozen::FrozenAutomaton;
use super::trie::{Automaton, PatternId, StateId};
use crate::error::Result;

/// `Send + Sync` automaton for concurrent streams.
///
/// Each stream keeps its own position. A bare [`StateId`] stays a valid
/// index across snapshots because nodes are only ever appended, but it
/// still describes the older trie: a pattern inserted mid-stream may extend
/// input already read. Streams that outlive an insertion should use a
/// [`Cursor`] with [`Cursor::feed_frozen`], which re-derives its position
/// when a snapshot carries new patterns.
///
/// [`Cursor`]: crate::Cursor
/// [`Cursor::feed_frozen`]: crate::Cursor::feed_frozen
///
/// ```
/// # use lazy_aho::SharedAutomaton;
/// use std::sync::Arc;
///
/// let shared = Arc::new(SharedAutomaton::new());
/// let id = shared.insert("area");
///
/// let worker = Arc::clone(&shared);
/// let found = std::thread::spawn(move || {
///     let snapshot = worker.snapshot();
///     let state = snapshot.step_str(snapshot.start(), "area");
///     snapshot.terminals(state).to_vec()
/// })
/// .join()
/// .unwrap();
/// assert_eq!(found, vec![id]);
/// ```
pub struct SharedAutomaton {
    /// Latest published snapshot, read without locking.
    snapshot: ArcSwap<FrozenAutomaton>,
    /// Lazy automaton that insertions go through.
    build_lock: Mutex<Automaton>,
}

impl Default for SharedAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedAutomaton {
    pub fn new() -> Self {
        Self::from_automaton(Automaton::new())
    }

    /// Take ownership of an already built automaton and publish it.
    pub fn from_automaton(mut automaton: Automaton) -> Self {
        let frozen = automaton.freeze();
        Self {
            snapshot: ArcSwap::from_pointee(frozen),
            build_lock: Mutex::new(automaton),
        }
    }

    /// Insert a pattern and publish a new snapshot.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is empty.
    pub fn insert(&self, pattern: impl AsRef<[u8]>) -> PatternId {
        let mut automaton = self.build_lock.lock();
        let id = automaton.insert(pattern);
        self.publish(&mut automaton);
        id
    }

    /// Insert a pattern, rejecting empty ones.
    pub fn try_insert(&self, pattern: impl AsRef<[u8]>) -> Result<PatternId> {
        let mut automaton = self.build_lock.lock();
        let id = automaton.try_insert(pattern)?;
        self.publish(&mut automaton);
        Ok(id)
    }

    /// Insert several patterns and publish once.
    ///
    /// Stops at the first invalid pattern; patterns before it stay inserted
    /// and are published.
    pub fn insert_all<I, P>(&self, patterns: I) -> Result<Vec<PatternId>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut automaton = self.build_lock.lock();
        let mut ids = Vec::new();
        let mut outcome = Ok(());
        for pattern in patterns {
            match automaton.try_insert(pattern) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        if !ids.is_empty() {
            self.publish(&mut automaton);
        }
        outcome.map(|()| ids)
    }

    fn publish(&self, automaton: &mut Automaton) {
        let frozen = automaton.freeze();
        debug!(
            patterns = frozen.pattern_count(),
            states = frozen.state_count(),
            "published automaton snapshot"
        );
        self.snapshot.store(Arc::new(frozen));
    }

    /// The current snapshot. Hold on to it for hot loops.
    pub fn snapshot(&self) -> Arc<FrozenAutomaton> {
        self.snapshot.load_full()
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        self.snapshot.load().start()
    }

    /// Follow `symbol` from `state` in the current snapshot.
    pub fn step(&self, state: StateId, symbol: u8) -> StateId {
        self.snapshot.load().step(state, symbol)
    }

    /// Patterns ending at `state` in the current snapshot, longest first.
    pub fn terminals(&self, state: StateId) -> Vec<PatternId> {
        self.snapshot.load().terminals(state).to_vec()
    }

    pub fn pattern_count(&self) -> usize {
        self.snapshot.load().pattern_count()
    }
}
