//! lazy-aho: multi-pattern online matching for live symbol streams
//!
//! An [`Automaton`] holds a set of patterns and, fed one symbol at a time,
//! reports which patterns have just completed, including patterns that are
//! suffixes of other matches. Failure links and fallback transitions are
//! computed lazily and memoized, so each symbol costs O(1) amortized.
//!
//! ```
//! use lazy_aho::Automaton;
//!
//! let mut ac = Automaton::new();
//! let godmode = ac.insert("godmode");
//! let area = ac.insert("area");
//!
//! let mut state = ac.start();
//! let mut fired = Vec::new();
//! for &symbol in b"xgodmodearea" {
//!     state = ac.step(state, symbol);
//!     fired.extend(ac.terminals(state));
//! }
//! assert_eq!(fired, vec![godmode, area]);
//! ```
//!
//! Higher level pieces:
//!
//! - [`Cursor`]: one stream position plus the [`Config`] that decides which
//!   input symbols reach the automaton
//! - [`CommandSet`]: maps completed patterns back to named actions
//! - [`FrozenAutomaton`] / [`SharedAutomaton`]: fully resolved, `Send + Sync`
//!   automata for concurrent streams

pub mod automaton;
mod commands;
mod config;
mod error;
mod stream;

pub use automaton::{
    Automaton, AutomatonStats, FrozenAutomaton, Match, PatternId, SharedAutomaton, StateId,
};
pub use commands::{Command, CommandSet};
pub use config::{Alphabet, Config, DEFAULT_REPLAY_WINDOW};
pub use error::{Error, Result};
pub use stream::Cursor;
