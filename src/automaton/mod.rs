//! Aho-Corasick automaton with lazily computed transition closure.
//!
//! The automaton is a trie of inserted patterns plus three memoized relations
//! over it: failure links, shortcut transitions and output links. None of
//! them is computed at insertion time; each is resolved the first time a
//! query needs it and then reused.
//!
//! # Module Organization
//!
//! - `arena`: Node storage (`NodeId`, `Node`, `NodeArena`)
//! - `trie`: The `Automaton` type and its trie builder (`insert`)
//! - `links`: Transition function, failure links, output links (`step`, `terminals`)
//! - `packed`: Range-compressed byte transition rows
//! - `frozen`: Fully resolved immutable automata (`FrozenAutomaton`)
//! - `thread_safe`: Concurrent wrapper with lock-free stepping (`SharedAutomaton`)

mod arena;
mod frozen;
mod links;
mod packed;
mod thread_safe;
mod trie;

pub use arena::{Node, NodeArena, NodeId};
pub use frozen::FrozenAutomaton;
pub use links::Match;
pub use packed::{PackedTable, BYTE_CEILING};
pub use thread_safe::SharedAutomaton;
pub use trie::{Automaton, AutomatonStats, PatternId, StateId};
