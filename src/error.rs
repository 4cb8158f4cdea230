//! Error type for the fallible edges of the crate.
//!
//! The automaton kernel itself never fails: `step`, `failure_link` and
//! `terminals` are total. Errors only come from validating input before it
//! reaches the kernel (patterns, command names, configuration).

use thiserror::Error;

/// Errors produced while registering patterns or loading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// A pattern or command name with no symbols.
    #[error("empty pattern")]
    EmptyPattern,

    /// The pattern id space or the node arena is exhausted.
    #[error("too many patterns: identifier space exhausted")]
    TooManyPatterns,

    /// A command with the same name is already registered.
    #[error("duplicate command: {0:?}")]
    DuplicateCommand(String),

    /// A command contains a symbol that the stream configuration never routes
    /// to the automaton, so it could never be recognized.
    #[error("command {command:?} contains unroutable symbol {symbol:#04x}")]
    UnroutableSymbol { command: String, symbol: u8 },

    /// A command longer than the cursor's replay window. It could be missed
    /// if registered while a stream is in flight.
    #[error("command {command:?} is longer than the replay window of {limit} symbols")]
    CommandTooLong { command: String, limit: usize },

    /// Malformed TOML configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
