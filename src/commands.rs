//! Named command recognition on top of the automaton.
//!
//! A [`CommandSet`] owns an automaton, a cursor, and the mapping from
//! [`PatternId`] back to caller-defined actions. Each command is registered
//! once; typing its name anywhere in the routed input stream fires its
//! action, including when one command's name ends another's.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::automaton::{Automaton, PatternId, StateId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stream::Cursor;

/// A registered command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command<A> {
    pub name: String,
    pub action: A,
}

/// Recognizes registered command names in a live symbol stream.
///
/// ```
/// # use lazy_aho::{CommandSet, Config};
/// #[derive(Debug, PartialEq)]
/// enum Cheat { GodMode, Area }
///
/// let mut cheats = CommandSet::with_config(Config::new().with_reserved(b"fq"));
/// cheats.register("godmode", Cheat::GodMode).unwrap();
/// cheats.register("area", Cheat::Area).unwrap();
///
/// assert_eq!(cheats.feed_str("xgodmode"), vec![&Cheat::GodMode]);
/// ```
#[derive(Clone, Debug)]
pub struct CommandSet<A> {
    automaton: Automaton,
    cursor: Cursor,
    commands: FxHashMap<PatternId, Command<A>>,
    by_name: FxHashMap<String, PatternId>,
    warmed: bool,
}

impl<A> Default for CommandSet<A> {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl<A> CommandSet<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            automaton: Automaton::new(),
            cursor: Cursor::new(config),
            commands: FxHashMap::default(),
            by_name: FxHashMap::default(),
            warmed: false,
        }
    }

    /// Register a command.
    ///
    /// Fails on an empty name, on a name that is already registered, on a
    /// name containing a symbol the configuration never routes, and on a name
    /// longer than the replay window.
    ///
    /// Commands can be registered while input is streaming. The symbols just
    /// typed count toward the new command, so its name may be completed by
    /// the next symbol.
    pub fn register(&mut self, name: impl Into<String>, action: A) -> Result<PatternId> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyPattern);
        }
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateCommand(name));
        }
        let unroutable = name.bytes().find(|&b| !self.config().routes(b));
        if let Some(symbol) = unroutable {
            return Err(Error::UnroutableSymbol {
                command: name,
                symbol,
            });
        }

        let limit = self.config().replay_window;
        if name.len() > limit {
            return Err(Error::CommandTooLong {
                command: name,
                limit,
            });
        }

        let id = self.automaton.try_insert(&name)?;
        self.warmed = false;
        debug!(%id, command = %name, "registered command");
        self.by_name.insert(name.clone(), id);
        self.commands.insert(id, Command { name, action });
        Ok(id)
    }

    fn advance(&mut self, symbol: u8) -> Vec<PatternId> {
        if self.config().prewarm && !self.warmed {
            let alphabet = self.config().alphabet;
            self.automaton.prewarm(alphabet);
            self.warmed = true;
        }
        self.cursor.feed(&mut self.automaton, symbol)
    }

    fn actions(&self, ids: &[PatternId]) -> Vec<&A> {
        ids.iter()
            .filter_map(|id| self.commands.get(id))
            .map(|command| {
                trace!(command = %command.name, "command fired");
                &command.action
            })
            .collect()
    }

    /// Feed one raw input symbol. Returns the actions of every command
    /// completed by it, longest name first.
    pub fn feed(&mut self, symbol: u8) -> Vec<&A> {
        let ids = self.advance(symbol);
        self.actions(&ids)
    }

    /// Feed every byte of `input` in order and collect the fired actions.
    pub fn feed_str(&mut self, input: impl AsRef<[u8]>) -> Vec<&A> {
        let mut ids = Vec::new();
        for &symbol in input.as_ref() {
            ids.extend(self.advance(symbol));
        }
        self.actions(&ids)
    }

    /// Forget the partial input seen so far.
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    pub fn get(&self, id: PatternId) -> Option<&Command<A>> {
        self.commands.get(&id)
    }

    /// Id of the command registered under `name`.
    pub fn id(&self, name: &str) -> Option<PatternId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: PatternId) -> Option<&str> {
        self.commands.get(&id).map(|c| c.name.as_str())
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Command<A>)> {
        let mut entries: Vec<_> = self.commands.iter().map(|(&id, c)| (id, c)).collect();
        entries.sort_unstable_by_key(|&(id, _)| id);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        self.cursor.config()
    }

    /// Current automaton state of the internal cursor.
    pub fn state(&self) -> StateId {
        self.cursor.state()
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}
