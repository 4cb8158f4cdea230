//! Stream routing configuration.
//!
//! The automaton accepts any byte, but the embedding program decides which
//! input events are forwarded as symbols. [`Config`] captures that decision so
//! cursors and command sets apply it consistently.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The symbol class forwarded to the automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alphabet {
    /// `a..=z` only.
    #[default]
    LowercaseAscii,
    /// `a..=z`, `A..=Z`, `0..=9`.
    AsciiAlphanumeric,
    /// Printable ASCII excluding space (`!..=~`).
    AsciiGraphic,
    /// Every byte.
    Bytes,
}

impl Alphabet {
    /// Whether `symbol` belongs to this alphabet.
    #[inline]
    pub fn contains(self, symbol: u8) -> bool {
        match self {
            Alphabet::LowercaseAscii => symbol.is_ascii_lowercase(),
            Alphabet::AsciiAlphanumeric => symbol.is_ascii_alphanumeric(),
            Alphabet::AsciiGraphic => symbol.is_ascii_graphic(),
            Alphabet::Bytes => true,
        }
    }

    /// All symbols of the alphabet in ascending order.
    pub fn symbols(self) -> impl Iterator<Item = u8> {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }
}

/// Routing rules for a symbol stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Symbols outside this class bypass the automaton.
    pub alphabet: Alphabet,
    /// Symbols inside the alphabet that the embedding program consumes itself
    /// (game keys and the like). They bypass the automaton too.
    pub reserved: Vec<u8>,
    /// Reset the cursor to the start state when a symbol bypasses the
    /// automaton. Off by default: bypassed input leaves the cursor untouched.
    pub reset_on_reject: bool,
    /// Resolve every transition over the alphabet before the first symbol.
    pub prewarm: bool,
    /// How many recent routed symbols a cursor keeps so it can re-derive its
    /// state after patterns are added mid-stream. Patterns up to this length
    /// are recognized exactly across such an insertion.
    pub replay_window: usize,
}

/// Default for [`Config::replay_window`].
pub const DEFAULT_REPLAY_WINDOW: usize = 64;

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::LowercaseAscii,
            reserved: Vec::new(),
            reset_on_reject: false,
            prewarm: false,
            replay_window: DEFAULT_REPLAY_WINDOW,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    ///
    /// ```
    /// # use lazy_aho::{Alphabet, Config};
    /// let config = Config::from_toml_str(r#"
    ///     alphabet = "ascii-alphanumeric"
    ///     reset-on-reject = true
    /// "#).unwrap();
    /// assert_eq!(config.alphabet, Alphabet::AsciiAlphanumeric);
    /// assert!(config.reset_on_reject);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_reserved(mut self, reserved: impl AsRef<[u8]>) -> Self {
        self.reserved = reserved.as_ref().to_vec();
        self
    }

    pub fn with_reset_on_reject(mut self, reset: bool) -> Self {
        self.reset_on_reject = reset;
        self
    }

    pub fn with_prewarm(mut self, prewarm: bool) -> Self {
        self.prewarm = prewarm;
        self
    }

    pub fn with_replay_window(mut self, window: usize) -> Self {
        self.replay_window = window;
        self
    }

    /// Whether `symbol` is forwarded to the automaton.
    #[inline]
    pub fn routes(&self, symbol: u8) -> bool {
        self.alphabet.contains(symbol) && !self.reserved.contains(&symbol)
    }

    /// Routed symbols in ascending order.
    pub fn routed_symbols(&self) -> impl Iterator<Item = u8> + '_ {
        self.alphabet
            .symbols()
            .filter(move |b| !self.reserved.contains(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes_lowercase_only() {
        let config = Config::default();
        assert!(config.routes(b'a'));
        assert!(config.routes(b'z'));
        assert!(!config.routes(b'A'));
        assert!(!config.routes(b' '));
        assert!(!config.routes(b'!'));
    }

    #[test]
    fn test_reserved_symbols_bypass() {
        let config = Config::new().with_reserved(b"fq");
        assert!(!config.routes(b'f'));
        assert!(!config.routes(b'q'));
        assert!(config.routes(b'g'));
        assert_eq!(config.routed_symbols().count(), 24);
    }

    #[test]
    fn test_alphabet_sizes() {
        assert_eq!(Alphabet::LowercaseAscii.symbols().count(), 26);
        assert_eq!(Alphabet::AsciiAlphanumeric.symbols().count(), 62);
        assert_eq!(Alphabet::AsciiGraphic.symbols().count(), 94);
        assert_eq!(Alphabet::Bytes.symbols().count(), 256);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
            alphabet = "ascii-graphic"
            reserved = [102, 113]
            prewarm = true
            "#,
        )
        .unwrap();
        assert_eq!(config.alphabet, Alphabet::AsciiGraphic);
        assert_eq!(config.reserved, b"fq".to_vec());
        assert!(config.prewarm);
        assert!(!config.reset_on_reject);
        assert_eq!(config.replay_window, DEFAULT_REPLAY_WINDOW);
    }

    #[test]
    fn test_replay_window_from_toml() {
        let config = Config::from_toml_str("replay-window = 8").unwrap();
        assert_eq!(config, Config::new().with_replay_window(8));
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_alphabet() {
        let err = Config::from_toml_str(r#"alphabet = "klingon""#).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
