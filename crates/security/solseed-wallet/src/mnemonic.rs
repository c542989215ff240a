//! BIP-39 mnemonic generation and validation (English word list).
//!
//! Entropy comes from the operating system CSPRNG. The phrase is kept in
//! canonical form (single spaces, NFKD) and wiped from memory on drop.

use bip39::Language;
use rand_core::{OsRng, RngCore};
use solseed_core::config::WalletSettings;
use std::fmt;
use zeroize::Zeroizing;

use crate::seed::{self, Seed};
use crate::{Result, WalletError};

/// Supported phrase lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordCount {
    /// 128 bits of entropy + 4 checksum bits
    #[default]
    Words12,
    /// 160 bits of entropy + 5 checksum bits
    Words15,
    /// 192 bits of entropy + 6 checksum bits
    Words18,
    /// 224 bits of entropy + 7 checksum bits
    Words21,
    /// 256 bits of entropy + 8 checksum bits
    Words24,
}

impl WordCount {
    /// Number of words in the phrase
    pub fn words(self) -> usize {
        match self {
            WordCount::Words12 => 12,
            WordCount::Words15 => 15,
            WordCount::Words18 => 18,
            WordCount::Words21 => 21,
            WordCount::Words24 => 24,
        }
    }

    /// Entropy size in bytes
    pub fn entropy_bytes(self) -> usize {
        self.words() * 4 / 3
    }

    /// Map a word count to its variant
    pub fn from_words(words: usize) -> Result<Self> {
        match words {
            12 => Ok(WordCount::Words12),
            15 => Ok(WordCount::Words15),
            18 => Ok(WordCount::Words18),
            21 => Ok(WordCount::Words21),
            24 => Ok(WordCount::Words24),
            other => Err(WalletError::InvalidMnemonic(format!(
                "unsupported word count {other}; expected 12, 15, 18, 21 or 24"
            ))),
        }
    }
}

/// A validated BIP-39 phrase
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: Zeroizing<String>,
    word_count: WordCount,
}

impl Mnemonic {
    /// Generate a fresh 12-word phrase
    pub fn generate() -> Result<Self> {
        Self::generate_with(WordCount::Words12)
    }

    /// Generate a fresh phrase of the given length
    pub fn generate_with(word_count: WordCount) -> Result<Self> {
        let mut entropy = Zeroizing::new(vec![0u8; word_count.entropy_bytes()]);
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| WalletError::Crypto(format!("entropy source unavailable: {e}")))?;

        let inner = bip39::Mnemonic::from_entropy_in(Language::English, &entropy)?;
        Ok(Self {
            phrase: Zeroizing::new(inner.to_string()),
            word_count,
        })
    }

    /// Generate a fresh phrase with the configured word count
    pub fn generate_from_settings(settings: &WalletSettings) -> Result<Self> {
        Self::generate_with(WordCount::from_words(settings.word_count)?)
    }

    /// Parse and validate a phrase, reporting why it is rejected
    pub fn parse(phrase: &str) -> Result<Self> {
        let inner = bip39::Mnemonic::parse_in(Language::English, phrase)?;
        let word_count = WordCount::from_words(inner.word_count())?;
        Ok(Self {
            phrase: Zeroizing::new(inner.to_string()),
            word_count,
        })
    }

    /// The canonical phrase
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Iterate over the words
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.phrase.split(' ')
    }

    /// Phrase length
    pub fn word_count(&self) -> WordCount {
        self.word_count
    }

    /// Derive the 64-byte seed (see [`seed::to_seed`])
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        seed::to_seed(self, passphrase)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.word_count.words())
            .finish_non_exhaustive()
    }
}

impl std::str::FromStr for Mnemonic {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Generate a fresh 12-word phrase
pub fn generate() -> Result<Mnemonic> {
    Mnemonic::generate()
}

/// Check a candidate word sequence.
///
/// Each element must be exactly one word. Returns `false` for unknown words,
/// unsupported lengths and checksum mismatches; never panics.
pub fn validate<S: AsRef<str>>(words: &[S]) -> bool {
    let malformed = |word: &str| word.is_empty() || word.chars().any(char::is_whitespace);
    if words.is_empty() || words.iter().any(|w| malformed(w.as_ref())) {
        return false;
    }
    let phrase = Zeroizing::new(words.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" "));
    Mnemonic::parse(&phrase).is_ok_and(|m| m.word_count().words() == words.len())
}

/// Check a whitespace-separated phrase
pub fn validate_phrase(phrase: &str) -> bool {
    Mnemonic::parse(phrase).is_ok()
}
