//! Explicit holder for the active mnemonic.

use tracing::info;

use crate::mnemonic::Mnemonic;
use crate::seed::Seed;
use crate::{Result, WalletError};

struct Loaded {
    mnemonic: Mnemonic,
    seed: Seed,
    fingerprint: [u8; 8],
}

/// The mnemonic wallets are currently derived from.
///
/// The seed is stretched once at load time. Dropping or clearing the session
/// wipes both the phrase and the seed.
#[derive(Default)]
pub struct MnemonicSession {
    loaded: Option<Loaded>,
}

impl MnemonicSession {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Session holding `mnemonic` with an empty passphrase
    pub fn with_mnemonic(mnemonic: Mnemonic) -> Self {
        let mut session = Self::new();
        session.load(mnemonic);
        session
    }

    /// Replace the active mnemonic, using an empty passphrase
    pub fn load(&mut self, mnemonic: Mnemonic) {
        self.load_with_passphrase(mnemonic, "");
    }

    /// Replace the active mnemonic
    pub fn load_with_passphrase(&mut self, mnemonic: Mnemonic, passphrase: &str) {
        let seed = mnemonic.to_seed(passphrase);
        let fingerprint = seed.fingerprint();
        info!(
            words = mnemonic.word_count().words(),
            session = %hex::encode(fingerprint),
            "Mnemonic loaded"
        );
        self.loaded = Some(Loaded {
            mnemonic,
            seed,
            fingerprint,
        });
    }

    /// Parse `phrase` and load it
    pub fn load_phrase(&mut self, phrase: &str) -> Result<()> {
        self.load(Mnemonic::parse(phrase)?);
        Ok(())
    }

    /// Forget the active mnemonic
    pub fn clear(&mut self) {
        if self.loaded.take().is_some() {
            info!("Mnemonic cleared");
        }
    }

    /// Whether a mnemonic is loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The active mnemonic
    pub fn mnemonic(&self) -> Result<&Mnemonic> {
        self.loaded.as_ref().map(|l| &l.mnemonic).ok_or(WalletError::NoMnemonic)
    }

    /// Seed of the active mnemonic
    pub fn seed(&self) -> Result<&Seed> {
        self.loaded.as_ref().map(|l| &l.seed).ok_or(WalletError::NoMnemonic)
    }

    /// Identifier of the active seed, used to bind registries to a session
    pub fn fingerprint(&self) -> Option<[u8; 8]> {
        self.loaded.as_ref().map(|l| l.fingerprint)
    }
}

impl std::fmt::Debug for MnemonicSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MnemonicSession")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
