//! Ordered collection of wallets derived from one mnemonic.

use solseed_core::config::WalletSettings;
use tracing::{info, warn};

use crate::derivation::SOLANA_COIN_TYPE;
use crate::session::MnemonicSession;
use crate::wallet::{derive_wallet, Wallet};
use crate::{Result, WalletError};

/// Insertion-ordered wallet registry.
///
/// Account indices grow by one per added wallet and are never handed out
/// twice, even after removals. Only [`WalletRegistry::clear`] starts over at
/// zero. The registry remembers which seed it derived from and refuses to mix
/// wallets from another one.
#[derive(Debug)]
pub struct WalletRegistry {
    coin_type: u32,
    wallets: Vec<Wallet>,
    next_account: u32,
    bound_to: Option<[u8; 8]>,
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self::with_coin_type(SOLANA_COIN_TYPE)
    }
}

impl WalletRegistry {
    /// Empty registry using the Solana coin type
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry deriving under `coin_type`
    pub fn with_coin_type(coin_type: u32) -> Self {
        Self {
            coin_type,
            wallets: Vec::new(),
            next_account: 0,
            bound_to: None,
        }
    }

    /// Empty registry configured from settings
    pub fn from_settings(settings: &WalletSettings) -> Self {
        Self::with_coin_type(settings.coin_type)
    }

    /// Derive the next wallet from `session` and append it
    pub fn add_wallet(&mut self, session: &MnemonicSession) -> Result<&Wallet> {
        let seed = session.seed()?;
        let session_id = session.fingerprint().ok_or(WalletError::NoMnemonic)?;
        if self.bound_to.is_some_and(|bound| bound != session_id) {
            warn!(wallets = self.wallets.len(), "Refusing to derive from a different mnemonic");
            return Err(WalletError::SessionMismatch);
        }

        let account = self.next_account;
        let mut wallet = derive_wallet(seed, self.coin_type, account)?;
        if self.get(wallet.id()).is_some() {
            let unique = format!("{}-{account}", wallet.id);
            warn!(wallet_id = %wallet.id, replacement = %unique, "Wallet id collision");
            wallet.id = unique;
        }

        self.bound_to = Some(session_id);
        self.next_account = account + 1;

        info!(
            wallet_id = %wallet.id(),
            account,
            path = %wallet.path(),
            "Wallet added"
        );

        let position = self.wallets.len();
        self.wallets.push(wallet);
        Ok(&self.wallets[position])
    }

    /// Derive `count` consecutive wallets
    pub fn generate_wallets(&mut self, session: &MnemonicSession, count: usize) -> Result<&[Wallet]> {
        let start = self.wallets.len();
        for _ in 0..count {
            self.add_wallet(session)?;
        }
        Ok(&self.wallets[start..])
    }

    /// Remove a wallet; other wallets keep their paths
    pub fn remove_wallet(&mut self, id: &str) -> Result<Wallet> {
        let position = self
            .wallets
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))?;
        let wallet = self.wallets.remove(position);
        info!(wallet_id = %id, account = wallet.account_index(), "Wallet removed");
        Ok(wallet)
    }

    /// Remove every wallet, restart account numbering and drop the session binding
    pub fn clear(&mut self) {
        let removed = self.wallets.len();
        self.wallets.clear();
        self.next_account = 0;
        self.bound_to = None;
        info!(removed, "Wallet registry cleared");
    }

    /// Look up a wallet by id
    pub fn get(&self, id: &str) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id() == id)
    }

    /// Wallets in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Wallet> {
        self.wallets.iter()
    }

    /// Wallets as a slice
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    /// Number of wallets
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether the registry holds no wallets
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Account index the next wallet will use
    pub fn next_account(&self) -> u32 {
        self.next_account
    }

    /// Coin type segment used for new wallets
    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }
}

impl<'a> IntoIterator for &'a WalletRegistry {
    type Item = &'a Wallet;
    type IntoIter = std::slice::Iter<'a, Wallet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
