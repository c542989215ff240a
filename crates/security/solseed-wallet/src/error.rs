//! Error types for solseed-wallet

use solseed_core::SolseedError;
use thiserror::Error;

/// Result type alias for solseed-wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Main error type for solseed-wallet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Phrase is not a valid BIP-39 mnemonic
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Derivation path text or segment is malformed
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    /// A path segment without the hardening offset reached the Ed25519 engine
    #[error("Non-hardened segment at position {position} in {path}; Ed25519 supports hardened derivation only")]
    NonHardenedSegment {
        /// Rendered path
        path: String,
        /// Zero-based segment position
        position: usize,
    },

    /// Key material with an unexpected length
    #[error("Key length mismatch: expected {expected} bytes, got {actual}")]
    KeyLength {
        /// Required length
        expected: usize,
        /// Observed length
        actual: usize,
    },

    /// Address is not base58 or does not decode to a 32-byte key
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The session holds no mnemonic
    #[error("No mnemonic loaded in session")]
    NoMnemonic,

    /// Registry already holds wallets from a different mnemonic
    #[error("Registry is bound to a different mnemonic; clear it before deriving from this session")]
    SessionMismatch,

    /// Wallet lookup failed
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    /// Wallet-extension provider is not available
    #[error("{provider} wallet not found; install it from {install_url}")]
    ProviderNotInstalled {
        /// Provider display name
        provider: String,
        /// Where to get it
        install_url: String,
    },

    /// Wallet-extension provider refused or failed the handshake
    #[error("{provider} connection failed: {message}")]
    ProviderConnection {
        /// Provider display name
        provider: String,
        /// Provider-reported reason
        message: String,
    },

    /// Cryptographic primitive failure
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl WalletError {
    /// Check if this error indicates a programming or configuration defect
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            WalletError::NonHardenedSegment { .. } | WalletError::KeyLength { .. } | WalletError::Crypto(_)
        )
    }

    /// Check if this error is caused by caller input (4xx-like)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidMnemonic(_)
                | WalletError::InvalidPath(_)
                | WalletError::InvalidAddress(_)
                | WalletError::NoMnemonic
                | WalletError::SessionMismatch
                | WalletError::WalletNotFound(_)
        )
    }

    /// Get error code for external systems
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::InvalidMnemonic(_) => "INVALID_MNEMONIC",
            WalletError::InvalidPath(_) => "INVALID_PATH",
            WalletError::NonHardenedSegment { .. } => "NON_HARDENED_SEGMENT",
            WalletError::KeyLength { .. } => "KEY_LENGTH",
            WalletError::InvalidAddress(_) => "INVALID_ADDRESS",
            WalletError::NoMnemonic => "NO_MNEMONIC",
            WalletError::SessionMismatch => "SESSION_MISMATCH",
            WalletError::WalletNotFound(_) => "WALLET_NOT_FOUND",
            WalletError::ProviderNotInstalled { .. } => "PROVIDER_NOT_INSTALLED",
            WalletError::ProviderConnection { .. } => "PROVIDER_CONNECTION",
            WalletError::Crypto(_) => "CRYPTO_ERROR",
        }
    }
}

impl From<bip39::Error> for WalletError {
    fn from(err: bip39::Error) -> Self {
        WalletError::InvalidMnemonic(err.to_string())
    }
}

impl From<WalletError> for SolseedError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NonHardenedSegment { .. } | WalletError::KeyLength { .. } => {
                SolseedError::InvariantViolation(err.to_string())
            }
            WalletError::Crypto(msg) => SolseedError::Cryptographic(msg),
            WalletError::WalletNotFound(id) => SolseedError::NotFound(id),
            WalletError::ProviderConnection { .. } => SolseedError::PermanentService(err.to_string()),
            _ => SolseedError::Validation(err.to_string()),
        }
    }
}
