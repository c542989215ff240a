//! # Solseed Wallet
//!
//! Deterministic Ed25519 wallets from a single BIP-39 mnemonic.
//!
//! ## Features
//!
//! - **Mnemonics**: generation and validation against the English word list
//! - **Seeds**: PBKDF2-HMAC-SHA512 stretching with optional passphrase
//! - **Derivation**: SLIP-0010 hardened-only paths (`m/44'/501'/n'/0'`)
//! - **Registry**: ordered wallets with stable, never-reused account indices
//! - **Providers**: extension-wallet capability and connection bookkeeping
//!
//! ## Quick Start
//!
//! ```rust
//! use solseed_wallet::{MnemonicSession, WalletRegistry};
//!
//! fn main() -> solseed_wallet::Result<()> {
//!     let mut session = MnemonicSession::new();
//!     session.load_phrase(
//!         "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     )?;
//!
//!     let mut registry = WalletRegistry::new();
//!     let wallet = registry.add_wallet(&session)?;
//!     assert_eq!(wallet.path().to_string(), "m/44'/501'/0'/0'");
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

/// SLIP-0010 Ed25519 derivation
pub mod derivation;

/// Error types for the library
pub mod error;

/// Keypairs, public keys and addresses
pub mod keypair;

/// BIP-39 mnemonics
pub mod mnemonic;

/// Extension-wallet providers
pub mod provider;

/// Wallet registry
pub mod registry;

/// BIP-39 seeds
pub mod seed;

/// Active mnemonic holder
pub mod session;

/// Derived wallets
pub mod wallet;

// Re-export commonly used types
pub use derivation::{derive, ChildIndex, DerivationPath, DerivedKeyMaterial};
pub use error::{Result, WalletError};
pub use keypair::{fingerprint, is_valid_address, Keypair, PublicKey};
pub use mnemonic::{validate, validate_phrase, Mnemonic, WordCount};
pub use provider::{Connection, ConnectionMethod, ProviderKind, ProviderRegistry, WalletProvider};
pub use registry::WalletRegistry;
pub use seed::{to_seed, Seed};
pub use session::MnemonicSession;
pub use wallet::{derive_wallet, Wallet, WalletExport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
