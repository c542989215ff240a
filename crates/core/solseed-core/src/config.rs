//! Configuration management for the Solseed crates.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables (`SOLSEED__AIRDROP__MAX_RETRIES=5` style, `__`
//! separating nested keys).

use crate::{SolseedError, SolseedResult, traits::Validatable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "SOLSEED";

/// Word counts a BIP-39 phrase may have
pub const SUPPORTED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SolseedConfig {
    /// Wallet derivation settings
    pub wallet: WalletSettings,
    /// Faucet request settings
    pub airdrop: AirdropSettings,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Wallet derivation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletSettings {
    /// SLIP-44 coin type used in `m/44'/<coin_type>'/<account>'/0'`
    pub coin_type: u32,
    /// Number of words in freshly generated phrases
    pub word_count: usize,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            coin_type: 501,
            word_count: 12,
        }
    }
}

/// Faucet request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirdropSettings {
    /// Total attempts per request, counted from 1
    pub max_retries: u32,
    /// Upper bound on waiting for the faucet to accept a request, in seconds
    pub request_timeout_secs: u64,
    /// Upper bound on waiting for a confirmation, in seconds
    pub confirmation_timeout_secs: u64,
    /// Linear backoff step in seconds; the wait before attempt `n + 1` is `step * n`
    pub backoff_step_secs: u64,
    /// Network name used when a request does not specify one
    pub default_network: String,
    /// Amount in SOL used when a request does not specify one
    pub default_amount: Decimal,
}

impl Default for AirdropSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            request_timeout_secs: 30,
            confirmation_timeout_secs: 30,
            backoff_step_secs: 2,
            default_network: "devnet".to_string(),
            default_amount: Decimal::ONE,
        }
    }
}

impl AirdropSettings {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Confirmation timeout as a [`Duration`]
    #[must_use]
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    /// Backoff step as a [`Duration`]
    #[must_use]
    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `solseed_airdrop=debug`
    pub level: String,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SolseedConfig {
    /// Load configuration from an optional TOML file and `SOLSEED__*` variables
    #[cfg(feature = "config")]
    pub fn load(path: Option<&Path>) -> SolseedResult<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration using a custom environment prefix
    #[cfg(feature = "config")]
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> SolseedResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text (no environment layering)
    #[cfg(feature = "config")]
    pub fn from_toml_str(content: &str) -> SolseedResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Validatable for SolseedConfig {
    fn validate(&self) -> SolseedResult<()> {
        self.wallet.validate()?;
        self.airdrop.validate()?;
        self.logging.validate()
    }
}

impl Validatable for WalletSettings {
    fn validate(&self) -> SolseedResult<()> {
        if self.coin_type >= 0x8000_0000 {
            return Err(SolseedError::config(format!(
                "coin_type {} does not fit a hardened path segment",
                self.coin_type
            )));
        }
        if !SUPPORTED_WORD_COUNTS.contains(&self.word_count) {
            return Err(SolseedError::config(format!(
                "word_count must be one of {SUPPORTED_WORD_COUNTS:?}, got {}",
                self.word_count
            )));
        }
        Ok(())
    }
}

impl Validatable for AirdropSettings {
    fn validate(&self) -> SolseedResult<()> {
        if self.max_retries == 0 {
            return Err(SolseedError::config("max_retries must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SolseedError::config("request_timeout_secs must be positive"));
        }
        if self.confirmation_timeout_secs == 0 {
            return Err(SolseedError::config("confirmation_timeout_secs must be positive"));
        }
        if self.default_amount <= Decimal::ZERO {
            return Err(SolseedError::config("default_amount must be positive"));
        }
        if self.default_network.trim().is_empty() {
            return Err(SolseedError::config("default_network must not be empty"));
        }
        Ok(())
    }
}

impl Validatable for LoggingConfig {
    fn validate(&self) -> SolseedResult<()> {
        if self.level.trim().is_empty() {
            return Err(SolseedError::config("logging level must not be empty"));
        }
        Ok(())
    }
}
