//! Error taxonomy shared by all Solseed crates.
//!
//! Component crates keep their own detailed error enums and map them into
//! [`SolseedError`] so callers can make retry and presentation decisions
//! without knowing which component failed.

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for the Solseed ecosystem.
///
/// Variants follow the four failure categories the wallet and airdrop
/// components distinguish, plus a few infrastructure cases.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolseedError {
    /// Malformed user input: mnemonic, address, amount or path configuration
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transient remote failure that may succeed on a later attempt
    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    /// Remote service refused the request and retrying will not help
    #[error("Service error: {0}")]
    PermanentService(String),

    /// Broken internal invariant (programming or configuration defect)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cryptographic operation errors
    #[error("Cryptographic error: {0}")]
    Cryptographic(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Operation cancelled by the caller
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SolseedError {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create a new transient network error
    pub fn transient<T: fmt::Display>(msg: T) -> Self {
        Self::TransientNetwork(msg.to_string())
    }

    /// Create a new permanent service error
    pub fn permanent<T: fmt::Display>(msg: T) -> Self {
        Self::PermanentService(msg.to_string())
    }

    /// Create a new invariant violation
    pub fn invariant<T: fmt::Display>(msg: T) -> Self {
        Self::InvariantViolation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Create a new cryptographic error
    pub fn crypto<T: fmt::Display>(msg: T) -> Self {
        Self::Cryptographic(msg.to_string())
    }

    /// Create a new not found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Self::NotFound(msg.to_string())
    }

    /// Create a new cancellation error
    pub fn cancelled<T: fmt::Display>(msg: T) -> Self {
        Self::Cancelled(msg.to_string())
    }

    /// Create a new internal error
    pub fn internal<T: fmt::Display>(msg: T) -> Self {
        Self::Internal(msg.to_string())
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }

    /// Check if this error is a client error (4xx-style)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }

    /// Check if this error must abort the operation rather than be shown as a
    /// recoverable message
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_) | Self::Internal(_))
    }
}

/// Result type alias for Solseed operations
pub type SolseedResult<T> = Result<T, SolseedError>;

impl From<std::io::Error> for SolseedError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for SolseedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(feature = "config")]
impl From<config::ConfigError> for SolseedError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
