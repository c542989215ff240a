use solseed_core::SolseedError;
use solseed_wallet::WalletError;
use thiserror::Error;

use crate::classifier::FALLBACK_MESSAGE;

/// Main error type for the airdrop crate.
///
/// `Display` renders the human-readable message shown to users, so a failed
/// request can be presented with `to_string()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AirdropError {
    /// Request rejected before any network call
    #[error("{message}")]
    Validation {
        /// Offending request field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Raw failure reported by a ledger client
    #[error("{message}")]
    Ledger {
        /// Error text as returned by the ledger
        message: String,
    },

    /// Confirmation did not arrive in time
    #[error("Transaction confirmation timeout")]
    ConfirmationTimeout,

    /// Faucet rate limit hit; not retried
    #[error("Rate limit exceeded. Please wait a few minutes and try again.")]
    RateLimited,

    /// Faucet kept failing with internal errors for every attempt
    #[error("Faucet is temporarily unavailable. Please try again in a few minutes or use a smaller amount.")]
    FaucetUnavailable,

    /// Faucet is out of funds; not retried
    #[error("Faucet has insufficient funds. Try requesting a smaller amount.")]
    FaucetDepleted,

    /// Every attempt failed with an unrecognized error
    #[error("{message}")]
    Exhausted {
        /// Last error text, or the generic fallback
        message: String,
    },

    /// Caller cancelled the request
    #[error("Airdrop cancelled")]
    Cancelled,

    /// Pipeline misconfiguration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Details
        message: String,
    },

    /// Broken state-machine invariant
    #[error("Invariant violation: {message}")]
    Invariant {
        /// Details
        message: String,
    },
}

/// Result type alias for airdrop operations
pub type Result<T> = std::result::Result<T, AirdropError>;

impl AirdropError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a ledger error from raw text
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::Ledger {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invariant violation
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    /// Final error for attempts that ran out with an unrecognized failure
    pub fn exhausted(last_error: &str) -> Self {
        let message = if last_error.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            last_error.to_string()
        };
        Self::Exhausted { message }
    }

    /// Text handed to the failure classifier
    pub fn raw_message(&self) -> String {
        match self {
            AirdropError::Ledger { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AirdropError::Ledger { .. }
                | AirdropError::ConfirmationTimeout
                | AirdropError::FaucetUnavailable
                | AirdropError::Exhausted { .. }
        )
    }

    /// Check if error is permanent
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AirdropError::Validation { .. }
                | AirdropError::RateLimited
                | AirdropError::FaucetDepleted
                | AirdropError::Configuration { .. }
                | AirdropError::Invariant { .. }
        )
    }

    /// Get error code for external systems
    pub fn code(&self) -> &'static str {
        match self {
            AirdropError::Validation { .. } => "VALIDATION_ERROR",
            AirdropError::Ledger { .. } => "LEDGER_ERROR",
            AirdropError::ConfirmationTimeout => "CONFIRMATION_TIMEOUT",
            AirdropError::RateLimited => "RATE_LIMITED",
            AirdropError::FaucetUnavailable => "FAUCET_UNAVAILABLE",
            AirdropError::FaucetDepleted => "FAUCET_DEPLETED",
            AirdropError::Exhausted { .. } => "RETRIES_EXHAUSTED",
            AirdropError::Cancelled => "CANCELLED",
            AirdropError::Configuration { .. } => "CONFIGURATION_ERROR",
            AirdropError::Invariant { .. } => "INVARIANT_VIOLATION",
        }
    }
}

impl From<WalletError> for AirdropError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InvalidAddress(_) | WalletError::KeyLength { .. } => {
                AirdropError::validation("address", err.to_string())
            }
            other => AirdropError::configuration(other.to_string()),
        }
    }
}

impl From<AirdropError> for SolseedError {
    fn from(err: AirdropError) -> Self {
        match err {
            AirdropError::Validation { .. } => SolseedError::Validation(err.to_string()),
            AirdropError::RateLimited | AirdropError::FaucetDepleted => {
                SolseedError::PermanentService(err.to_string())
            }
            AirdropError::Ledger { .. }
            | AirdropError::ConfirmationTimeout
            | AirdropError::FaucetUnavailable
            | AirdropError::Exhausted { .. } => SolseedError::TransientNetwork(err.to_string()),
            AirdropError::Cancelled => SolseedError::Cancelled(err.to_string()),
            AirdropError::Configuration { message } => SolseedError::Configuration(message),
            AirdropError::Invariant { message } => SolseedError::InvariantViolation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{FAUCET_DEPLETED_MESSAGE, FAUCET_UNAVAILABLE_MESSAGE, RATE_LIMIT_MESSAGE};

    #[test]
    fn test_display_matches_user_messages() {
        assert_eq!(AirdropError::RateLimited.to_string(), RATE_LIMIT_MESSAGE);
        assert_eq!(AirdropError::FaucetUnavailable.to_string(), FAUCET_UNAVAILABLE_MESSAGE);
        assert_eq!(AirdropError::FaucetDepleted.to_string(), FAUCET_DEPLETED_MESSAGE);
    }

    #[test]
    fn test_exhausted_fallback() {
        assert_eq!(AirdropError::exhausted("  ").to_string(), FALLBACK_MESSAGE);
        assert_eq!(AirdropError::exhausted("boom").to_string(), "boom");
    }

    #[test]
    fn test_categorization() {
        assert!(AirdropError::ConfirmationTimeout.is_retryable());
        assert!(AirdropError::RateLimited.is_permanent());
        assert!(!AirdropError::Cancelled.is_retryable());
        assert!(matches!(
            SolseedError::from(AirdropError::FaucetDepleted),
            SolseedError::PermanentService(_)
        ));
        assert!(matches!(
            SolseedError::from(AirdropError::validation("amount", "must be positive")),
            SolseedError::Validation(_)
        ));
    }

    #[test]
    fn test_wallet_address_error_is_validation() {
        let err = AirdropError::from(WalletError::InvalidAddress("xyz".to_string()));
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
