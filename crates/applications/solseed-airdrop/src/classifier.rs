//! Maps raw faucet error text to a retry decision and a user-facing message.
//!
//! Patterns are tested case-insensitively in a fixed order and the first match
//! wins, so a message mentioning both a 429 and an internal error is treated
//! as rate limiting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message for rate-limited requests
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait a few minutes and try again.";

/// Message for faucet-side internal errors
pub const FAUCET_UNAVAILABLE_MESSAGE: &str =
    "Faucet is temporarily unavailable. Please try again in a few minutes or use a smaller amount.";

/// Message for an empty faucet
pub const FAUCET_DEPLETED_MESSAGE: &str = "Faucet has insufficient funds. Try requesting a smaller amount.";

/// Message when no better description is available
pub const FALLBACK_MESSAGE: &str = "Failed to request airdrop after multiple attempts";

/// Raw text recorded when the faucet never answers a request
pub const REQUEST_TIMEOUT_MESSAGE: &str = "Airdrop request timeout";

/// Text recorded when a confirmation wait runs out
pub const CONFIRMATION_TIMEOUT_MESSAGE: &str = "Transaction confirmation timeout";

/// Category of a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// "rate limit" or "429"
    RateLimited,
    /// "internal error"
    TransientInternal,
    /// "insufficient funds"
    FaucetDepleted,
    /// Anything else, including confirmation timeouts
    Unknown,
}

impl FailureClass {
    /// Classify raw error text
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("rate limit") || lowered.contains("429") {
            FailureClass::RateLimited
        } else if lowered.contains("internal error") {
            FailureClass::TransientInternal
        } else if lowered.contains("insufficient funds") {
            FailureClass::FaucetDepleted
        } else {
            FailureClass::Unknown
        }
    }

    /// Whether another attempt may follow
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureClass::TransientInternal | FailureClass::Unknown)
    }

    /// Whether a linear backoff precedes the next attempt
    pub fn backs_off(self) -> bool {
        matches!(self, FailureClass::TransientInternal)
    }

    /// Message shown for this failure; unknown failures keep the raw text
    pub fn user_message(self, raw: &str) -> String {
        match self {
            FailureClass::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            FailureClass::TransientInternal => FAUCET_UNAVAILABLE_MESSAGE.to_string(),
            FailureClass::FaucetDepleted => FAUCET_DEPLETED_MESSAGE.to_string(),
            FailureClass::Unknown if raw.trim().is_empty() => FALLBACK_MESSAGE.to_string(),
            FailureClass::Unknown => raw.to_string(),
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureClass::RateLimited => "rate_limited",
            FailureClass::TransientInternal => "transient_internal",
            FailureClass::FaucetDepleted => "faucet_depleted",
            FailureClass::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classify raw error text (see [`FailureClass::classify`])
pub fn classify(raw: &str) -> FailureClass {
    FailureClass::classify(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("429 Too Many Requests", FailureClass::RateLimited ; "status code")]
    #[test_case("You've hit the Rate Limit", FailureClass::RateLimited ; "mixed case")]
    #[test_case("Internal error", FailureClass::TransientInternal ; "internal")]
    #[test_case("INTERNAL ERROR: airdrop failed", FailureClass::TransientInternal ; "upper case internal")]
    #[test_case("airdrop request failed: insufficient funds", FailureClass::FaucetDepleted ; "depleted")]
    #[test_case("Transaction confirmation timeout", FailureClass::Unknown ; "timeout")]
    #[test_case("Airdrop request timeout", FailureClass::Unknown ; "request timeout")]
    #[test_case("", FailureClass::Unknown ; "empty")]
    #[test_case("Internal error (429)", FailureClass::RateLimited ; "rate limit wins")]
    #[test_case("internal error: insufficient funds", FailureClass::TransientInternal ; "internal before depleted")]
    fn test_classify(raw: &str, expected: FailureClass) {
        assert_eq!(classify(raw), expected);
    }

    #[test]
    fn test_retry_matrix() {
        assert!(!FailureClass::RateLimited.is_retryable());
        assert!(!FailureClass::FaucetDepleted.is_retryable());
        assert!(FailureClass::TransientInternal.is_retryable());
        assert!(FailureClass::TransientInternal.backs_off());
        assert!(FailureClass::Unknown.is_retryable());
        assert!(!FailureClass::Unknown.backs_off());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(FailureClass::RateLimited.user_message("429"), RATE_LIMIT_MESSAGE);
        assert_eq!(FailureClass::Unknown.user_message("socket hang up"), "socket hang up");
        assert_eq!(FailureClass::Unknown.user_message(""), FALLBACK_MESSAGE);
    }
}
