use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use solseed_wallet::PublicKey;
use std::fmt;
use std::str::FromStr;

use crate::error::{AirdropError, Result};

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Amounts offered as one-click choices, in SOL
pub const AMOUNT_PRESETS: [Decimal; 4] = [dec!(0.5), dec!(1), dec!(2), dec!(5)];

/// Networks that run a faucet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Development cluster
    #[default]
    Devnet,
    /// Test cluster
    Testnet,
}

impl Network {
    /// Every supported network
    pub const ALL: [Network; 2] = [Network::Devnet, Network::Testnet];

    /// Public JSON-RPC endpoint
    pub fn rpc_url(self) -> &'static str {
        match self {
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
        }
    }

    /// Cluster name used by the block explorer
    pub fn cluster(self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Network::Devnet => "Devnet",
            Network::Testnet => "Testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cluster())
    }
}

impl FromStr for Network {
    type Err = AirdropError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(AirdropError::validation(
                "network",
                format!("Unsupported network '{other}'; faucets exist on devnet and testnet only"),
            )),
        }
    }
}

/// Convert SOL to lamports.
///
/// The amount must be positive and expressible in whole lamports.
pub fn sol_to_lamports(amount: Decimal) -> Result<u64> {
    if amount <= Decimal::ZERO {
        return Err(AirdropError::validation("amount", "Amount must be greater than zero"));
    }
    let lamports = amount
        .checked_mul(Decimal::from(LAMPORTS_PER_SOL))
        .ok_or_else(|| AirdropError::validation("amount", "Amount is too large"))?;
    if !lamports.fract().is_zero() {
        return Err(AirdropError::validation(
            "amount",
            "Amount has more than 9 decimal places",
        ));
    }
    lamports
        .to_u64()
        .ok_or_else(|| AirdropError::validation("amount", "Amount is too large"))
}

/// Convert lamports to SOL
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

/// A faucet request as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropRequest {
    /// Base58 destination address
    pub address: String,
    /// Target network
    pub network: Network,
    /// Amount in SOL
    pub amount: Decimal,
}

impl AirdropRequest {
    /// Create a request
    pub fn new(address: impl Into<String>, network: Network, amount: Decimal) -> Self {
        Self {
            address: address.into(),
            network,
            amount,
        }
    }

    /// Check the request without touching the network
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let address = PublicKey::from_base58(self.address.trim())?;
        let lamports = sol_to_lamports(self.amount)?;
        Ok(ValidatedRequest {
            address,
            network: self.network,
            amount: self.amount,
            lamports,
        })
    }
}

/// A request whose address and amount passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Destination key
    pub address: PublicKey,
    /// Target network
    pub network: Network,
    /// Amount in SOL
    pub amount: Decimal,
    /// Amount in lamports
    pub lamports: u64,
}

/// Confirmed airdrop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropReceipt {
    /// Transaction signature
    pub signature: String,
    /// Amount in SOL
    pub amount: Decimal,
    /// Amount in lamports
    pub lamports: u64,
    /// Attempt that succeeded, counted from 1
    pub attempts: u32,
}

/// Presentation form of a finished request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AirdropResult {
    /// Funds confirmed
    Succeeded {
        /// Transaction signature
        signature: String,
        /// Amount in SOL
        amount: Decimal,
    },
    /// Request failed
    Failed {
        /// Human-readable reason
        error: String,
    },
}

impl AirdropResult {
    /// Whether the request succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, AirdropResult::Succeeded { .. })
    }
}

impl From<Result<AirdropReceipt>> for AirdropResult {
    fn from(result: Result<AirdropReceipt>) -> Self {
        match result {
            Ok(receipt) => AirdropResult::Succeeded {
                signature: receipt.signature,
                amount: receipt.amount,
            },
            Err(e) => AirdropResult::Failed { error: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_network_metadata() {
        assert_eq!(Network::Devnet.rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(Network::Testnet.cluster(), "testnet");
        assert_eq!("DevNet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!(Network::Testnet.to_string(), "testnet");
        assert_eq!(
            "mainnet-beta".parse::<Network>().unwrap_err().code(),
            "VALIDATION_ERROR"
        );
    }

    #[test_case(dec!(1), 1_000_000_000 ; "one sol")]
    #[test_case(dec!(0.5), 500_000_000 ; "half")]
    #[test_case(dec!(0.000000001), 1 ; "one lamport")]
    fn test_sol_to_lamports(amount: Decimal, expected: u64) {
        assert_eq!(sol_to_lamports(amount).unwrap(), expected);
    }

    #[test_case(dec!(0) ; "zero")]
    #[test_case(dec!(-1) ; "negative")]
    #[test_case(dec!(0.0000000001) ; "sub lamport")]
    fn test_sol_to_lamports_rejects(amount: Decimal) {
        assert!(sol_to_lamports(amount).is_err());
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(1_500_000_000), dec!(1.5));
        assert_eq!(lamports_to_sol(0), Decimal::ZERO);
    }

    #[test]
    fn test_presets_are_valid_amounts() {
        for preset in AMOUNT_PRESETS {
            assert!(sol_to_lamports(preset).is_ok());
        }
    }

    #[test]
    fn test_validate_request() {
        let address = bs58_address();
        let validated = AirdropRequest::new(address.clone(), Network::Devnet, dec!(2))
            .validate()
            .unwrap();
        assert_eq!(validated.lamports, 2_000_000_000);
        assert_eq!(validated.address.to_base58(), address);

        let err = AirdropRequest::new("not base58!", Network::Devnet, dec!(1))
            .validate()
            .unwrap_err();
        assert!(matches!(err, AirdropError::Validation { ref field, .. } if field == "address"));
    }

    #[test]
    fn test_result_from_receipt() {
        let ok: Result<AirdropReceipt> = Ok(AirdropReceipt {
            signature: "sig".to_string(),
            amount: dec!(1),
            lamports: LAMPORTS_PER_SOL,
            attempts: 1,
        });
        assert!(AirdropResult::from(ok).is_success());

        let failed = AirdropResult::from(Err(AirdropError::RateLimited));
        assert_eq!(
            failed,
            AirdropResult::Failed {
                error: crate::classifier::RATE_LIMIT_MESSAGE.to_string()
            }
        );
    }

    fn bs58_address() -> String {
        PublicKey::from_bytes(&[4u8; 32]).unwrap().to_base58()
    }
}
