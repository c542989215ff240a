//! # Solseed Airdrop
//!
//! Requests test funds from a devnet or testnet faucet and reports a single
//! human-readable outcome.
//!
//! A request is validated before any network call, then driven through a
//! sans-IO state machine ([`machine::AirdropMachine`]). Failures are
//! classified from the faucet's error text: rate limiting and an empty faucet
//! stop immediately, internal errors back off linearly (2 s, 4 s, ...) and
//! anything else, including a request or confirmation timeout, is retried straight away
//! until the attempts run out.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rust_decimal_macros::dec;
//! use solseed_airdrop::{AirdropPipelineBuilder, AirdropRequest, Network, ScriptedLedger};
//!
//! #[tokio::main]
//! async fn main() -> solseed_airdrop::Result<()> {
//!     let pipeline = AirdropPipelineBuilder::new()
//!         .with_ledger(Network::Devnet, Arc::new(ScriptedLedger::new()))
//!         .build()?;
//!
//!     let request = AirdropRequest::new(
//!         "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
//!         Network::Devnet,
//!         dec!(1),
//!     );
//!     let receipt = pipeline.request_airdrop(&request).await?;
//!     assert_eq!(receipt.attempts, 1);
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

/// Pipeline construction
pub mod builder;

/// Failure classification
pub mod classifier;

/// Error types for the library
pub mod error;

/// Amount, address and explorer formatting
pub mod format;

/// Ledger client abstraction
pub mod ledger;

/// Retry state machine
pub mod machine;

/// Async pipeline driver
pub mod pipeline;

/// Requests, results and networks
pub mod types;

// Re-export commonly used types
pub use builder::AirdropPipelineBuilder;
pub use classifier::{classify, FailureClass};
pub use error::{AirdropError, Result};
pub use format::{explorer_address_url, explorer_tx_url, format_sol, shorten_address};
pub use ledger::{Confirmation, LedgerClient, ScriptedLedger};
pub use machine::{AirdropMachine, RetryPolicy};
pub use pipeline::AirdropPipeline;
pub use types::{
    lamports_to_sol, sol_to_lamports, AirdropReceipt, AirdropRequest, AirdropResult, Network,
    AMOUNT_PRESETS, LAMPORTS_PER_SOL,
};
