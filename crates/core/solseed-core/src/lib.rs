//! # Solseed Core
//!
//! Shared foundation for the Solseed crates: the error taxonomy every
//! component reports through, layered configuration, tracing setup and the
//! small runtime abstractions (clock, cancellation) the airdrop pipeline is
//! driven by.
//!
//! ## Features
//!
//! - **Error Handling**: [`SolseedError`] and the [`SolseedResult`] alias
//! - **Configuration**: typed [`config::SolseedConfig`] loaded from TOML + environment
//! - **Observability**: [`observability::init_tracing`]
//! - **Runtime**: [`runtime::Clock`] and [`runtime::CancellationToken`]
//!
//! ## Quick Start
//!
//! ```rust
//! use solseed_core::{SolseedError, SolseedResult};
//!
//! fn checked_count(count: usize) -> SolseedResult<usize> {
//!     if count == 0 {
//!         return Err(SolseedError::validation("count must be positive"));
//!     }
//!     Ok(count)
//! }
//!
//! assert!(checked_count(0).is_err());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod observability;
pub mod runtime;
pub mod traits;

// Re-export commonly used items
pub use error::{SolseedError, SolseedResult};
pub use runtime::{CancellationToken, Clock, TokioClock};
pub use traits::Validatable;

/// Version information for the Solseed Core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the Solseed Core library
pub const NAME: &str = env!("CARGO_PKG_NAME");
