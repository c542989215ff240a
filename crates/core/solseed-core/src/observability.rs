//! Tracing setup.
//!
//! Library code only emits `tracing` events; binaries and tests decide where
//! they go by calling [`init_tracing`] once.

use crate::config::LoggingConfig;
use crate::{SolseedError, SolseedResult};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`. Fails if a
/// global subscriber is already installed or the filter does not parse.
pub fn init_tracing(config: &LoggingConfig) -> SolseedResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| SolseedError::config(format!("invalid log filter '{}': {e}", config.level)))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| SolseedError::config(format!("failed to install tracing subscriber: {e}")))
}

/// Install a test-friendly subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}
