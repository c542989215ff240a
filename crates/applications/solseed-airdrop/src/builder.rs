use rust_decimal::Decimal;
use solseed_core::config::AirdropSettings;
use solseed_core::{Clock, TokioClock, Validatable};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AirdropError, Result};
use crate::ledger::LedgerClient;
use crate::machine::RetryPolicy;
use crate::pipeline::AirdropPipeline;
use crate::types::{sol_to_lamports, Network};

/// Builder for an [`AirdropPipeline`]
pub struct AirdropPipelineBuilder {
    ledgers: HashMap<Network, Arc<dyn LedgerClient>>,
    clock: Option<Arc<dyn Clock>>,
    policy: RetryPolicy,
    default_network: Network,
    default_amount: Decimal,
}

impl Default for AirdropPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AirdropPipelineBuilder {
    /// Create a new builder with the stock retry policy
    pub fn new() -> Self {
        Self {
            ledgers: HashMap::new(),
            clock: None,
            policy: RetryPolicy::default(),
            default_network: Network::Devnet,
            default_amount: Decimal::ONE,
        }
    }

    /// Create a builder from loaded settings
    pub fn from_settings(settings: &AirdropSettings) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| AirdropError::configuration(e.to_string()))?;
        let default_network = settings
            .default_network
            .parse()
            .map_err(|e: AirdropError| AirdropError::configuration(e.to_string()))?;

        Ok(Self {
            policy: RetryPolicy::from(settings),
            default_network,
            default_amount: settings.default_amount,
            ..Self::new()
        })
    }

    /// Register the ledger client serving `network`
    pub fn with_ledger(mut self, network: Network, ledger: Arc<dyn LedgerClient>) -> Self {
        self.ledgers.insert(network, ledger);
        self
    }

    /// Use a custom clock (defaults to [`TokioClock`])
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the whole retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the total number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    /// Set the linear backoff step
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.policy.backoff_step = step;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.policy.request_timeout = timeout;
        self
    }

    /// Set the confirmation timeout
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.policy.confirmation_timeout = timeout;
        self
    }

    /// Set the network used by default requests
    pub fn with_default_network(mut self, network: Network) -> Self {
        self.default_network = network;
        self
    }

    /// Set the amount used by default requests
    pub fn with_default_amount(mut self, amount: Decimal) -> Self {
        self.default_amount = amount;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<AirdropPipeline> {
        if self.ledgers.is_empty() {
            return Err(AirdropError::configuration("at least one ledger client is required"));
        }
        if self.policy.max_attempts == 0 {
            return Err(AirdropError::configuration("max_attempts must be at least 1"));
        }
        if self.policy.request_timeout.is_zero() {
            return Err(AirdropError::configuration("request timeout must be positive"));
        }
        if self.policy.confirmation_timeout.is_zero() {
            return Err(AirdropError::configuration("confirmation timeout must be positive"));
        }
        sol_to_lamports(self.default_amount)
            .map_err(|e| AirdropError::configuration(format!("default amount: {e}")))?;

        Ok(AirdropPipeline {
            ledgers: self.ledgers,
            clock: self.clock.unwrap_or_else(|| Arc::new(TokioClock::new())),
            policy: self.policy,
            default_network: self.default_network,
            default_amount: self.default_amount,
        })
    }
}
