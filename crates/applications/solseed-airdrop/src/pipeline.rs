use rust_decimal::Decimal;
use solseed_core::{CancellationToken, Clock};
use solseed_wallet::PublicKey;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{AirdropError, Result};
use crate::ledger::LedgerClient;
use crate::machine::{AirdropMachine, Command, Event, RetryPolicy};
use crate::types::{lamports_to_sol, AirdropReceipt, AirdropRequest, AirdropResult, Network};

/// Async driver executing [`AirdropMachine`] commands against ledger clients
pub struct AirdropPipeline {
    pub(crate) ledgers: HashMap<Network, Arc<dyn LedgerClient>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: RetryPolicy,
    pub(crate) default_network: Network,
    pub(crate) default_amount: Decimal,
}

impl AirdropPipeline {
    /// Retry policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Networks with a registered ledger client
    pub fn networks(&self) -> Vec<Network> {
        Network::ALL
            .into_iter()
            .filter(|n| self.ledgers.contains_key(n))
            .collect()
    }

    /// Request for `address` using the configured default network and amount
    pub fn default_request(&self, address: impl Into<String>) -> AirdropRequest {
        AirdropRequest::new(address, self.default_network, self.default_amount)
    }

    fn ledger(&self, network: Network) -> Result<&Arc<dyn LedgerClient>> {
        self.ledgers
            .get(&network)
            .ok_or_else(|| AirdropError::configuration(format!("no ledger client registered for {network}")))
    }

    /// Run a request to completion
    pub async fn request_airdrop(&self, request: &AirdropRequest) -> Result<AirdropReceipt> {
        self.request_airdrop_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Run a request, presenting the outcome as an [`AirdropResult`]
    pub async fn airdrop(&self, request: &AirdropRequest) -> AirdropResult {
        self.request_airdrop(request).await.into()
    }

    /// Run a request until it finishes or `cancel` fires.
    ///
    /// Cancellation stops waiting; a request the faucet already accepted is
    /// not withdrawn.
    pub async fn request_airdrop_with_cancel(
        &self,
        request: &AirdropRequest,
        cancel: &CancellationToken,
    ) -> Result<AirdropReceipt> {
        let validated = request.validate().inspect_err(|e| {
            warn!(code = e.code(), error = %e, "Airdrop request rejected");
        })?;
        let ledger = self.ledger(validated.network)?;
        let mut machine = AirdropMachine::new(&validated, self.policy.clone())?;
        let max_attempts = self.policy.max_attempts;

        let mut command = machine.step(Event::Start)?;
        loop {
            let event = match command {
                Command::RequestFunds {
                    attempt,
                    address,
                    lamports,
                    timeout,
                } => {
                    info!(
                        attempt,
                        max_attempts,
                        address = %address,
                        lamports,
                        network = %validated.network,
                        "Requesting airdrop"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(cancelled()),
                        result = ledger.request_funds(&address, lamports) => match result {
                            Ok(signature) => Event::FundsRequested { signature },
                            Err(e) => {
                                warn!(attempt, error = %e, "Airdrop request failed");
                                Event::RequestFailed { error: e.raw_message() }
                            }
                        },
                        _ = self.clock.deadline(timeout) => {
                            warn!(attempt, timeout_secs = timeout.as_secs(), "Airdrop request timed out");
                            Event::RequestTimedOut
                        }
                    }
                }
                Command::AwaitConfirmation {
                    attempt,
                    signature,
                    timeout,
                } => {
                    debug!(attempt, signature = %signature, timeout_secs = timeout.as_secs(), "Awaiting confirmation");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(cancelled()),
                        result = ledger.await_confirmation(&signature) => match result {
                            Ok(()) => Event::Confirmed,
                            Err(e) => {
                                warn!(attempt, signature = %signature, error = %e, "Confirmation failed");
                                Event::ConfirmationFailed { error: e.raw_message() }
                            }
                        },
                        _ = self.clock.deadline(timeout) => {
                            warn!(attempt, signature = %signature, "Confirmation timed out");
                            Event::ConfirmationTimedOut
                        }
                    }
                }
                Command::Sleep { duration } => {
                    info!(backoff_ms = duration.as_millis() as u64, "Backing off before retry");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(cancelled()),
                        _ = self.clock.sleep(duration) => Event::SleepElapsed,
                    }
                }
                Command::Finish(result) => {
                    match &result {
                        Ok(receipt) => info!(
                            signature = %receipt.signature,
                            attempts = receipt.attempts,
                            lamports = receipt.lamports,
                            "Airdrop confirmed"
                        ),
                        Err(e) => error!(code = e.code(), error = %e, "Airdrop failed"),
                    }
                    return result;
                }
            };
            command = machine.step(event)?;
        }
    }

    /// Balance of `address` on `network`, in SOL
    pub async fn balance(&self, address: &str, network: Network) -> Result<Decimal> {
        let address = PublicKey::from_base58(address.trim())?;
        let lamports = self.ledger(network)?.get_balance(&address).await?;
        debug!(address = %address, network = %network, lamports, "Fetched balance");
        Ok(lamports_to_sol(lamports))
    }
}

fn cancelled() -> AirdropError {
    info!("Airdrop cancelled");
    AirdropError::Cancelled
}

impl std::fmt::Debug for AirdropPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirdropPipeline")
            .field("networks", &self.networks())
            .field("policy", &self.policy)
            .field("default_network", &self.default_network)
            .field("default_amount", &self.default_amount)
            .finish_non_exhaustive()
    }
}
