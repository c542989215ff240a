use async_trait::async_trait;
use parking_lot::Mutex;
use solseed_wallet::PublicKey;
use std::collections::VecDeque;

use crate::error::{AirdropError, Result};

/// Ledger client trait - every faucet backend implements this
///
/// Errors should be reported as [`AirdropError::Ledger`] carrying the text the
/// remote service returned; the pipeline classifies that text.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Ask the faucet to send `lamports` to `address`, returning the transaction signature
    async fn request_funds(&self, address: &PublicKey, lamports: u64) -> Result<String>;

    /// Resolve once `signature` is confirmed
    async fn await_confirmation(&self, signature: &str) -> Result<()>;

    /// Current balance of `address` in lamports
    async fn get_balance(&self, address: &PublicKey) -> Result<u64>;
}

/// Scripted confirmation behavior for [`ScriptedLedger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Confirm immediately
    Confirmed,
    /// Fail with the given ledger text
    Failed(String),
    /// Never resolve
    Pending,
}

/// One call observed by [`ScriptedLedger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    /// `request_funds`
    RequestFunds {
        /// Destination
        address: PublicKey,
        /// Requested lamports
        lamports: u64,
    },
    /// `await_confirmation`
    AwaitConfirmation {
        /// Signature waited on
        signature: String,
    },
    /// `get_balance`
    GetBalance {
        /// Queried account
        address: PublicKey,
    },
}

/// In-memory ledger replaying scripted responses.
///
/// Each `request_funds` call consumes the next scripted response; once the
/// script runs out it succeeds with a generated signature. Confirmations work
/// the same way and default to [`Confirmation::Confirmed`].
#[derive(Debug, Default)]
pub struct ScriptedLedger {
    requests: Mutex<VecDeque<Result<String>>>,
    confirmations: Mutex<VecDeque<Confirmation>>,
    balance: Mutex<u64>,
    calls: Mutex<Vec<LedgerCall>>,
}

impl ScriptedLedger {
    /// Ledger that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful `request_funds` response
    pub fn with_signature(self, signature: impl Into<String>) -> Self {
        self.requests.lock().push_back(Ok(signature.into()));
        self
    }

    /// Queue a failing `request_funds` response
    pub fn with_request_error(self, message: impl Into<String>) -> Self {
        self.requests.lock().push_back(Err(AirdropError::ledger(message)));
        self
    }

    /// Queue a confirmation outcome
    pub fn with_confirmation(self, confirmation: Confirmation) -> Self {
        self.confirmations.lock().push_back(confirmation);
        self
    }

    /// Set the balance reported for every address
    pub fn with_balance(self, lamports: u64) -> Self {
        *self.balance.lock() = lamports;
        self
    }

    /// Calls observed so far
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().clone()
    }

    /// Number of `request_funds` calls observed so far
    pub fn request_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, LedgerCall::RequestFunds { .. }))
            .count()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn request_funds(&self, address: &PublicKey, lamports: u64) -> Result<String> {
        let attempt = {
            let mut calls = self.calls.lock();
            calls.push(LedgerCall::RequestFunds {
                address: *address,
                lamports,
            });
            calls.len()
        };
        let scripted = self.requests.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(format!("scripted-signature-{attempt}")))
    }

    async fn await_confirmation(&self, signature: &str) -> Result<()> {
        self.calls.lock().push(LedgerCall::AwaitConfirmation {
            signature: signature.to_string(),
        });
        let scripted = self.confirmations.lock().pop_front();
        match scripted.unwrap_or(Confirmation::Confirmed) {
            Confirmation::Confirmed => Ok(()),
            Confirmation::Failed(message) => Err(AirdropError::ledger(message)),
            Confirmation::Pending => std::future::pending().await,
        }
    }

    async fn get_balance(&self, address: &PublicKey) -> Result<u64> {
        self.calls.lock().push(LedgerCall::GetBalance { address: *address });
        Ok(*self.balance.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> PublicKey {
        PublicKey::from_bytes(&[9u8; 32]).unwrap()
    }

    #[tokio::test]
    async fn test_script_is_replayed_in_order() {
        let ledger = ScriptedLedger::new()
            .with_request_error("Internal error")
            .with_signature("sig-2");

        let first = ledger.request_funds(&address(), 5).await;
        assert_eq!(first, Err(AirdropError::ledger("Internal error")));
        assert_eq!(ledger.request_funds(&address(), 5).await.unwrap(), "sig-2");
        assert_eq!(ledger.request_funds(&address(), 5).await.unwrap(), "scripted-signature-3");
        assert_eq!(ledger.request_count(), 3);
    }

    #[tokio::test]
    async fn test_confirmation_and_balance() {
        let ledger = ScriptedLedger::new()
            .with_confirmation(Confirmation::Failed("blockhash not found".to_string()))
            .with_balance(42);

        assert!(ledger.await_confirmation("sig").await.is_err());
        assert!(ledger.await_confirmation("sig").await.is_ok());
        assert_eq!(ledger.get_balance(&address()).await.unwrap(), 42);
        assert_eq!(ledger.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_confirmation_never_resolves() {
        let ledger = ScriptedLedger::new().with_confirmation(Confirmation::Pending);
        let waited = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            ledger.await_confirmation("sig"),
        )
        .await;
        assert!(waited.is_err());
    }
}
