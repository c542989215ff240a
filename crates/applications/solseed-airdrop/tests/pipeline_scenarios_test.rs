//! End-to-end scenarios for the airdrop pipeline
//!
//! Drives the pipeline against mocked and scripted ledgers with a manual
//! clock, so backoff sleeps and confirmation deadlines are observed without
//! waiting on wall time.

use mockall::mock;
use rust_decimal_macros::dec;
use solseed_airdrop::classifier::{
    CONFIRMATION_TIMEOUT_MESSAGE, FAUCET_DEPLETED_MESSAGE, FAUCET_UNAVAILABLE_MESSAGE,
    RATE_LIMIT_MESSAGE, REQUEST_TIMEOUT_MESSAGE,
};
use solseed_airdrop::ledger::LedgerCall;
use solseed_airdrop::{
    AirdropError, AirdropPipeline, AirdropPipelineBuilder, AirdropRequest, AirdropResult,
    Confirmation, LedgerClient, Network, Result, ScriptedLedger,
};
use solseed_core::runtime::ManualClock;
use solseed_wallet::PublicKey;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Mock ledger for testing
mock! {
    Ledger {}

    #[async_trait::async_trait]
    impl LedgerClient for Ledger {
        async fn request_funds(&self, address: &PublicKey, lamports: u64) -> Result<String>;
        async fn await_confirmation(&self, signature: &str) -> Result<()>;
        async fn get_balance(&self, address: &PublicKey) -> Result<u64>;
    }
}

/// Faucet that accepts connections but never answers
#[derive(Default)]
struct SilentFaucet {
    requests: AtomicUsize,
}

#[async_trait::async_trait]
impl LedgerClient for SilentFaucet {
    async fn request_funds(&self, _address: &PublicKey, _lamports: u64) -> Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn await_confirmation(&self, _signature: &str) -> Result<()> {
        panic!("nothing was ever submitted");
    }

    async fn get_balance(&self, _address: &PublicKey) -> Result<u64> {
        Ok(0)
    }
}

const ADDRESS: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

fn pipeline_with(ledger: Arc<dyn LedgerClient>, clock: &ManualClock) -> AirdropPipeline {
    AirdropPipelineBuilder::new()
        .with_ledger(Network::Devnet, ledger)
        .with_clock(Arc::new(clock.clone()))
        .build()
        .unwrap()
}

fn request(amount: rust_decimal::Decimal) -> AirdropRequest {
    AirdropRequest::new(ADDRESS, Network::Devnet, amount)
}

#[cfg(test)]
mod retry_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_request_funds()
            .times(1)
            .withf(|address, lamports| address.to_base58() == ADDRESS && *lamports == 1_000_000_000)
            .returning(|_, _| Ok("5sig".to_string()));
        ledger
            .expect_await_confirmation()
            .times(1)
            .withf(|signature| signature == "5sig")
            .returning(|_| Ok(()));

        let clock = ManualClock::new();
        let pipeline = pipeline_with(Arc::new(ledger), &clock);
        let receipt = pipeline.request_airdrop(&request(dec!(1))).await.unwrap();

        assert_eq!(receipt.signature, "5sig");
        assert_eq!(receipt.attempts, 1);
        assert_eq!(receipt.lamports, 1_000_000_000);
        assert!(clock.sleeps().is_empty());
        assert!(clock.deadlines().is_empty());
    }

    #[tokio::test]
    async fn test_internal_errors_back_off_linearly() {
        let ledger = Arc::new(
            ScriptedLedger::new()
                .with_request_error("Internal error")
                .with_request_error("Internal error")
                .with_signature("third-time-lucky"),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let receipt = pipeline.request_airdrop(&request(dec!(1))).await.unwrap();

        assert_eq!(receipt.signature, "third-time-lucky");
        assert_eq!(receipt.attempts, 3);
        assert_eq!(ledger.request_count(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_internal_errors_exhaust_to_unavailable() {
        let ledger = Arc::new(
            ScriptedLedger::new()
                .with_request_error("Internal error")
                .with_request_error("internal ERROR: try later")
                .with_request_error("Internal error"),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let err = pipeline.request_airdrop(&request(dec!(1))).await.unwrap_err();

        assert_eq!(err, AirdropError::FaucetUnavailable);
        assert_eq!(err.to_string(), FAUCET_UNAVAILABLE_MESSAGE);
        assert_eq!(ledger.request_count(), 3);
        // no wait after the final attempt
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_request_funds()
            .times(1)
            .returning(|_, _| Err(AirdropError::ledger("429 Too Many Requests")));
        ledger.expect_await_confirmation().never();

        let clock = ManualClock::new();
        let pipeline = pipeline_with(Arc::new(ledger), &clock);
        let err = pipeline.request_airdrop(&request(dec!(2))).await.unwrap_err();

        assert_eq!(err, AirdropError::RateLimited);
        assert_eq!(err.to_string(), RATE_LIMIT_MESSAGE);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_not_retried() {
        let ledger = Arc::new(
            ScriptedLedger::new().with_request_error("airdrop failed: insufficient funds for request"),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let err = pipeline.request_airdrop(&request(dec!(5))).await.unwrap_err();

        assert_eq!(err, AirdropError::FaucetDepleted);
        assert_eq!(err.to_string(), FAUCET_DEPLETED_MESSAGE);
        assert_eq!(ledger.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_error_retries_without_waiting() {
        let ledger = Arc::new(
            ScriptedLedger::new()
                .with_request_error("socket hang up")
                .with_signature("recovered"),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let receipt = pipeline.request_airdrop(&request(dec!(0.5))).await.unwrap();

        assert_eq!(receipt.attempts, 2);
        assert_eq!(receipt.lamports, 500_000_000);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_errors_exhaust_with_last_message() {
        let ledger = Arc::new(
            ScriptedLedger::new()
                .with_request_error("first")
                .with_request_error("second")
                .with_request_error("connection reset"),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let err = pipeline.request_airdrop(&request(dec!(1))).await.unwrap_err();

        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(err.code(), "RETRIES_EXHAUSTED");
    }

    #[tokio::test]
    async fn test_confirmation_timeouts_exhaust() {
        let ledger = Arc::new(
            ScriptedLedger::new()
                .with_confirmation(Confirmation::Pending)
                .with_confirmation(Confirmation::Pending)
                .with_confirmation(Confirmation::Pending),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let err = pipeline.request_airdrop(&request(dec!(1))).await.unwrap_err();

        assert_eq!(err.to_string(), CONFIRMATION_TIMEOUT_MESSAGE);
        assert_eq!(ledger.request_count(), 3);
        assert_eq!(clock.deadlines(), vec![Duration::from_secs(30); 3]);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_unanswered_requests_time_out_and_exhaust() {
        let faucet = Arc::new(SilentFaucet::default());
        let clock = ManualClock::new();
        let pipeline = pipeline_with(faucet.clone(), &clock);

        let err = pipeline.request_airdrop(&request(dec!(1))).await.unwrap_err();

        assert_eq!(err.to_string(), REQUEST_TIMEOUT_MESSAGE);
        assert_eq!(err.code(), "RETRIES_EXHAUSTED");
        assert_eq!(faucet.requests.load(Ordering::SeqCst), 3);
        assert_eq!(clock.deadlines(), vec![Duration::from_secs(30); 3]);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_requests_finish_on_tokio_clock() {
        let faucet = Arc::new(SilentFaucet::default());
        let pipeline = AirdropPipelineBuilder::new()
            .with_ledger(Network::Devnet, faucet.clone())
            .build()
            .unwrap();

        let finished = tokio::time::timeout(
            Duration::from_secs(3600),
            pipeline.request_airdrop(&request(dec!(1))),
        )
        .await;

        let err = finished.expect("pipeline stalled").unwrap_err();
        assert_eq!(err.to_string(), REQUEST_TIMEOUT_MESSAGE);
        assert_eq!(faucet.requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_confirmation_is_classified() {
        let ledger = Arc::new(
            ScriptedLedger::new()
                .with_confirmation(Confirmation::Failed("Internal error".to_string()))
                .with_signature("sig-a")
                .with_signature("sig-b"),
        );
        let clock = ManualClock::new();
        let pipeline = pipeline_with(ledger.clone(), &clock);

        let receipt = pipeline.request_airdrop(&request(dec!(1))).await.unwrap();

        assert_eq!(receipt.signature, "sig-b");
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(2)]);
        assert_eq!(
            ledger.calls()[1],
            LedgerCall::AwaitConfirmation {
                signature: "sig-a".to_string()
            }
        );
    }
}

#[cfg(test)]
mod validation_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn rejected(request: AirdropRequest) -> AirdropError {
        // No expectations: any ledger call fails the test
        let ledger = MockLedger::new();
        let clock = ManualClock::new();
        let pipeline = pipeline_with(Arc::new(ledger), &clock);
        pipeline.request_airdrop(&request).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_invalid_address_makes_no_call() {
        let err = rejected(AirdropRequest::new("not-an-address", Network::Devnet, dec!(1))).await;
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_zero_amount_makes_no_call() {
        let err = rejected(request(dec!(0))).await;
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_sub_lamport_amount_makes_no_call() {
        let err = rejected(request(dec!(0.0000000001))).await;
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}

#[cfg(test)]
mod presentation_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_result_messages() {
        let clock = ManualClock::new();
        let ok = pipeline_with(Arc::new(ScriptedLedger::new().with_signature("s1")), &clock)
            .airdrop(&request(dec!(1)))
            .await;
        assert_eq!(
            ok,
            AirdropResult::Succeeded {
                signature: "s1".to_string(),
                amount: dec!(1),
            }
        );

        let limited = pipeline_with(
            Arc::new(ScriptedLedger::new().with_request_error("rate limit reached")),
            &clock,
        )
        .airdrop(&request(dec!(1)))
        .await;
        assert_eq!(
            limited,
            AirdropResult::Failed {
                error: RATE_LIMIT_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_result_serializes_with_status_tag() {
        let clock = ManualClock::new();
        let result = pipeline_with(Arc::new(ScriptedLedger::new().with_signature("s2")), &clock)
            .airdrop(&request(dec!(1)))
            .await;

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["signature"], "s2");
    }
}
