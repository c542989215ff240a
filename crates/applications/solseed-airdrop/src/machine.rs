//! Sans-IO state machine for one faucet request.
//!
//! The machine never performs I/O. It answers every [`Event`] with the next
//! [`Command`] for a driver to execute, which keeps the retry policy testable
//! without a network or a clock.
//!
//! ```text
//! Idle -> Requesting -> Confirming -> Succeeded
//!            ^  |           |
//!            |  v           v
//!         BackingOff <-- (failure) --> Failed
//! ```

use rust_decimal::Decimal;
use solseed_core::config::AirdropSettings;
use solseed_wallet::PublicKey;
use std::time::Duration;

use crate::classifier::{FailureClass, CONFIRMATION_TIMEOUT_MESSAGE, REQUEST_TIMEOUT_MESSAGE};
use crate::error::{AirdropError, Result};
use crate::types::{AirdropReceipt, ValidatedRequest};

/// Attempt limits and waits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, counted from 1
    pub max_attempts: u32,
    /// Linear backoff step; the wait after attempt `n` is `step * n`
    pub backoff_step: Duration,
    /// Upper bound on one `request_funds` call
    pub request_timeout: Duration,
    /// Upper bound on one confirmation wait
    pub confirmation_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            confirmation_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following `attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

impl From<&AirdropSettings> for RetryPolicy {
    fn from(settings: &AirdropSettings) -> Self {
        Self {
            max_attempts: settings.max_retries,
            backoff_step: settings.backoff_step(),
            request_timeout: settings.request_timeout(),
            confirmation_timeout: settings.confirmation_timeout(),
        }
    }
}

/// Machine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Not started
    Idle,
    /// Waiting for the faucet to accept the request
    Requesting {
        /// Current attempt
        attempt: u32,
    },
    /// Waiting for the transaction to confirm
    Confirming {
        /// Current attempt
        attempt: u32,
        /// Transaction being confirmed
        signature: String,
    },
    /// Waiting before the next attempt
    BackingOff {
        /// Attempt that just failed
        attempt: u32,
        /// Wait duration
        delay: Duration,
    },
    /// Funds confirmed
    Succeeded {
        /// Confirmed transaction
        signature: String,
        /// Attempt that succeeded
        attempts: u32,
    },
    /// Gave up
    Failed {
        /// Category of the last failure
        class: FailureClass,
        /// User-facing message
        message: String,
        /// Attempts made
        attempts: u32,
    },
}

impl State {
    /// Whether no further events are accepted
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Succeeded { .. } | State::Failed { .. })
    }
}

/// Work the driver must perform next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Call `request_funds`, bounded by `timeout`
    RequestFunds {
        /// Attempt number
        attempt: u32,
        /// Destination
        address: PublicKey,
        /// Amount
        lamports: u64,
        /// Deadline
        timeout: Duration,
    },
    /// Call `await_confirmation`, bounded by `timeout`
    AwaitConfirmation {
        /// Attempt number
        attempt: u32,
        /// Transaction to wait for
        signature: String,
        /// Deadline
        timeout: Duration,
    },
    /// Wait before retrying
    Sleep {
        /// Wait duration
        duration: Duration,
    },
    /// Stop; the request is finished
    Finish(Result<AirdropReceipt>),
}

/// Input produced by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin the first attempt
    Start,
    /// Faucet accepted the request
    FundsRequested {
        /// Transaction signature
        signature: String,
    },
    /// Faucet refused the request
    RequestFailed {
        /// Raw error text
        error: String,
    },
    /// Faucet did not answer before the request deadline
    RequestTimedOut,
    /// Transaction confirmed
    Confirmed,
    /// Confirmation reported an error
    ConfirmationFailed {
        /// Raw error text
        error: String,
    },
    /// Confirmation deadline passed
    ConfirmationTimedOut,
    /// Backoff wait finished
    SleepElapsed,
}

/// Retry state machine for one validated request
#[derive(Debug, Clone)]
pub struct AirdropMachine {
    address: PublicKey,
    amount: Decimal,
    lamports: u64,
    policy: RetryPolicy,
    state: State,
}

impl AirdropMachine {
    /// Machine in [`State::Idle`]
    pub fn new(request: &ValidatedRequest, policy: RetryPolicy) -> Result<Self> {
        if policy.max_attempts == 0 {
            return Err(AirdropError::configuration("max_attempts must be at least 1"));
        }
        Ok(Self {
            address: request.address,
            amount: request.amount,
            lamports: request.lamports,
            policy,
            state: State::Idle,
        })
    }

    /// Current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Feed one event and get the next command
    pub fn step(&mut self, event: Event) -> Result<Command> {
        let state = std::mem::replace(&mut self.state, State::Idle);
        match (state, event) {
            (State::Idle, Event::Start) => Ok(self.begin_attempt(1)),

            (State::Requesting { attempt }, Event::FundsRequested { signature }) => {
                self.state = State::Confirming {
                    attempt,
                    signature: signature.clone(),
                };
                Ok(Command::AwaitConfirmation {
                    attempt,
                    signature,
                    timeout: self.policy.confirmation_timeout,
                })
            }

            (State::Requesting { attempt }, Event::RequestFailed { error })
            | (State::Confirming { attempt, .. }, Event::ConfirmationFailed { error }) => {
                Ok(self.attempt_failed(attempt, &error))
            }

            (State::Requesting { attempt }, Event::RequestTimedOut) => {
                Ok(self.attempt_failed(attempt, REQUEST_TIMEOUT_MESSAGE))
            }

            (State::Confirming { attempt, .. }, Event::ConfirmationTimedOut) => {
                Ok(self.attempt_failed(attempt, CONFIRMATION_TIMEOUT_MESSAGE))
            }

            (State::Confirming { attempt, signature }, Event::Confirmed) => {
                self.state = State::Succeeded {
                    signature: signature.clone(),
                    attempts: attempt,
                };
                Ok(Command::Finish(Ok(AirdropReceipt {
                    signature,
                    amount: self.amount,
                    lamports: self.lamports,
                    attempts: attempt,
                })))
            }

            (State::BackingOff { attempt, .. }, Event::SleepElapsed) => Ok(self.begin_attempt(attempt + 1)),

            (state, event) => {
                let message = format!("event {event:?} is not valid in state {state:?}");
                self.state = state;
                Err(AirdropError::invariant(message))
            }
        }
    }

    fn begin_attempt(&mut self, attempt: u32) -> Command {
        self.state = State::Requesting { attempt };
        Command::RequestFunds {
            attempt,
            address: self.address,
            lamports: self.lamports,
            timeout: self.policy.request_timeout,
        }
    }

    fn attempt_failed(&mut self, attempt: u32, raw: &str) -> Command {
        let class = FailureClass::classify(raw);
        let message = class.user_message(raw);

        if !class.is_retryable() || attempt >= self.policy.max_attempts {
            self.state = State::Failed {
                class,
                message: message.clone(),
                attempts: attempt,
            };
            let error = match class {
                FailureClass::RateLimited => AirdropError::RateLimited,
                FailureClass::FaucetDepleted => AirdropError::FaucetDepleted,
                FailureClass::TransientInternal => AirdropError::FaucetUnavailable,
                FailureClass::Unknown => AirdropError::exhausted(&message),
            };
            return Command::Finish(Err(error));
        }

        if class.backs_off() {
            let delay = self.policy.backoff(attempt);
            self.state = State::BackingOff { attempt, delay };
            Command::Sleep { duration: delay }
        } else {
            self.begin_attempt(attempt + 1)
        }
    }
}
