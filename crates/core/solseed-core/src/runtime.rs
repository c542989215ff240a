//! Runtime abstractions for time and cancellation.
//!
//! The airdrop pipeline never calls `tokio::time` directly. It waits through a
//! [`Clock`], so tests can substitute [`ManualClock`] and simulate elapsed time
//! instead of sleeping.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Source of time for retry backoff and confirmation deadlines
#[async_trait]
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock was created
    fn elapsed(&self) -> Duration;

    /// Suspend for `duration` (used for backoff between attempts)
    async fn sleep(&self, duration: Duration);

    /// Resolve once `duration` has passed (used as a deadline racing another
    /// future). Defaults to [`Clock::sleep`].
    async fn deadline(&self, duration: Duration) {
        self.sleep(duration).await;
    }
}

/// Wall-clock implementation backed by `tokio::time`
#[derive(Debug, Clone)]
pub struct TokioClock {
    started: tokio::time::Instant,
}

impl TokioClock {
    /// Create a clock starting now
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Simulated clock: sleeps return immediately and advance virtual time.
///
/// Backoff sleeps and deadlines are recorded separately so tests can assert on
/// exactly which delays a component asked for.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<parking_lot::Mutex<ManualClockState>>,
}

#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
struct ManualClockState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
    deadlines: Vec<Duration>,
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    /// Create a clock at virtual time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backoff sleeps requested so far, in order
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().sleeps.clone()
    }

    /// Deadlines that expired so far, in order
    #[must_use]
    pub fn deadlines(&self) -> Vec<Duration> {
        self.inner.lock().deadlines.clone()
    }

    /// Advance virtual time without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().elapsed += duration;
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed
    }

    async fn sleep(&self, duration: Duration) {
        {
            let mut state = self.inner.lock();
            state.elapsed += duration;
            state.sleeps.push(duration);
        }
        tokio::task::yield_now().await;
    }

    async fn deadline(&self, duration: Duration) {
        // Give a racing future one more poll before the deadline counts as expired
        tokio::task::yield_now().await;
        let mut state = self.inner.lock();
        state.elapsed += duration;
        state.deadlines.push(duration);
    }
}

/// Cancellation token for cooperative task cancellation.
///
/// Clones share state; cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a new, uncancelled token
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Cancel the token and wake every waiter
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Check if the token is cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Wait for cancellation
    pub async fn cancelled(&self) {
        let mut receiver = self.state.subscribe();
        // The sender lives as long as `self`, so the wait cannot fail.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
