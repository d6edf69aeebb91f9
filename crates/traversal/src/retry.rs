//! Bounded retry and cycle backoff policies.

use std::future::Future;
use std::time::Duration;

use crate::error::TraversalError;

/// Bounded retry policy applied to a single collaborator operation.
///
/// Intervals grow exponentially from `initial_interval` up to
/// `max_interval`. Once `max_attempts` is reached the last error is
/// surfaced to the caller as an exhausted failure.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Returns the interval to wait after the given failed attempt
    /// (attempts are counted from 1).
    pub fn interval_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(32);
        let factor = (1u64 << exp).min(u32::MAX as u64) as u32;
        self.initial_interval
            .saturating_mul(factor)
            .min(self.max_interval)
    }

    /// Runs an operation until it succeeds or the attempt budget is spent,
    /// returning the last error on exhaustion.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TraversalError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TraversalError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(err);
                    }
                    let wait = self.interval_after(attempt);
                    tracing::debug!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Backoff applied between traversal retry cycles.
///
/// The delay for cycle `n` is `min(cap, base * 2^n)`; with the default
/// one-second base and sixty-second cap this is the `min(60, 2^n)` seconds
/// sequence. Both knobs are configurable so tests and operations can shrink
/// or stretch the wait.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            cap: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    /// Returns the delay before resuming after the given retry cycle.
    pub fn delay(&self, retry_cycle: u32) -> Duration {
        let exp = retry_cycle.min(32);
        let factor = (1u64 << exp).min(u32::MAX as u64) as u32;
        self.base.saturating_mul(factor).min(self.cap)
    }
}
