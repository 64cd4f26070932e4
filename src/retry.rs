//! Retry with exponential backoff for network-bound fetches
//!
//! Absorbs transient upstream failures (rate limits, timeouts) without
//! caller-visible flakiness. The backoff is pure exponential with no jitter,
//! so correlated failures across many processes retry in lockstep; a known
//! weakness, kept as-is. Every error is retried identically; callers wanting
//! classification can consult [`Error::is_recoverable`](crate::Error::is_recoverable)
//! before invoking the loop.
//!
//! No timeout is enforced here. An operation that never resolves is bounded
//! only by the underlying transport's own timeout.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RetrySettings;
use crate::error::{Error, Result};

/// Retry policy: attempt budget and backoff base
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first; values below 1 behave as 1
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per subsequent failure
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Create a policy from configuration
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
        }
    }

    /// Backoff delay after the given 0-based failed attempt: `base * 2^attempt`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

/// Per-call retry bookkeeping, discarded when the call ends
struct RetryState {
    attempt: u32,
    last_error: Option<Error>,
}

/// Run `op` until it succeeds or the attempt budget is exhausted
///
/// Attempt 0 executes immediately. On failure, if attempts remain, sleeps
/// `base_delay * 2^attempt` and retries. On exhaustion the last encountered
/// error is returned, never swallowed.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut state = RetryState {
        attempt: 0,
        last_error: None,
    };

    loop {
        match op().await {
            Ok(value) => {
                if state.attempt > 0 {
                    debug!(attempt = state.attempt, "fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if state.attempt + 1 >= attempts {
                    warn!(
                        attempts,
                        error = %err,
                        "fetch failed, attempt budget exhausted"
                    );
                    state.last_error = Some(err);
                    break;
                }

                let delay = policy.backoff_delay(state.attempt);
                warn!(
                    attempt = state.attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "fetch failed, backing off"
                );
                state.attempt += 1;
                tokio::time::sleep(delay).await;
            }
        }
    }

    // last_error is always set when the loop breaks
    Err(state
        .last_error
        .unwrap_or_else(|| Error::fetch("retry budget exhausted")))
}
