//! Bounded retry with exponential backoff for upstream calls.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::UpstreamError;

/// Retry policy for [`with_retry`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Backoff to wait after the given 1-based attempt fails.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// All attempts failed; `last` is the error from the final attempt.
#[derive(Debug, Error)]
#[error("no response after {attempts} attempt(s): {last}")]
pub struct RetryExhausted {
    pub attempts: u32,
    #[source]
    pub last: UpstreamError,
}

/// Runs `operation` until it succeeds, fails terminally, or the attempt
/// budget runs out.
///
/// The closure receives the 1-based attempt number so callers can log it.
/// Only errors whose [`UpstreamError::is_retryable`] is true are retried;
/// anything else is returned immediately, wrapped with the attempt count.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, RetryExhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "upstream call succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < config.max_attempts => {
                let delay = config.delay_after(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retryable upstream failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_retryable() {
                    warn!(attempt, error = %err, "attempt limit reached, giving up");
                } else {
                    debug!(attempt, error = %err, "error is not retryable, failing immediately");
                }
                return Err(RetryExhausted {
                    attempts: attempt,
                    last: err,
                });
            }
        }
    }
}
