//! Backoff for transient GitHub API failures.
//!
//! Each outbound call is retried at most twice, after 500ms and then 1s, and
//! only when the failure is transient (5xx, rate limiting, network). A
//! permanent failure ends the call immediately.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::error::GitHubApiError;

/// How often and how patiently to retry a failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry. Each later retry waits twice as long.
    pub initial_delay: Duration,

    /// Cap on a single delay.
    pub max_delay: Duration,
}

impl RetryConfig {
    /// 2 retries, waiting 500ms then 1s.
    pub const DEFAULT: Self = Self {
        max_retries: 2,
        initial_delay: Duration::from_millis(500),
        max_delay: Duration::from_secs(4),
    };

    /// Delay before retry number `retry` (0-indexed).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs `operation` until it succeeds, fails permanently, or runs out of
/// retries. Returns the last error in the latter two cases.
pub async fn retry_with_backoff<T, F, Fut>(
    config: RetryConfig,
    mut operation: F,
) -> Result<T, GitHubApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitHubApiError>>,
{
    let mut retry = 0;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.kind.is_retriable() || retry >= config.max_retries {
            return Err(err);
        }

        let delay = config.delay_for_retry(retry);
        retry += 1;
        debug!(
            retry,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Retrying transient GitHub API error"
        );
        tokio::time::sleep(delay).await;
    }
}
