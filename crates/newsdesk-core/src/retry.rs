//! Fixed-delay retry for connection-level failures.

use std::future::Future;
use std::time::Duration;

use crate::config::{MAX_RETRIES, RETRY_DELAY};
use crate::failure::FetchFailure;

/// Configuration for the retry loop.
///
/// The delay is the same before every retry; there is no backoff growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self { max_retries, delay }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Run `operation`, retrying connection-level failures while budget remains.
///
/// Every other failure, and the last connection-level failure once the
/// budget is spent, is returned to the caller unchanged.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, FetchFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchFailure>>,
{
    let mut retries_remaining = config.max_retries;
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(failure) if failure.is_connection_level() && retries_remaining > 0 => {
                retries_remaining -= 1;
                tracing::warn!(
                    attempt,
                    retries_remaining,
                    delay_ms = config.delay.as_millis() as u64,
                    error = %failure,
                    "connection-level failure, retrying"
                );
                tokio::time::sleep(config.delay).await;
                attempt += 1;
            }
            Err(failure) => {
                if failure.is_connection_level() {
                    tracing::warn!(attempt, error = %failure, "retry budget exhausted");
                }
                return Err(failure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::http_client::{HttpError, HttpResponse};

    #[test]
    fn test_default_retry_config() {
        let config = RetryConfig::default();

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(config.max_attempts(), 4);
    }

    #[test]
    fn test_retry_config_no_retry() {
        let config = RetryConfig::no_retry();

        assert_eq!(config.max_retries, 0);
        assert_eq!(config.max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_once_then_returns_success() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = with_retry(&RetryConfig::default(), || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    Err(FetchFailure::Transport(HttpError::no_response("reset")))
                } else {
                    Ok("payload")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("payload"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(1) && waited < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_budget_with_fixed_delays() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result: Result<(), _> = with_retry(&RetryConfig::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchFailure::Transport(HttpError::no_response("down"))) }
        })
        .await;

        assert!(matches!(result, Err(ref f) if f.is_connection_level()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(3) && waited < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn status_failures_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&RetryConfig::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchFailure::Response(HttpResponse::new(404, ""))) }
        })
        .await;

        assert_eq!(
            result,
            Err(FetchFailure::Response(HttpResponse::new(404, "")))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_budget_makes_a_single_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&RetryConfig::no_retry(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchFailure::Transport(HttpError::no_response("down"))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
