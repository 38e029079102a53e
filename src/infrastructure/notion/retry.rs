use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::errors::NotionApiError;
use crate::domain::models::RetryConfig;

/// Retry policy with exponential backoff for Notion API calls
///
/// Backoff doubles with each retry: 1s -> 2s -> 4s ... capped at the maximum.
///
/// # Retry Decision
/// - Retry on: rate limiting, conflicts, server errors, timeouts, network errors
/// - Do NOT retry: anything [`NotionApiError::is_permanent`] reports
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    max_attempts: u32,
    /// Initial backoff duration in milliseconds
    initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds
    max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a retry policy. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff_ms,
            max_backoff_ms: max_backoff_ms.max(initial_backoff_ms),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute an operation, retrying transient failures.
    ///
    /// Permanent errors are returned immediately. When every attempt fails
    /// with a transient error, the last one is returned.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T, NotionApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NotionApiError>>,
    {
        let mut attempt = 1;

        loop {
            debug!(operation = operation_name, attempt, "Calling Notion API");
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(operation = operation_name, attempt, "Notion API call succeeded after retry");
                    }
                    return Ok(result);
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let backoff = self.calculate_backoff(attempt - 1);
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = self.max_attempts,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Notion API call failed with transient error, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(
                            operation = operation_name,
                            attempts = attempt,
                            error = %err,
                            "Notion API call failed after exhausting retries"
                        );
                    } else {
                        debug!(operation = operation_name, error = %err, "Permanent error, not retrying");
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Formula: min(initial_backoff * 2^retry, max_backoff)
    fn calculate_backoff(&self, retry: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(retry))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_backoff_calculation() {
        let policy = RetryPolicy::new(5, 1000, 6000);

        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.calculate_backoff(2), Duration::from_millis(4000));
        assert_eq!(policy.calculate_backoff(3), Duration::from_millis(6000)); // capped
        assert_eq!(policy.calculate_backoff(40), Duration::from_millis(6000));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, 10, 10).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_execute_succeeds_immediately() {
        let policy = RetryPolicy::new(3, 1, 10);
        let calls = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute("create_page", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, NotionApiError>("page-1")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "page-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_retries_transient_then_succeeds() {
        let policy = RetryPolicy::new(3, 1, 10);
        let calls = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute("update_page", || {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(NotionApiError::RateLimited)
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_returns_last_transient_error_when_exhausted() {
        let policy = RetryPolicy::new(3, 1, 10);
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .execute("query_database", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(NotionApiError::Timeout)
                }
            })
            .await;

        assert!(matches!(result, Err(NotionApiError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_does_not_retry_permanent_errors() {
        let policy = RetryPolicy::new(5, 1, 10);
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .execute("create_page", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(NotionApiError::InvalidRequest("validation_error".to_string()))
                }
            })
            .await;

        assert!(matches!(result, Err(NotionApiError::InvalidRequest(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
