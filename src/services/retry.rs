//! Retry with exponential backoff for transient storage failures.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use tokio::time::sleep;
use tracing::warn;

use crate::domain::errors::DomainResult;
use crate::domain::models::RetryConfig;

/// Retries an operation while it fails with a retryable error.
///
/// Delays double from `initial_backoff_ms` up to `max_backoff_ms`. Only
/// `DomainError::StorageUnavailable` is retried; every other error is
/// returned on the first attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.initial_backoff_ms, config.max_backoff_ms)
    }
}

impl RetryPolicy {
    /// `max_backoff_ms` is raised to `initial_backoff_ms` when smaller.
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms: max_backoff_ms.max(initial_backoff_ms),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.initial_backoff_ms))
            .with_max_interval(Duration::from_millis(self.max_backoff_ms))
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Delays that would be slept between attempts, in order.
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = self.backoff();
        (0..self.max_retries)
            .map(|_| {
                backoff
                    .next_backoff()
                    .unwrap_or(Duration::from_millis(self.max_backoff_ms))
            })
            .collect()
    }

    /// Run `operation`, retrying retryable failures.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> DomainResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let mut delays = self.delays().into_iter();
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => match delays.next() {
                    Some(delay) => {
                        warn!(
                            operation = operation_name,
                            attempt,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %err,
                            "Transient storage failure, retrying"
                        );
                        sleep(delay).await;
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delays_double_and_cap() {
        let policy = RetryPolicy::new(5, 10, 50);
        let millis: Vec<u128> = policy.delays().iter().map(Duration::as_millis).collect();
        assert_eq!(millis, vec![10, 20, 40, 50, 50]);
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 5,
            max_backoff_ms: 1,
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_backoff_ms, 5);
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let policy = RetryPolicy::new(3, 1, 2);
        let calls = AtomicU32::new(0);

        let result = policy
            .execute("flaky", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(DomainError::StorageUnavailable("database is locked".into()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let policy = RetryPolicy::new(2, 1, 1);
        let calls = AtomicU32::new(0);

        let result: DomainResult<()> = policy
            .execute("down", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::StorageUnavailable("pool timed out".into()))
            })
            .await;

        assert!(matches!(result, Err(DomainError::StorageUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_validation_errors_are_not_retried() {
        let policy = RetryPolicy::new(5, 1, 1);
        let calls = AtomicU32::new(0);

        let result: DomainResult<()> = policy
            .execute("invalid", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::validation("amount", "must be >= 0"))
            })
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
