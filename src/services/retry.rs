//! Bounded retry for contended filesystem operations
//!
//! Moving a freshly written thumbnail into the cache directory can hit
//! transient locks from other processes scanning the same files. The move is
//! retried a fixed number of times with a fixed delay between attempts.

use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Delay between attempts
    pub interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            interval: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Create an ExponentialBackoff from this config.
    ///
    /// Multiplier 1.0 with zero randomization keeps the delay constant.
    pub fn to_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.interval,
            initial_interval: self.interval,
            max_interval: self.interval,
            multiplier: 1.0,
            randomization_factor: 0.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Execute an async operation with retry logic.
///
/// Sleeps only between attempts; a final failed attempt returns its error
/// immediately.
pub async fn retry_async<T, E, Fut, F>(
    operation: F,
    config: &RetryConfig,
    operation_name: &str,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempts = 0;
    let mut backoff = config.to_backoff();

    loop {
        attempts += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempts >= config.max_attempts {
                    warn!(
                        operation = %operation_name,
                        attempts = attempts,
                        error = %e,
                        "Operation failed after max attempts"
                    );
                    return Err(e);
                }

                if let Some(duration) = backoff.next_backoff() {
                    warn!(
                        operation = %operation_name,
                        attempt = attempts,
                        error = %e,
                        retry_in_ms = duration.as_millis() as u64,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(duration).await;
                } else {
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    async fn fail_first_n(counter: &AtomicU32, failures: u32) -> Result<u32, String> {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= failures {
            Err(format!("attempt {attempt} failed"))
        } else {
            Ok(attempt)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_with_two_delays() {
        let counter = AtomicU32::new(0);
        let config = RetryConfig::default();

        let start = tokio::time::Instant::now();
        let result = retry_async(|| fail_first_n(&counter, 2), &config, "move").await;

        assert_eq!(result, Ok(3));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        // Exactly two 500ms delays, none after the successful attempt.
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let config = RetryConfig::default();

        let start = tokio::time::Instant::now();
        let result = retry_async(|| fail_first_n(&counter, 10), &config, "move").await;

        assert_eq!(result, Err("attempt 3 failed".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        // No sleep after the final failed attempt.
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_first_attempt_success_does_not_sleep() {
        let counter = AtomicU32::new(0);
        let result = retry_async(
            || fail_first_n(&counter, 0),
            &RetryConfig::default(),
            "move",
        )
        .await;
        assert_eq!(result, Ok(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
