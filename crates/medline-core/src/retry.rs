//! Retry with exponential backoff for transient failures (e.g. database pool
//! acquisition under load).

use std::time::Duration;

use crate::error::Retryable;

/// Exponential backoff: 2^attempt seconds (2s, 4s, 8s, ...)
pub const fn backoff_duration(attempt: u32) -> Duration {
    Duration::from_secs(2u64.pow(attempt))
}

/// Retry a fallible operation with exponential backoff.
///
/// On retryable errors, logs the failure, sleeps, and retries up to
/// `max_retries`. Returns `Ok(T)` on first success, or the final `Err` on
/// exhaustion / non-retryable error.
pub fn retry_with_backoff<T, E: Retryable + std::fmt::Display>(
    label: &str,
    max_retries: u32,
    mut attempt_fn: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                attempt += 1;
                log::debug!("{label}: attempt {attempt}/{max_retries} failed: {e}, retrying...");
                std::thread::sleep(backoff_duration(attempt));
            }
            Err(e) => {
                log::error!("{label}: failed permanently: {e}");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_exponential() {
        assert_eq!(backoff_duration(1), Duration::from_secs(2));
        assert_eq!(backoff_duration(2), Duration::from_secs(4));
        assert_eq!(backoff_duration(3), Duration::from_secs(8));
    }

    #[derive(Debug)]
    struct AlwaysRetryable;
    impl std::fmt::Display for AlwaysRetryable {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "always retryable")
        }
    }
    impl Retryable for AlwaysRetryable {
        fn is_retryable(&self) -> bool {
            true
        }
    }

    #[test]
    fn succeeds_without_retry() {
        let mut calls = 0;
        let result: Result<i32, AlwaysRetryable> = retry_with_backoff("t", 3, || {
            calls += 1;
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn exhausts_retries() {
        let mut calls = 0;
        let result: Result<i32, AlwaysRetryable> = retry_with_backoff("t", 0, || {
            calls += 1;
            Err(AlwaysRetryable)
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
