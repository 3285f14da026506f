//! Bounded retry with a randomized, growing delay for page loads.
//!
//! [`retry_with_backoff`] retries transient failures (network errors, 429,
//! 5xx). Any other error, or running out of attempts, ends the load with
//! [`ScraperError::LoadPage`].

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use yarche_core::{AppConfig, DelayRange};

use crate::error::ScraperError;

/// How many times a page load is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Range the first delay is drawn from. `None` retries without waiting.
    pub initial_delay: Option<DelayRange>,
    /// Multiplier applied to the delay after every failed attempt.
    pub backoff_factor: f64,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            initial_delay: config.delay_range,
            backoff_factor: config.backoff_factor,
        }
    }

    /// A policy that retries immediately, for tests and local runs.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: None,
            backoff_factor: 1.0,
        }
    }

    fn first_delay(&self) -> Duration {
        let Some(range) = self.initial_delay else {
            return Duration::ZERO;
        };
        let secs = if range.max_secs > range.min_secs {
            rand::rng().random_range(range.min_secs..=range.max_secs)
        } else {
            range.min_secs
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

/// Returns `true` for failures worth another attempt.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Runs `operation` until it succeeds, fails permanently, or exhausts
/// `policy.max_attempts`.
///
/// The first delay is drawn uniformly from `policy.initial_delay` and grows
/// by `policy.backoff_factor` after each further failure. No delay follows
/// the final attempt.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.first_delay();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_attempts {
            return Err(ScraperError::LoadPage {
                url: url.to_string(),
                retries: attempt,
                source: Box::new(err),
            });
        }

        tracing::warn!(
            url,
            attempt,
            max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "page load failed; retrying"
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        delay = grow_delay(delay, policy.backoff_factor);
    }
}

/// Multiplies `delay` by `factor`, saturating at [`Duration::MAX`].
fn grow_delay(delay: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://yarcheplus.ru/category/".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), "u", || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(&RetryPolicy::immediate(5), "u", || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausting_attempts_reports_url_and_count() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), "https://x/y", || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        match result {
            Err(ScraperError::LoadPage { url, retries, source }) => {
                assert_eq!(url, "https://x/y");
                assert_eq!(retries, 3);
                assert!(matches!(*source, ScraperError::UnexpectedStatus { status: 503, .. }));
            }
            other => panic!("expected LoadPage, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(&RetryPolicy::immediate(5), "u", || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::UnexpectedStatus {
                    status: 404,
                    url: "u".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(
            matches!(result, Err(ScraperError::LoadPage { retries: 1, .. })),
            "expected LoadPage after one attempt, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let _ = retry_with_backoff(&RetryPolicy::immediate(0), "u", || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_grows_by_backoff_factor() {
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_delay: Some(DelayRange {
                min_secs: 2.0,
                max_secs: 2.0,
            }),
            backoff_factor: 3.0,
        };
        let started = tokio::time::Instant::now();
        let _ = retry_with_backoff(&policy, "u", || async {
            Err::<u32, ScraperError>(server_error())
        })
        .await;
        // 2s after the first failure, 6s after the second, none after the last.
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn huge_backoff_factor_saturates_instead_of_panicking() {
        let policy = RetryPolicy {
            max_attempts: 2,
            initial_delay: Some(DelayRange {
                min_secs: 1.0,
                max_secs: 1.0,
            }),
            backoff_factor: 1e300,
        };
        let result = retry_with_backoff(&policy, "https://x/y", || async {
            Err::<u32, ScraperError>(server_error())
        })
        .await;
        assert!(
            matches!(result, Err(ScraperError::LoadPage { retries: 2, .. })),
            "expected LoadPage after two attempts, got: {result:?}"
        );
    }

    #[test]
    fn grow_delay_saturates() {
        assert_eq!(grow_delay(Duration::from_secs(2), 3.0), Duration::from_secs(6));
        assert_eq!(grow_delay(Duration::from_secs(1), 1e300), Duration::MAX);
    }

    #[test]
    fn retriable_classification() {
        assert!(is_retriable(&server_error()));
        assert!(is_retriable(&ScraperError::UnexpectedStatus {
            status: 429,
            url: String::new()
        }));
        assert!(!is_retriable(&ScraperError::InitialStateMissing));
    }
}
