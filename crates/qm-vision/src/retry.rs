//! Retry with exponential back-off and jitter for vision calls.
//!
//! Transient failures (network, timeouts, 429, 5xx) are retried; anything
//! that would fail the same way again is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::VisionError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`VisionError::Http`] timeouts, connection failures, and 5xx statuses.
/// - [`VisionError::RateLimited`] (HTTP 429).
/// - [`VisionError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable:**
/// - [`VisionError::UnexpectedStatus`] with a 4xx status.
/// - [`VisionError::Deserialize`] and [`VisionError::EmptyResponse`]: the
///   endpoint answered, just not usefully.
/// - [`VisionError::InvalidEndpoint`] and [`VisionError::MissingApiKey`].
pub(crate) fn is_retriable(err: &VisionError) -> bool {
    match err {
        VisionError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        VisionError::RateLimited { .. } => true,
        VisionError::UnexpectedStatus { status, .. } => *status >= 500,
        VisionError::Deserialize { .. }
        | VisionError::EmptyResponse { .. }
        | VisionError::InvalidEndpoint { .. }
        | VisionError::MissingApiKey => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry sleeps for [`backoff_delay_ms`]: `backoff_base_ms * 2^(n-1)`
/// with ±25 % jitter, never shorter than a 429's `Retry-After`, and never
/// longer than 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, VisionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VisionError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry >= max_retries || !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };
        retry += 1;

        let delay_ms = backoff_delay_ms(
            retry,
            backoff_base_ms,
            retry_after_hint(&err),
            rand::random::<f64>(),
        );
        tracing::warn!(
            retry,
            max_retries,
            delay_ms,
            error = %err,
            "vision request failed, backing off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Server-requested minimum wait, in seconds.
fn retry_after_hint(err: &VisionError) -> Option<u64> {
    match err {
        VisionError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
        _ => None,
    }
}

/// Delay before retry number `retry` (1-based).
///
/// `jitter_unit` is a sample from `[0, 1)` mapped onto a 0.75–1.25 factor.
fn backoff_delay_ms(
    retry: u32,
    backoff_base_ms: u64,
    retry_after_secs: Option<u64>,
    jitter_unit: f64,
) -> u64 {
    let exponent = retry.saturating_sub(1).min(16);
    let computed = backoff_base_ms.saturating_mul(1u64 << exponent);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed.min(MAX_DELAY_MS) as f64 * (0.75 + jitter_unit * 0.5)) as u64;
    let floor = retry_after_secs.map_or(0, |secs| secs.saturating_mul(1_000));
    jittered.max(floor).min(MAX_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> VisionError {
        VisionError::UnexpectedStatus {
            status: 503,
            url: "http://vision.test/check".to_owned(),
        }
    }

    fn rate_limited(retry_after_secs: u64) -> VisionError {
        VisionError::RateLimited { retry_after_secs }
    }

    // ---------------------------------------------------------------------------
    // Classification
    // ---------------------------------------------------------------------------

    #[test]
    fn only_server_side_statuses_are_retriable() {
        for (status, expected) in [(400, false), (404, false), (429, false), (500, true), (503, true)] {
            let err = VisionError::UnexpectedStatus {
                status,
                url: "http://vision.test/check".to_owned(),
            };
            assert_eq!(is_retriable(&err), expected, "status {status}");
        }
    }

    #[test]
    fn rate_limit_is_retriable() {
        assert!(is_retriable(&rate_limited(0)));
    }

    #[test]
    fn answered_but_unusable_replies_are_final() {
        let source = serde_json::from_str::<()>("{").unwrap_err();
        assert!(!is_retriable(&VisionError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
        assert!(!is_retriable(&VisionError::EmptyResponse {
            context: "test".to_owned()
        }));
        assert!(!is_retriable(&VisionError::MissingApiKey));
    }

    // ---------------------------------------------------------------------------
    // Delay schedule
    // ---------------------------------------------------------------------------

    #[test]
    fn delay_doubles_per_retry_without_jitter() {
        assert_eq!(backoff_delay_ms(1, 1_000, None, 0.5), 1_000);
        assert_eq!(backoff_delay_ms(2, 1_000, None, 0.5), 2_000);
        assert_eq!(backoff_delay_ms(3, 1_000, None, 0.5), 4_000);
    }

    #[test]
    fn jitter_stays_within_a_quarter_of_the_base_delay() {
        assert_eq!(backoff_delay_ms(1, 1_000, None, 0.0), 750);
        let high = backoff_delay_ms(1, 1_000, None, 0.999);
        assert!((1_240..1_250).contains(&high), "got {high}");
    }

    #[test]
    fn delay_is_capped_at_thirty_seconds() {
        assert_eq!(backoff_delay_ms(3, 20_000, None, 0.999), MAX_DELAY_MS);
        assert_eq!(backoff_delay_ms(60, 1_000, None, 0.5), MAX_DELAY_MS);
    }

    #[test]
    fn retry_after_sets_a_floor() {
        assert_eq!(backoff_delay_ms(1, 0, Some(3), 0.5), 3_000);
        assert_eq!(backoff_delay_ms(1, 10_000, Some(1), 0.5), 10_000);
    }

    #[test]
    fn retry_after_floor_is_still_capped() {
        assert_eq!(backoff_delay_ms(1, 0, Some(120), 0.0), MAX_DELAY_MS);
    }

    #[test]
    fn retry_after_hint_only_comes_from_rate_limits() {
        assert_eq!(retry_after_hint(&rate_limited(7)), Some(7));
        assert_eq!(retry_after_hint(&unavailable()), None);
    }

    // ---------------------------------------------------------------------------
    // Retry loop
    // ---------------------------------------------------------------------------

    #[tokio::test]
    async fn rate_limit_then_success_is_retried() {
        let mut calls = 0u32;
        let result = retry_with_backoff(2, 0, || {
            calls += 1;
            let call = calls;
            async move {
                if call == 1 {
                    Err(rate_limited(0))
                } else {
                    Ok("clean")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "clean");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn exhausted_retries_return_the_last_error() {
        let mut calls = 0u32;
        let result: Result<(), _> = retry_with_backoff(2, 0, || {
            calls += 1;
            async { Err(unavailable()) }
        })
        .await;
        assert_eq!(calls, 3);
        assert!(matches!(
            result,
            Err(VisionError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn client_errors_stop_after_one_attempt() {
        let mut calls = 0u32;
        let result: Result<(), _> = retry_with_backoff(5, 0, || {
            calls += 1;
            async {
                Err(VisionError::UnexpectedStatus {
                    status: 403,
                    url: "http://vision.test/check".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls, 1);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn zero_retries_means_a_single_attempt() {
        let mut calls = 0u32;
        let result: Result<(), _> = retry_with_backoff(0, 0, || {
            calls += 1;
            async { Err(rate_limited(0)) }
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(VisionError::RateLimited { .. })));
    }
}
