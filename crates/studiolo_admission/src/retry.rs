//! Classified retry loop for generation calls.

use std::time::Duration;
use studiolo_error::{
    BackendError, CancelledError, RetryClass, RetryableError, StudioloError, StudioloResult,
};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Retry policy for a generation call.
///
/// The defaults mirror what a local Ollama server tolerates: three attempts,
/// a backoff that grows with the attempt number, and a longer cool-down when
/// the server itself crashed or returned a 5xx, giving it time to reload the
/// model before the next try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before attempt `n` is `backoff_unit * n`. No sleep before the
    /// first attempt.
    pub backoff_unit: Duration,
    /// Extra wait after a crashed or 5xx response, on top of the backoff.
    pub cooldown: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(2),
            cooldown: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Backoff applied before the given attempt number.
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

/// Runs `operation` until it succeeds, the policy is exhausted, or the
/// caller cancels.
///
/// Errors steer the loop through their [`RetryClass`]: cancellation stops
/// immediately, cool-down errors sleep [`RetryConfig::cooldown`] before the
/// next attempt, everything else just takes the regular backoff. When every
/// attempt fails, the last error is returned.
///
/// The gate permit is the caller's concern. Acquire it once around this
/// whole loop, so retries of one call cannot interleave with another.
#[instrument(skip(cancel, operation))]
pub async fn retry_with_policy<F, Fut, T>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> StudioloResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = StudioloResult<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_err: Option<StudioloError> = None;

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            let backoff = config.backoff_before(attempt);
            debug!(attempt, backoff_ms = backoff.as_millis() as u64, "Backing off before retry");
            tokio::select! {
                _ = sleep(backoff) => {}
                _ = cancel.cancelled() => {
                    return Err(CancelledError::new("Cancelled while backing off").into());
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(CancelledError::new("Cancelled before attempt").into());
        }

        debug!(attempt, "Executing operation");
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => match err.retry_class() {
                RetryClass::Cancelled => {
                    debug!(attempt, "Operation cancelled, not retrying");
                    return Err(err);
                }
                RetryClass::CoolDown => {
                    warn!(
                        attempt,
                        cooldown_ms = config.cooldown.as_millis() as u64,
                        error = %err,
                        "Backend unstable, cooling down"
                    );
                    tokio::select! {
                        _ = sleep(config.cooldown) => {}
                        _ = cancel.cancelled() => {
                            return Err(CancelledError::new("Cancelled during cool-down").into());
                        }
                    }
                    last_err = Some(err);
                }
                RetryClass::Backoff => {
                    warn!(attempt, error = %err, "Attempt failed");
                    last_err = Some(err);
                }
            },
        }
    }

    warn!(max_attempts, "All retry attempts exhausted");
    Err(last_err.unwrap_or_else(|| BackendError::new("Retry loop made no attempts").into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use studiolo_error::{OllamaError, OllamaErrorKind};

    fn fast_policy() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            backoff_unit: Duration::from_millis(1),
            cooldown: Duration::from_millis(1),
        }
    }

    fn server_hiccup() -> StudioloError {
        OllamaError::new(OllamaErrorKind::Api {
            status_code: 503,
            message: "loading model".to_string(),
        })
        .into()
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt_without_sleeping() {
        let calls = AtomicU32::new(0);
        let result = retry_with_policy(&fast_policy(), &CancellationToken::new(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42u32) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_with_policy(&fast_policy(), &CancellationToken::new(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(server_hiccup())
                } else {
                    Ok("recovered")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_the_last_error() {
        let calls = AtomicU32::new(0);
        let result: StudioloResult<()> =
            retry_with_policy(&fast_policy(), &CancellationToken::new(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(server_hiccup()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelled_errors_stop_the_loop() {
        let calls = AtomicU32::new(0);
        let result: StudioloResult<()> =
            retry_with_policy(&fast_policy(), &CancellationToken::new(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(OllamaError::new(OllamaErrorKind::Cancelled).into()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1, "No retry after cancellation");
    }

    #[tokio::test]
    async fn pre_cancelled_token_skips_the_operation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let calls = AtomicU32::new(0);
        let result: StudioloResult<()> = retry_with_policy(&fast_policy(), &cancel, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn backoff_grows_with_the_attempt_number() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_before(2), Duration::from_secs(4));
        assert_eq!(config.backoff_before(3), Duration::from_secs(6));
    }
}
