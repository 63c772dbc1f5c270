//! Retry classification for transient failures.

/// How the resilient call layer should react to a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryClass {
    /// Caller-initiated cancellation or deadline expiry. Stop immediately.
    Cancelled,
    /// Backend instability (process crash, 5xx). Sleep a fixed cool-down
    /// before the next attempt, in addition to the inter-attempt backoff.
    CoolDown,
    /// Any other transient failure. Retry after the inter-attempt backoff.
    Backoff,
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use studiolo_error::{OllamaError, OllamaErrorKind, RetryClass, RetryableError};
///
/// let err = OllamaError::new(OllamaErrorKind::Api {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// assert_eq!(err.retry_class(), RetryClass::CoolDown);
/// ```
pub trait RetryableError {
    /// Classify this error for the retry loop.
    fn retry_class(&self) -> RetryClass;

    /// Returns true if this error should trigger another attempt.
    ///
    /// Cancellation is the only class that stops the loop outright; the
    /// backend under load fails in ways that usually clear on their own.
    fn is_retryable(&self) -> bool {
        self.retry_class() != RetryClass::Cancelled
    }
}
