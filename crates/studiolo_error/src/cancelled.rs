//! Cancellation error types.

/// Caller-initiated cancellation with source location.
///
/// Raised when an operation observes its cancellation handle firing, or when
/// a per-call deadline expires. Never retried.
#[derive(Debug, Clone)]
pub struct CancelledError {
    /// Description of the cancelled operation
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl CancelledError {
    /// Create a new CancelledError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for CancelledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cancelled: {} at line {} in {}",
            self.message, self.line, self.file
        )
    }
}

impl std::error::Error for CancelledError {}
