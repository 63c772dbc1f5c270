//! Ollama-specific error types and retry classification.

use crate::{RetryClass, RetryableError};

/// Ollama-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OllamaErrorKind {
    /// Server is not reachable at the configured base URL
    ServerNotRunning(String),
    /// Requested model is not installed on the server
    ModelNotFound(String),
    /// HTTP error with status code and response body
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the response body
        message: String,
    },
    /// Network/transport failure other than connection refusal
    Network(String),
    /// Backend runner process crashed mid-request
    Crashed(String),
    /// Response body could not be decoded
    Decode(String),
    /// Request could not be constructed
    InvalidRequest(String),
    /// Request was cancelled or its deadline expired
    Cancelled,
}

impl std::fmt::Display for OllamaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OllamaErrorKind::ServerNotRunning(msg) => {
                write!(f, "Ollama server not reachable: {}", msg)
            }
            OllamaErrorKind::ModelNotFound(model) => {
                write!(f, "Model '{}' not found on server", model)
            }
            OllamaErrorKind::Api {
                status_code,
                message,
            } => write!(f, "HTTP {} error: {}", status_code, message),
            OllamaErrorKind::Network(msg) => write!(f, "Network error: {}", msg),
            OllamaErrorKind::Crashed(msg) => write!(f, "Backend runner crashed: {}", msg),
            OllamaErrorKind::Decode(msg) => write!(f, "Failed to decode response: {}", msg),
            OllamaErrorKind::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            OllamaErrorKind::Cancelled => write!(f, "Request cancelled or deadline exceeded"),
        }
    }
}

impl OllamaErrorKind {
    /// Classify this error for the retry loop.
    ///
    /// Crash signatures and 5xx-class statuses indicate the backend fell over
    /// under load and needs a cool-down; everything else short of
    /// cancellation is worth a plain retry.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            OllamaErrorKind::Cancelled => RetryClass::Cancelled,
            OllamaErrorKind::Crashed(_) => RetryClass::CoolDown,
            OllamaErrorKind::Api { status_code, .. } if (500..=599).contains(status_code) => {
                RetryClass::CoolDown
            }
            _ => RetryClass::Backoff,
        }
    }
}

/// Ollama error with source location tracking.
///
/// # Examples
///
/// ```
/// use studiolo_error::{OllamaError, OllamaErrorKind};
///
/// let err = OllamaError::new(OllamaErrorKind::ModelNotFound("qwen2.5:7b".to_string()));
/// assert!(format!("{}", err).contains("qwen2.5:7b"));
/// ```
#[derive(Debug, Clone)]
pub struct OllamaError {
    /// The kind of error that occurred
    pub kind: OllamaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OllamaError {
    /// Create a new OllamaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OllamaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for OllamaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ollama Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for OllamaError {}

impl RetryableError for OllamaError {
    fn retry_class(&self) -> RetryClass {
        self.kind.retry_class()
    }
}
