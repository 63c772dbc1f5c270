//! Error types for the Studiolo library.
//!
//! This crate provides the foundation error types used throughout the
//! Studiolo workspace, plus the retry classification consumed by the
//! resilient call layer.

mod backend;
mod cancelled;
mod config;
mod extract;
mod ollama;
mod pipeline;
mod retry;

pub use backend::BackendError;
pub use cancelled::CancelledError;
pub use config::ConfigError;
pub use extract::{ExtractError, ExtractErrorKind};
pub use ollama::{OllamaError, OllamaErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use retry::{RetryClass, RetryableError};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum StudioloErrorKind {
    /// Generic backend error
    Backend(BackendError),
    /// Configuration error
    Config(ConfigError),
    /// Caller-initiated cancellation
    Cancelled(CancelledError),
    /// Ollama backend error
    Ollama(OllamaError),
    /// Structured extraction failure
    Extract(ExtractError),
    /// Document analysis pipeline failure
    Pipeline(PipelineError),
}

impl std::fmt::Display for StudioloErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudioloErrorKind::Backend(e) => write!(f, "{}", e),
            StudioloErrorKind::Config(e) => write!(f, "{}", e),
            StudioloErrorKind::Cancelled(e) => write!(f, "{}", e),
            StudioloErrorKind::Ollama(e) => write!(f, "{}", e),
            StudioloErrorKind::Extract(e) => write!(f, "{}", e),
            StudioloErrorKind::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

/// Studiolo error with kind discrimination.
#[derive(Debug)]
pub struct StudioloError(Box<StudioloErrorKind>);

impl StudioloError {
    /// Create a new error from a kind.
    pub fn new(kind: StudioloErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StudioloErrorKind {
        &self.0
    }

    /// Returns true if this error represents caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.retry_class() == RetryClass::Cancelled
    }
}

impl std::fmt::Display for StudioloError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Studiolo Error: {}", self.0)
    }
}

impl std::error::Error for StudioloError {}

// Generic From implementation for any type that converts to StudioloErrorKind
impl<T> From<T> for StudioloError
where
    T: Into<StudioloErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for StudioloError {
    fn retry_class(&self) -> RetryClass {
        match self.kind() {
            StudioloErrorKind::Cancelled(_) => RetryClass::Cancelled,
            StudioloErrorKind::Ollama(e) => e.retry_class(),
            StudioloErrorKind::Pipeline(e) if e.kind == PipelineErrorKind::Cancelled => {
                RetryClass::Cancelled
            }
            _ => RetryClass::Backoff,
        }
    }
}

/// Result type for Studiolo operations.
pub type StudioloResult<T> = std::result::Result<T, StudioloError>;
