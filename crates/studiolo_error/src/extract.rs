//! Structured extraction error types.

/// Specific error conditions for payload extraction.
///
/// Backend text output is inherently unreliable, so these are expected
/// outcomes with stage-local fallbacks, not exceptional failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtractErrorKind {
    /// No balanced payload delimiters were found in the text
    MissingPayload,
    /// Payload was located but does not decode into the expected shape
    Malformed(String),
}

impl std::fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractErrorKind::MissingPayload => {
                write!(f, "No structured payload found in response text")
            }
            ExtractErrorKind::Malformed(msg) => {
                write!(f, "Payload does not match expected shape: {}", msg)
            }
        }
    }
}

/// Error type for structured extraction.
///
/// # Examples
///
/// ```
/// use studiolo_error::{ExtractError, ExtractErrorKind};
///
/// let err = ExtractError::new(ExtractErrorKind::MissingPayload);
/// assert!(format!("{}", err).contains("No structured payload"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractError {
    /// The specific error condition
    pub kind: ExtractErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExtractError {
    /// Create a new ExtractError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Extraction Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ExtractError {}
