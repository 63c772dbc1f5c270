//! Document analysis pipeline error types.

/// Hard failure conditions for pipeline runs.
///
/// Individual document or ranking failures degrade gracefully inside the
/// pipeline; only these conditions abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PipelineErrorKind {
    /// The overall operation was cancelled
    Cancelled,
    /// No document could be analyzed successfully
    NoUsableDocuments,
}

impl std::fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineErrorKind::Cancelled => write!(f, "Analysis was cancelled"),
            PipelineErrorKind::NoUsableDocuments => {
                write!(f, "No usable documents: every analysis attempt failed")
            }
        }
    }
}

/// Error type for pipeline runs.
#[derive(Debug, Clone)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pipeline Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for PipelineError {}
