use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One increment of a streamed generation.
///
/// A stream is a sequence of content chunks followed by at most one terminal
/// chunk, which either has `done` set or carries an error message. Consumers
/// stop reading once [`ContentChunk::is_terminal`] returns true.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ContentChunk {
    /// Text produced since the previous chunk. May be empty on the final chunk.
    content: String,
    /// Set on the last chunk of a successful stream.
    done: bool,
    /// Set when the stream failed mid-flight. No further chunks follow.
    error: Option<String>,
}

impl ContentChunk {
    /// Creates a content-bearing chunk.
    pub fn new(content: impl Into<String>, done: bool) -> Self {
        Self {
            content: content.into(),
            done,
            error: None,
        }
    }

    /// Creates a terminal chunk describing a mid-stream failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            done: false,
            error: Some(message.into()),
        }
    }

    /// True when no further chunks will arrive after this one.
    pub fn is_terminal(&self) -> bool {
        self.done || self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_chunks_are_not_terminal() {
        assert!(!ContentChunk::new("hello", false).is_terminal());
    }

    #[test]
    fn done_and_error_chunks_are_terminal() {
        assert!(ContentChunk::new("", true).is_terminal());
        assert!(ContentChunk::failed("connection reset").is_terminal());
    }
}
