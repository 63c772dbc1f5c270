use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A tutor-written explanation of a single topic, rendered as markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Explanation {
    /// Topic the explanation covers.
    title: String,
    /// Markdown body.
    content: String,
}

impl Explanation {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
