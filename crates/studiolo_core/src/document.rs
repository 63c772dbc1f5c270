use chrono::{DateTime, Utc};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A study document whose extracted text feeds the analysis pipeline.
///
/// Extraction happens upstream. By the time a document reaches this
/// library its `content` is plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct Document {
    /// Stable identifier, assigned at upload time.
    #[builder(default = "Uuid::new_v4().to_string()")]
    id: String,
    /// Display name, usually the original filename.
    name: String,
    /// Where the original file lives, if known.
    #[builder(default)]
    path: String,
    /// Extracted plain text.
    content: String,
    /// Page count of the original, zero when unknown.
    #[builder(default)]
    page_count: u32,
    /// Upload timestamp.
    #[builder(default = "Utc::now()")]
    uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Creates a document from a name and its extracted text, generating a
    /// fresh id and stamping the current time.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            path: String::new(),
            content: content.into(),
            page_count: 0,
            uploaded_at: Utc::now(),
        }
    }

    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_a_unique_id() {
        let a = Document::new("notes.pdf", "alpha");
        let b = Document::new("notes.pdf", "alpha");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn builder_fills_defaults() {
        let doc = Document::builder()
            .name("script.pdf")
            .content("lecture text")
            .build()
            .expect("name and content are set");
        assert!(!doc.id().is_empty());
        assert_eq!(*doc.page_count(), 0);
    }
}
