//! Extraction of structured payloads from model text output.
//!
//! Models wrap their JSON in prose no matter how firmly the prompt forbids
//! it. The extractor cuts from the first `{` to the last `}` and decodes the
//! slice in one step: either the whole payload conforms to the expected
//! shape, or the caller gets an error and applies its stage-specific
//! fallback. There is no partial application.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use studiolo_core::{Question, Topic};
use studiolo_error::{ExtractError, ExtractErrorKind};

/// Cuts the JSON object out of `text` and decodes it as `T`.
///
/// # Errors
///
/// [`ExtractErrorKind::MissingPayload`] when no `{...}` region exists,
/// [`ExtractErrorKind::Malformed`] when the region does not decode as `T`.
pub fn extract_payload<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let (Some(open), Some(close)) = (text.find('{'), text.rfind('}')) else {
        return Err(ExtractError::new(ExtractErrorKind::MissingPayload));
    };
    if open > close {
        return Err(ExtractError::new(ExtractErrorKind::MissingPayload));
    }

    let payload = &text[open..=close];
    serde_json::from_str(payload)
        .map_err(|e| ExtractError::new(ExtractErrorKind::Malformed(e.to_string())))
}

/// Wire shape of the per-document analysis result.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicListPayload {
    /// Topics found in the document
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// Wire shape of the question generation result.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionListPayload {
    /// Generated practice questions
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Wire shape of the exam-relevance ranking result.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingPayload {
    /// Topic names, most exam-relevant first
    #[serde(default)]
    pub priority: Vec<String>,
}
