use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};

/// The answer format a practice question expects.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one of the listed options.
    MultipleChoice,
    /// Free-form written answer.
    #[default]
    Open,
    /// The statement is either true or false.
    TrueFalse,
}

// Model output is not trusted to spell the kind correctly, so anything
// unrecognized decodes as an open question instead of failing the batch.
impl<'de> Deserialize<'de> for QuestionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.trim().to_lowercase().as_str() {
            "multiple_choice" => Self::MultipleChoice,
            "true_false" => Self::TrueFalse,
            _ => Self::Open,
        })
    }
}

/// A practice question generated for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Question {
    /// The question as shown to the learner.
    question: String,
    /// The answer the evaluator grades against.
    #[serde(default)]
    expected_answer: String,
    /// Progressive hints, mildest first.
    #[serde(default)]
    hints: Vec<String>,
    /// Expected answer format.
    #[serde(rename = "type", default)]
    kind: QuestionKind,
    /// Choices for multiple-choice questions, empty otherwise.
    #[serde(default)]
    options: Vec<String>,
}

impl Question {
    pub fn new(question: impl Into<String>, expected_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            expected_answer: expected_answer.into(),
            hints: Vec::new(),
            kind: QuestionKind::Open,
            options: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_decodes_as_open() {
        let q: Question = serde_json::from_str(
            r#"{"question": "Why?", "expected_answer": "Because", "type": "essay"}"#,
        )
        .unwrap();
        assert_eq!(*q.kind(), QuestionKind::Open);
    }

    #[test]
    fn known_kinds_round_trip() {
        let q: Question = serde_json::from_str(
            r#"{"question": "2+2?", "expected_answer": "4", "hints": ["even"], "type": "multiple_choice", "options": ["3", "4"]}"#,
        )
        .unwrap();
        assert_eq!(*q.kind(), QuestionKind::MultipleChoice);
        assert_eq!(q.options().len(), 2);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""type":"multiple_choice""#));
    }

    #[test]
    fn missing_optional_fields_default() {
        let q: Question = serde_json::from_str(r#"{"question": "Define a limit."}"#).unwrap();
        assert!(q.expected_answer().is_empty());
        assert!(q.hints().is_empty());
        assert_eq!(*q.kind(), QuestionKind::Open);
    }

    #[test]
    fn kind_display_matches_wire_form() {
        assert_eq!(QuestionKind::TrueFalse.to_string(), "true_false");
    }
}
