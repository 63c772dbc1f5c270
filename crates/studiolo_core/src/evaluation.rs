use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// The graded outcome of an answer check.
///
/// Decoded from model output with every field defaulted, since graders
/// sometimes omit the score or even the verdict.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Evaluation {
    /// Whether the answer was judged correct.
    #[serde(default)]
    is_correct: bool,
    /// Feedback shown to the learner.
    #[serde(default)]
    feedback: String,
    /// Score from 0 to 100.
    #[serde(default)]
    score: f32,
}

impl Evaluation {
    pub fn new(is_correct: bool, feedback: impl Into<String>, score: f32) -> Self {
        Self {
            is_correct,
            feedback: feedback.into(),
            score,
        }
    }
}
