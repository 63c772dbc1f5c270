use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A study topic identified during document analysis.
///
/// Topics come out of model output, so deserialization is tolerant: missing
/// numeric fields fall back to a middling difficulty and a half-hour
/// estimate rather than failing the whole analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Topic {
    /// Short topic name, e.g. "Partial derivatives".
    name: String,
    /// One or two sentences on what the topic covers.
    #[serde(default)]
    description: String,
    /// Difficulty from 1 (easy) to 5 (hard).
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    /// Estimated study time in minutes.
    ///
    /// The alias forgives models that expand the key despite the prompt.
    #[serde(default = "default_minutes", alias = "estimated_minutes")]
    est_minutes: u32,
}

fn default_difficulty() -> u8 {
    3
}

fn default_minutes() -> u32 {
    30
}

impl Topic {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            difficulty: default_difficulty(),
            est_minutes: default_minutes(),
        }
    }

    pub fn with_estimates(mut self, difficulty: u8, est_minutes: u32) -> Self {
        self.difficulty = difficulty;
        self.est_minutes = est_minutes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_model_output_still_decodes() {
        let topic: Topic = serde_json::from_str(r#"{"name": "Limits"}"#).unwrap();
        assert_eq!(topic.name(), "Limits");
        assert_eq!(*topic.difficulty(), 3);
        assert_eq!(*topic.est_minutes(), 30);
    }

    #[test]
    fn wire_name_for_minutes_is_est_minutes() {
        let topic: Topic = serde_json::from_str(
            r#"{"name": "Chain rule", "description": "Composites", "difficulty": 4, "est_minutes": 45}"#,
        )
        .unwrap();
        assert_eq!(*topic.est_minutes(), 45);
    }

    #[test]
    fn expanded_minutes_key_is_accepted_too() {
        let topic: Topic =
            serde_json::from_str(r#"{"name": "Chain rule", "estimated_minutes": 45}"#).unwrap();
        assert_eq!(*topic.est_minutes(), 45);
    }
}
