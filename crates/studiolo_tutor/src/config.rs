//! Tutor configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Model for bulk analysis passes, where latency beats polish.
pub const DEFAULT_FAST_MODEL: &str = "llama3.2:3b";

fn default_fast_model() -> String {
    DEFAULT_FAST_MODEL.to_string()
}

fn default_analysis_timeout_secs() -> u64 {
    120
}

fn default_ranking_timeout_secs() -> u64 {
    60
}

fn default_question_count() -> u32 {
    3
}

fn default_max_questions() -> u32 {
    10
}

/// Tuning knobs for the tutoring operations.
///
/// Every field defaults sensibly for a mid-range local machine, so an empty
/// `[tutor]` section works out of the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct TutorConfig {
    /// Model override for per-document analysis calls
    #[serde(default = "default_fast_model")]
    #[builder(default = default_fast_model())]
    fast_model: String,
    /// Deadline for one per-document or per-topic generation, in seconds
    #[serde(default = "default_analysis_timeout_secs")]
    #[builder(default = default_analysis_timeout_secs())]
    analysis_timeout_secs: u64,
    /// Deadline for the topic ranking generation, in seconds
    #[serde(default = "default_ranking_timeout_secs")]
    #[builder(default = default_ranking_timeout_secs())]
    ranking_timeout_secs: u64,
    /// Questions generated per request when the caller does not say
    #[serde(default = "default_question_count")]
    #[builder(default = default_question_count())]
    question_count: u32,
    /// Upper bound on questions per request, whatever the caller asks for
    #[serde(default = "default_max_questions")]
    #[builder(default = default_max_questions())]
    max_questions: u32,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TutorConfig {
    /// Per-task deadline as a [`Duration`].
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    /// Ranking deadline as a [`Duration`].
    pub fn ranking_timeout(&self) -> Duration {
        Duration::from_secs(self.ranking_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config: TutorConfig = serde_json::from_value(serde_json::json!({})).unwrap();

        assert_eq!(config.fast_model(), DEFAULT_FAST_MODEL);
        assert_eq!(config.analysis_timeout(), Duration::from_secs(120));
        assert_eq!(config.ranking_timeout(), Duration::from_secs(60));
        assert_eq!(*config.question_count(), 3);
        assert_eq!(*config.max_questions(), 10);
    }

    #[test]
    fn partial_config_keeps_the_rest_default() {
        let config: TutorConfig =
            serde_json::from_value(serde_json::json!({"question_count": 5})).unwrap();

        assert_eq!(*config.question_count(), 5);
        assert_eq!(config.fast_model(), DEFAULT_FAST_MODEL);
    }
}
