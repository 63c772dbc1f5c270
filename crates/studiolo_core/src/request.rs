use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single-prompt completion request.
///
/// Only the prompt is required. Everything else is an optional override that
/// drivers map onto their backend's tuning knobs, falling back to the
/// driver's configured defaults when unset.
///
/// ```
/// use studiolo_core::GenerateRequest;
/// use std::time::Duration;
///
/// let req = GenerateRequest::new("Summarize photosynthesis.")
///     .with_system("You are a patient tutor.")
///     .with_temperature(0.3)
///     .with_timeout(Duration::from_secs(120));
/// assert_eq!(req.prompt(), "Summarize photosynthesis.");
/// assert_eq!(*req.temperature(), Some(0.3));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Getters, Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct GenerateRequest {
    /// The text the model should complete.
    #[setters(skip)]
    prompt: String,
    /// Optional system framing sent alongside the prompt.
    system: Option<String>,
    /// Sampling temperature override.
    temperature: Option<f32>,
    /// Nucleus sampling override.
    top_p: Option<f32>,
    /// Top-k sampling override.
    top_k: Option<u32>,
    /// Cap on the number of tokens generated.
    max_tokens: Option<u32>,
    /// Model override. Unset means the driver's active model.
    model: Option<String>,
    /// Deadline for the whole call, including queue time at the backend.
    timeout: Option<Duration>,
}

impl GenerateRequest {
    /// Creates a request carrying only a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// The completed output of a generation call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerateResponse {
    /// Full response text.
    content: String,
    /// Model that produced the response.
    model: String,
    /// Whether the backend reported the generation as finished.
    done: bool,
}

impl GenerateResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>, done: bool) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_leaves_overrides_unset() {
        let req = GenerateRequest::new("prompt");
        assert!(req.system().is_none());
        assert!(req.temperature().is_none());
        assert!(req.model().is_none());
        assert!(req.timeout().is_none());
    }

    #[test]
    fn setters_strip_the_option() {
        let req = GenerateRequest::new("p")
            .with_model("qwen2.5:7b")
            .with_top_k(40u32)
            .with_max_tokens(512u32);
        assert_eq!(req.model().as_deref(), Some("qwen2.5:7b"));
        assert_eq!(*req.top_k(), Some(40));
        assert_eq!(*req.max_tokens(), Some(512));
    }
}
