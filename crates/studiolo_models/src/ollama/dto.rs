//! Data transfer objects for the Ollama HTTP API.

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Sampling options accepted by Ollama's generation endpoints.
///
/// Serialized under the `options` key. Fields the caller did not set are
/// omitted so the server applies its own model defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OllamaOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Nucleus sampling cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Top-k sampling cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Token generation cap, Ollama's `num_predict`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

impl OllamaOptions {
    /// True when no option is set and the key can be omitted entirely.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.num_predict.is_none()
    }
}

/// Request body for `/api/generate`.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OllamaGenerateRequest {
    /// Model tag to generate with
    model: String,
    /// The prompt text
    prompt: String,
    /// Whether to stream NDJSON frames or buffer the full response
    stream: bool,
    /// Optional system framing
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Sampling options
    #[builder(default)]
    #[serde(skip_serializing_if = "OllamaOptions::is_empty")]
    options: OllamaOptions,
}

impl OllamaGenerateRequest {
    /// Creates a new builder for OllamaGenerateRequest.
    pub fn builder() -> OllamaGenerateRequestBuilder {
        OllamaGenerateRequestBuilder::default()
    }
}

/// One response frame from `/api/generate`.
///
/// A buffered call returns exactly one frame; a streaming call returns many,
/// the last with `done` set. The server reports failures mid-stream through
/// the `error` field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaGenerateResponse {
    /// Text produced in this frame
    #[serde(default)]
    pub response: String,
    /// Model that produced it
    #[serde(default)]
    pub model: String,
    /// Whether generation is finished
    #[serde(default)]
    pub done: bool,
    /// Server-side failure description
    #[serde(default)]
    pub error: Option<String>,
}

/// A message in Ollama's chat format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OllamaChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

/// Request body for `/api/chat`.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OllamaChatRequest {
    /// Model tag to chat with
    model: String,
    /// Conversation history, oldest first
    messages: Vec<OllamaChatMessage>,
    /// Whether to stream the reply
    stream: bool,
    /// Sampling options
    #[builder(default)]
    #[serde(skip_serializing_if = "OllamaOptions::is_empty")]
    options: OllamaOptions,
}

impl OllamaChatRequest {
    /// Creates a new builder for OllamaChatRequest.
    pub fn builder() -> OllamaChatRequestBuilder {
        OllamaChatRequestBuilder::default()
    }
}

/// Response body for a buffered `/api/chat` call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaChatResponse {
    /// The assistant's reply
    #[serde(default)]
    pub message: OllamaChatMessage,
    /// Model that produced it
    #[serde(default)]
    pub model: String,
    /// Whether the reply is complete
    #[serde(default)]
    pub done: bool,
}

/// One entry in the `/api/tags` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModelEntry {
    /// Model tag
    pub name: String,
    /// Last modification of the model files
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    /// On-disk size in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

/// Response body for `/api/tags`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaTagsResponse {
    /// Installed models
    #[serde(default)]
    pub models: Vec<OllamaModelEntry>,
}
