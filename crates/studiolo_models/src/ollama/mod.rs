//! Ollama backend driver.
//!
//! Speaks the native HTTP API of a local Ollama server: `/api/generate` for
//! completions (buffered and streamed), `/api/chat` for conversations, and
//! `/api/tags` for model listing and liveness probing.

mod client;
mod conversions;
mod dto;
mod stream;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, OllamaClient, OllamaConfig};
pub use dto::{
    OllamaChatMessage, OllamaChatRequest, OllamaChatResponse, OllamaGenerateRequest,
    OllamaGenerateResponse, OllamaModelEntry, OllamaOptions, OllamaTagsResponse,
};
