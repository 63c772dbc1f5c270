//! Conversions between core types and the Ollama wire format.

use crate::ollama::dto::{
    OllamaChatMessage, OllamaChatRequest, OllamaChatResponse, OllamaGenerateRequest,
    OllamaGenerateResponse, OllamaModelEntry, OllamaOptions,
};
use studiolo_core::{ChatMessage, ContentChunk, GenerateRequest, GenerateResponse, ModelInfo};
use studiolo_error::{OllamaError, OllamaErrorKind};

/// Collects the sampling overrides of a request into wire options.
pub(crate) fn sampling_options(req: &GenerateRequest) -> OllamaOptions {
    OllamaOptions {
        temperature: *req.temperature(),
        top_p: *req.top_p(),
        top_k: *req.top_k(),
        num_predict: *req.max_tokens(),
    }
}

/// Builds the `/api/generate` body from a core request.
pub(crate) fn to_generate_request(
    req: &GenerateRequest,
    model: &str,
    stream: bool,
) -> Result<OllamaGenerateRequest, OllamaError> {
    let mut builder = OllamaGenerateRequest::builder();
    builder
        .model(model)
        .prompt(req.prompt().clone())
        .stream(stream)
        .options(sampling_options(req));

    if let Some(system) = req.system() {
        builder.system(system.clone());
    }

    builder
        .build()
        .map_err(|e| OllamaError::new(OllamaErrorKind::InvalidRequest(e.to_string())))
}

/// Builds the `/api/chat` body from a conversation.
pub(crate) fn to_chat_request(
    messages: &[ChatMessage],
    model: &str,
    temperature: Option<f32>,
) -> Result<OllamaChatRequest, OllamaError> {
    let wire_messages: Vec<OllamaChatMessage> = messages
        .iter()
        .map(|m| OllamaChatMessage {
            role: m.role().as_str().to_string(),
            content: m.content().clone(),
        })
        .collect();

    let mut builder = OllamaChatRequest::builder();
    builder.model(model).messages(wire_messages).stream(false);

    if temperature.is_some() {
        builder.options(OllamaOptions {
            temperature,
            ..OllamaOptions::default()
        });
    }

    builder
        .build()
        .map_err(|e| OllamaError::new(OllamaErrorKind::InvalidRequest(e.to_string())))
}

/// Converts a buffered generate frame into the core response type.
pub(crate) fn from_generate_frame(frame: OllamaGenerateResponse) -> GenerateResponse {
    GenerateResponse::new(frame.response, frame.model, frame.done)
}

/// Converts a buffered chat response into the core response type.
pub(crate) fn from_chat_response(resp: OllamaChatResponse) -> GenerateResponse {
    GenerateResponse::new(resp.message.content, resp.model, resp.done)
}

/// Converts one streamed frame into a content chunk.
pub(crate) fn chunk_from_frame(frame: OllamaGenerateResponse) -> ContentChunk {
    match frame.error {
        Some(error) => ContentChunk::failed(error),
        None => ContentChunk::new(frame.response, frame.done),
    }
}

/// Converts a tags listing entry into the core model descriptor.
pub(crate) fn to_model_info(entry: OllamaModelEntry) -> ModelInfo {
    ModelInfo::with_details(entry.name, entry.modified_at, entry.size)
}
