use async_trait::async_trait;
use futures::stream::BoxStream;
use studiolo_core::{ChatMessage, ContentChunk, GenerateRequest, GenerateResponse, ModelInfo};
use studiolo_error::StudioloResult;
use tokio_util::sync::CancellationToken;

/// A finite stream of generation increments.
///
/// Ends after the first terminal chunk. Dropping the stream releases the
/// underlying connection.
pub type ChunkStream = BoxStream<'static, ContentChunk>;

/// Contract implemented by a model backend.
///
/// Drivers are single-attempt and unserialized: they issue exactly one call
/// per invocation and surface every failure as a typed error. Admission
/// control and retry live in the layer that wraps a driver, so the same
/// resilience policy applies to any backend.
///
/// All generation entry points take a [`CancellationToken`]; a driver must
/// return promptly with a cancellation error once the token fires, without
/// leaving the backend call running unattended.
#[async_trait]
pub trait StudioloDriver: Send + Sync {
    /// Runs a single-prompt completion to the end and returns the full text.
    async fn generate(
        &self,
        req: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse>;

    /// Starts a completion and returns its chunks as they arrive.
    async fn generate_stream(
        &self,
        req: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> StudioloResult<ChunkStream>;

    /// Runs a multi-turn conversation to the end and returns the reply.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse>;

    /// Lists the models the backend currently serves.
    async fn models(&self) -> StudioloResult<Vec<ModelInfo>>;

    /// Cheap liveness probe. Never hangs on an unreachable backend.
    async fn is_available(&self) -> bool;

    /// Short identifier for logs, e.g. `ollama`.
    fn name(&self) -> &str;

    /// Switches the active model for subsequent calls.
    fn set_model(&self, model: &str);

    /// The model used when a request carries no override.
    fn current_model(&self) -> String;
}
