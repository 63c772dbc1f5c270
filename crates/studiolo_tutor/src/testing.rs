//! Scripted driver for orchestration tests.

use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use studiolo_core::{
    ChatMessage, ContentChunk, GenerateRequest, GenerateResponse, ModelInfo,
};
use studiolo_error::{BackendError, StudioloResult};
use studiolo_interface::{ChunkStream, StudioloDriver};
use tokio_util::sync::CancellationToken;

/// One recorded generation call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub prompt: String,
    pub system: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout: Option<Duration>,
}

/// Driver that replays a fixed script of responses and records every call.
///
/// Responses are consumed in order across `generate`, `generate_stream`, and
/// `chat`. Running past the script is an error, which doubles as a check
/// that the code under test makes exactly the expected number of calls.
pub(crate) struct ScriptedDriver {
    script: Mutex<VecDeque<StudioloResult<GenerateResponse>>>,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub chats: Mutex<Vec<(Vec<ChatMessage>, Option<f32>)>>,
}

impl ScriptedDriver {
    pub fn replaying(script: Vec<StudioloResult<GenerateResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a successful scripted reply.
    pub fn text(content: &str) -> StudioloResult<GenerateResponse> {
        Ok(GenerateResponse::new(content, "scripted", true))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_response(&self) -> StudioloResult<GenerateResponse> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::new("Script exhausted").into()))
    }

    fn record(&self, req: &GenerateRequest) {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: req.prompt().clone(),
            system: req.system().clone(),
            model: req.model().clone(),
            temperature: *req.temperature(),
            timeout: *req.timeout(),
        });
    }
}

#[async_trait]
impl StudioloDriver for ScriptedDriver {
    async fn generate(
        &self,
        req: &GenerateRequest,
        _cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse> {
        self.record(req);
        self.next_response()
    }

    async fn generate_stream(
        &self,
        req: &GenerateRequest,
        _cancel: &CancellationToken,
    ) -> StudioloResult<ChunkStream> {
        self.record(req);
        let response = self.next_response()?;
        let chunks = vec![
            ContentChunk::new(response.content().clone(), false),
            ContentChunk::new("", true),
        ];

        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
        _cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse> {
        self.chats.lock().unwrap().push((messages.to_vec(), temperature));
        self.next_response()
    }

    async fn models(&self) -> StudioloResult<Vec<ModelInfo>> {
        Ok(vec![ModelInfo::new("scripted")])
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn set_model(&self, _model: &str) {}

    fn current_model(&self) -> String {
        "scripted".to_string()
    }
}
