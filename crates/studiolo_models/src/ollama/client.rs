//! Ollama HTTP client implementing the backend driver contract.

use crate::ollama::dto::{OllamaChatResponse, OllamaGenerateResponse, OllamaTagsResponse};
use crate::ollama::{conversions, stream};
use async_trait::async_trait;
use derive_getters::Getters;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use studiolo_core::{ChatMessage, GenerateRequest, GenerateResponse, ModelInfo};
use studiolo_error::{OllamaError, OllamaErrorKind, StudioloResult};
use studiolo_interface::{ChunkStream, StudioloDriver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};
use typed_builder::TypedBuilder;

/// Default Ollama endpoint on the local machine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default model, a good quality/latency balance for tutoring.
pub const DEFAULT_MODEL: &str = "qwen2.5:7b";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    900
}

fn default_probe_timeout_secs() -> u64 {
    5
}

/// Connection settings for an Ollama server.
///
/// Every field has a default, so an empty config section yields a client
/// against `http://localhost:11434` with the standard model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct OllamaConfig {
    /// Base URL of the server
    #[serde(default = "default_base_url")]
    #[builder(default = default_base_url())]
    base_url: String,
    /// Model used when a request carries no override
    #[serde(default = "default_model")]
    #[builder(default = default_model())]
    model: String,
    /// Ceiling for one buffered call, in seconds. Local models chew on big
    /// prompts for minutes, so the default is generous (15 minutes).
    #[serde(default = "default_request_timeout_secs")]
    #[builder(default = default_request_timeout_secs())]
    request_timeout_secs: u64,
    /// Ceiling for the availability probe, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    #[builder(default = default_probe_timeout_secs())]
    probe_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl OllamaConfig {
    /// Whole-call ceiling as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Probe ceiling as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Client for a local Ollama server.
///
/// Raw driver: every method issues exactly one HTTP call and maps failures
/// onto [`OllamaErrorKind`]. Serialization across callers and retries belong
/// to the admission layer wrapping this client.
///
/// The active model is interior-mutable so long-lived handles can switch
/// between a quality model and a fast one without rebuilding the client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: Arc<RwLock<String>>,
    probe_timeout: Duration,
}

impl OllamaClient {
    /// Creates a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    #[instrument(skip(config), fields(url = %config.base_url(), model = %config.model()))]
    pub fn new(config: &OllamaConfig) -> Result<Self, OllamaError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OllamaError::new(OllamaErrorKind::Network(e.to_string())))?;

        debug!("Created Ollama client");

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: Arc::new(RwLock::new(config.model().clone())),
            probe_timeout: config.probe_timeout(),
        })
    }

    /// Client against the default local endpoint.
    pub fn localhost() -> Result<Self, OllamaError> {
        Self::new(&OllamaConfig::default())
    }

    /// Checks that the server answers and the active model is installed.
    ///
    /// Distinguishes an unreachable server from a reachable one that is
    /// missing the model, so startup diagnostics can tell the user which
    /// problem to fix.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> StudioloResult<()> {
        if !self.is_available().await {
            return Err(OllamaError::new(OllamaErrorKind::ServerNotRunning(
                self.base_url.clone(),
            ))
            .into());
        }

        let model = self.current_model();
        let models = self.models().await?;
        if !models.iter().any(|m| m.name() == &model) {
            return Err(OllamaError::new(OllamaErrorKind::ModelNotFound(model)).into());
        }

        debug!(model = %model, "Ollama server validated");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn resolve_model(&self, req: &GenerateRequest) -> String {
        req.model()
            .clone()
            .unwrap_or_else(|| self.model.read().clone())
    }

    /// Maps a transport failure onto the error taxonomy.
    ///
    /// Connection refusal means the server is not running at all, a timeout
    /// means the caller's deadline expired, and a "terminated" message is the
    /// model runner dying under us.
    fn transport_error(&self, err: reqwest::Error) -> OllamaError {
        if err.is_timeout() {
            return OllamaError::new(OllamaErrorKind::Cancelled);
        }
        if err.is_connect() {
            return OllamaError::new(OllamaErrorKind::ServerNotRunning(self.base_url.clone()));
        }

        let text = err.to_string();
        if text.contains("terminated") {
            OllamaError::new(OllamaErrorKind::Crashed(text))
        } else {
            OllamaError::new(OllamaErrorKind::Network(text))
        }
    }

    /// One POST with a JSON body, racing the caller's cancellation token.
    async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<T, OllamaError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let call = async {
            let response = request.send().await.map_err(|e| self.transport_error(e))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                error!(status = %status, error = %message, "API error");
                return Err(OllamaError::new(OllamaErrorKind::Api {
                    status_code: status.as_u16(),
                    message,
                }));
            }

            response.json::<T>().await.map_err(|e| {
                error!(error = ?e, "Failed to parse response");
                OllamaError::new(OllamaErrorKind::Decode(e.to_string()))
            })
        };

        tokio::select! {
            result = call => result,
            _ = cancel.cancelled() => {
                debug!(path, "Call cancelled by caller");
                Err(OllamaError::new(OllamaErrorKind::Cancelled))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, OllamaError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "API error");
            return Err(OllamaError::new(OllamaErrorKind::Api {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            OllamaError::new(OllamaErrorKind::Decode(e.to_string()))
        })
    }
}

#[async_trait]
impl StudioloDriver for OllamaClient {
    #[instrument(skip(self, req, cancel), fields(backend = "ollama"))]
    async fn generate(
        &self,
        req: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse> {
        let model = self.resolve_model(req);
        let body = conversions::to_generate_request(req, &model, false)?;

        debug!(
            model = %model,
            prompt_chars = req.prompt().len(),
            "Sending generate request"
        );

        let frame: OllamaGenerateResponse = self
            .post_json("/api/generate", &body, *req.timeout(), cancel)
            .await?;

        debug!(model = %frame.model, chars = frame.response.len(), "Received response");
        Ok(conversions::from_generate_frame(frame))
    }

    #[instrument(skip(self, req, cancel), fields(backend = "ollama"))]
    async fn generate_stream(
        &self,
        req: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> StudioloResult<ChunkStream> {
        let model = self.resolve_model(req);
        let body = conversions::to_generate_request(req, &model, true)?;

        debug!(model = %model, "Opening generate stream");

        let mut request = self.client.post(self.endpoint("/api/generate")).json(&body);
        if let Some(timeout) = req.timeout() {
            request = request.timeout(*timeout);
        }

        let response = tokio::select! {
            result = request.send() => result.map_err(|e| self.transport_error(e))?,
            _ = cancel.cancelled() => {
                return Err(OllamaError::new(OllamaErrorKind::Cancelled).into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "API error");
            return Err(OllamaError::new(OllamaErrorKind::Api {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        Ok(stream::spawn_ndjson_pump(
            response.bytes_stream(),
            cancel.clone(),
        ))
    }

    #[instrument(skip(self, messages, cancel), fields(backend = "ollama"))]
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse> {
        let model = self.current_model();
        let body = conversions::to_chat_request(messages, &model, temperature)?;

        debug!(model = %model, turns = messages.len(), "Sending chat request");

        let response: OllamaChatResponse = self.post_json("/api/chat", &body, None, cancel).await?;

        Ok(conversions::from_chat_response(response))
    }

    async fn models(&self) -> StudioloResult<Vec<ModelInfo>> {
        let tags: OllamaTagsResponse = self.get_json("/api/tags").await?;

        Ok(tags
            .models
            .into_iter()
            .map(conversions::to_model_info)
            .collect())
    }

    async fn is_available(&self) -> bool {
        match self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn set_model(&self, model: &str) {
        *self.model.write() = model.to_string();
    }

    fn current_model(&self) -> String {
        self.model.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: OllamaConfig =
            serde_json::from_value(serde_json::json!({"model": "llama3.2:3b"})).unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.model(), "llama3.2:3b");
        assert_eq!(config.request_timeout(), Duration::from_secs(900));
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn builder_and_default_agree() {
        assert_eq!(OllamaConfig::default(), OllamaConfig::builder().build());
    }

    #[test]
    fn trailing_slash_is_trimmed_from_the_base_url() {
        let config = OllamaConfig::builder()
            .base_url("http://localhost:11434/".to_string())
            .build();
        let client = OllamaClient::new(&config).unwrap();

        assert_eq!(client.endpoint("/api/tags"), "http://localhost:11434/api/tags");
    }

    #[test]
    fn request_model_override_beats_the_active_model() {
        let client = OllamaClient::localhost().unwrap();

        let plain = GenerateRequest::new("p");
        assert_eq!(client.resolve_model(&plain), DEFAULT_MODEL);

        let fast = GenerateRequest::new("p").with_model("llama3.2:3b");
        assert_eq!(client.resolve_model(&fast), "llama3.2:3b");
    }

    #[test]
    fn set_model_switches_subsequent_calls() {
        let client = OllamaClient::localhost().unwrap();
        client.set_model("mistral:7b");

        assert_eq!(client.current_model(), "mistral:7b");
        assert_eq!(
            client.resolve_model(&GenerateRequest::new("p")),
            "mistral:7b"
        );
    }
}
