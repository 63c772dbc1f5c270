//! Driver decorator combining the admission gate with the retry policy.

use crate::{AdmissionGate, AdmissionPermit, RetryConfig, retry_with_policy};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use studiolo_core::{ChatMessage, ContentChunk, GenerateRequest, GenerateResponse, ModelInfo};
use studiolo_error::{CancelledError, StudioloResult};
use studiolo_interface::{ChunkStream, StudioloDriver};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// A [`StudioloDriver`] wrapper that serializes and retries generation calls.
///
/// The wrapper is itself a driver, so callers stay generic over
/// `StudioloDriver` and pick up resilience by construction:
///
/// ```rust,ignore
/// use studiolo_admission::ResilientClient;
/// use studiolo_models::OllamaClient;
///
/// let client = ResilientClient::new(OllamaClient::default());
/// let response = client.generate(&request, &cancel).await?;
/// ```
///
/// `generate` and `chat` hold the gate across their whole retry loop, so two
/// callers can never interleave attempts. `generate_stream` is a single
/// attempt (replaying half a stream would duplicate output) and holds the
/// gate until the returned stream is dropped. Model listing and the
/// availability probe bypass the gate; they are cheap and must work while a
/// generation is in flight.
#[derive(Debug)]
pub struct ResilientClient<D> {
    driver: D,
    gate: Arc<AdmissionGate>,
    retry: RetryConfig,
}

impl<D> ResilientClient<D> {
    /// Wraps a driver with the default single-slot gate and retry policy.
    pub fn new(driver: D) -> Self {
        Self::with_policy(driver, AdmissionGate::single(), RetryConfig::default())
    }

    /// Wraps a driver with an explicit gate and retry policy.
    pub fn with_policy(driver: D, gate: AdmissionGate, retry: RetryConfig) -> Self {
        Self {
            driver,
            gate: Arc::new(gate),
            retry,
        }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The gate shared by every generation call on this client.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// The retry policy applied to `generate` and `chat`.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Waits for a gate slot, abandoning the wait if the caller cancels.
    async fn admit(&self, cancel: &CancellationToken) -> StudioloResult<AdmissionPermit> {
        tokio::select! {
            permit = self.gate.acquire() => Ok(permit),
            _ = cancel.cancelled() => {
                Err(CancelledError::new("Cancelled while waiting for admission").into())
            }
        }
    }
}

#[async_trait]
impl<D: StudioloDriver> StudioloDriver for ResilientClient<D> {
    #[instrument(skip(self, req, cancel), fields(driver = self.driver.name()))]
    async fn generate(
        &self,
        req: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse> {
        let _permit = self.admit(cancel).await?;
        retry_with_policy(&self.retry, cancel, || self.driver.generate(req, cancel)).await
    }

    #[instrument(skip(self, req, cancel), fields(driver = self.driver.name()))]
    async fn generate_stream(
        &self,
        req: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> StudioloResult<ChunkStream> {
        let permit = self.admit(cancel).await?;
        let inner = self.driver.generate_stream(req, cancel).await?;

        Ok(Box::pin(GatedStream {
            inner,
            _permit: permit,
        }))
    }

    #[instrument(skip(self, messages, cancel), fields(driver = self.driver.name()))]
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> StudioloResult<GenerateResponse> {
        let _permit = self.admit(cancel).await?;
        retry_with_policy(&self.retry, cancel, || {
            self.driver.chat(messages, temperature, cancel)
        })
        .await
    }

    async fn models(&self) -> StudioloResult<Vec<ModelInfo>> {
        self.driver.models().await
    }

    async fn is_available(&self) -> bool {
        self.driver.is_available().await
    }

    fn name(&self) -> &str {
        self.driver.name()
    }

    fn set_model(&self, model: &str) {
        self.driver.set_model(model)
    }

    fn current_model(&self) -> String {
        self.driver.current_model()
    }
}

/// Stream wrapper that keeps the gate slot occupied until dropped.
struct GatedStream {
    inner: ChunkStream,
    _permit: AdmissionPermit,
}

impl Stream for GatedStream {
    type Item = ContentChunk;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use studiolo_error::{OllamaError, OllamaErrorKind};
    use tokio_stream::wrappers::ReceiverStream;

    struct ScriptedDriver {
        fail_first: u32,
        hold: Duration,
        calls: AtomicU32,
        concurrent: AtomicU32,
        max_concurrent: AtomicU32,
        model: Mutex<String>,
    }

    impl ScriptedDriver {
        fn flaky(fail_first: u32, hold: Duration) -> Self {
            Self {
                fail_first,
                hold,
                calls: AtomicU32::new(0),
                concurrent: AtomicU32::new(0),
                max_concurrent: AtomicU32::new(0),
                model: Mutex::new("mock:latest".to_string()),
            }
        }

        fn steady() -> Self {
            Self::flaky(0, Duration::ZERO)
        }
    }

    #[async_trait]
    impl StudioloDriver for ScriptedDriver {
        async fn generate(
            &self,
            req: &GenerateRequest,
            _cancel: &CancellationToken,
        ) -> StudioloResult<GenerateResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let active = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_concurrent.fetch_max(active, Ordering::SeqCst);
            if !self.hold.is_zero() {
                tokio::time::sleep(self.hold).await;
            }
            self.concurrent.fetch_sub(1, Ordering::SeqCst);

            if n < self.fail_first {
                Err(OllamaError::new(OllamaErrorKind::Network("connection reset".to_string()))
                    .into())
            } else {
                Ok(GenerateResponse::new(
                    format!("echo: {}", req.prompt()),
                    "mock",
                    true,
                ))
            }
        }

        async fn generate_stream(
            &self,
            _req: &GenerateRequest,
            _cancel: &CancellationToken,
        ) -> StudioloResult<ChunkStream> {
            let (tx, rx) = tokio::sync::mpsc::channel(4);
            tx.try_send(ContentChunk::new("part", false)).ok();
            tx.try_send(ContentChunk::new("", true)).ok();

            Ok(ReceiverStream::new(rx).boxed())
        }

        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _temperature: Option<f32>,
            _cancel: &CancellationToken,
        ) -> StudioloResult<GenerateResponse> {
            Ok(GenerateResponse::new("chat reply", "mock", true))
        }

        async fn models(&self) -> StudioloResult<Vec<ModelInfo>> {
            Ok(vec![ModelInfo::new("mock:latest")])
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn set_model(&self, model: &str) {
            *self.model.lock().unwrap() = model.to_string();
        }

        fn current_model(&self) -> String {
            self.model.lock().unwrap().clone()
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            backoff_unit: Duration::from_millis(1),
            cooldown: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn concurrent_generations_never_overlap() {
        let client = Arc::new(ResilientClient::with_policy(
            ScriptedDriver::flaky(0, Duration::from_millis(20)),
            AdmissionGate::single(),
            fast_retry(),
        ));

        let mut handles = Vec::new();
        for i in 0..3 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                let req = GenerateRequest::new(format!("prompt {i}"));
                client.generate(&req, &CancellationToken::new()).await
            }));
        }
        for handle in handles {
            handle.await.expect("task completes").expect("generation succeeds");
        }

        assert_eq!(client.driver().max_concurrent.load(Ordering::SeqCst), 1);
        assert_eq!(client.driver().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_run_under_one_admission() {
        let client = ResilientClient::with_policy(
            ScriptedDriver::flaky(2, Duration::ZERO),
            AdmissionGate::single(),
            fast_retry(),
        );

        let req = GenerateRequest::new("stubborn prompt");
        let response = client
            .generate(&req, &CancellationToken::new())
            .await
            .expect("third attempt succeeds");

        assert_eq!(response.content(), "echo: stubborn prompt");
        assert_eq!(client.driver().calls.load(Ordering::SeqCst), 3);
        assert_eq!(client.gate().available(), 1, "Slot returned after the retry loop");
    }

    #[tokio::test]
    async fn stream_occupies_the_slot_until_dropped() {
        let client = ResilientClient::with_policy(
            ScriptedDriver::steady(),
            AdmissionGate::single(),
            fast_retry(),
        );

        let req = GenerateRequest::new("stream me");
        let stream = client
            .generate_stream(&req, &CancellationToken::new())
            .await
            .expect("stream opens");

        assert!(client.gate().try_acquire().is_none(), "Stream holds the slot");

        let chunks: Vec<ContentChunk> = stream.collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.last().expect("two chunks").is_terminal());

        assert!(client.gate().try_acquire().is_some(), "Slot freed after stream end");
    }

    #[tokio::test]
    async fn queued_caller_cancels_cleanly() {
        let client = Arc::new(ResilientClient::with_policy(
            ScriptedDriver::steady(),
            AdmissionGate::single(),
            fast_retry(),
        ));

        let held = client.gate().acquire().await;
        let cancel = CancellationToken::new();

        let waiting = {
            let client = client.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let req = GenerateRequest::new("never runs");
                client.generate(&req, &cancel).await
            })
        };

        tokio::time::sleep(Duration::from_millis(5)).await;
        cancel.cancel();

        let result = waiting.await.expect("task completes");
        assert!(result.is_err(), "Queued caller surfaces cancellation");
        assert_eq!(
            client.driver().calls.load(Ordering::SeqCst),
            0,
            "Driver never called"
        );

        drop(held);
    }

    #[tokio::test]
    async fn model_management_passes_through() {
        let client = ResilientClient::new(ScriptedDriver::steady());

        assert_eq!(client.name(), "mock");
        client.set_model("qwen2.5:7b");
        assert_eq!(client.current_model(), "qwen2.5:7b");

        let models = client.models().await.expect("listing succeeds");
        assert_eq!(models.len(), 1);
        assert!(client.is_available().await);
    }
}
