//! NDJSON pump turning an Ollama byte stream into content chunks.
//!
//! The server writes one JSON frame per line. Frames arrive split across
//! arbitrary byte boundaries, so the pump buffers bytes, cuts them at
//! newlines, and decodes line by line. Chunks flow to the consumer through
//! a bounded channel; a slow consumer therefore backpressures the socket
//! instead of growing a buffer.

use crate::ollama::conversions;
use crate::ollama::dto::OllamaGenerateResponse;
use futures::{Stream, StreamExt};
use studiolo_core::ContentChunk;
use studiolo_interface::ChunkStream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Chunks buffered between producer and consumer before backpressure.
const CHANNEL_CAPACITY: usize = 100;

/// Spawns a producer task decoding `bytes` and returns the consumer side.
///
/// The producer stops on the first terminal frame, on transport error, when
/// `cancel` fires, or when the consumer drops the stream. In every case the
/// byte stream (and with it the HTTP response) is dropped promptly.
pub(crate) fn spawn_ndjson_pump<S, B, E>(bytes: S, cancel: CancellationToken) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(pump(bytes, tx, cancel));

    ReceiverStream::new(rx).boxed()
}

async fn pump<S, B, E>(bytes: S, tx: mpsc::Sender<ContentChunk>, cancel: CancellationToken)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    tokio::pin!(bytes);
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        let item = tokio::select! {
            item = bytes.next() => item,
            _ = cancel.cancelled() => {
                debug!("Stream cancelled by caller");
                return;
            }
            // A consumer that just drops the stream must also free the
            // connection: between tokens a slow model can leave bytes.next()
            // pending for a long time, and the response held here keeps the
            // backend generating.
            _ = tx.closed() => {
                debug!("Consumer dropped the stream");
                return;
            }
        };

        match item {
            // Clean end of stream. A well-formed stream already ended at its
            // done frame; a server that closed early may leave one
            // unterminated frame behind.
            None => {
                if !buffer.iter().all(u8::is_ascii_whitespace) {
                    let _ = decode_and_send(&buffer, &tx).await;
                }
                return;
            }
            Some(Err(e)) => {
                warn!(error = %e, "Stream transport failed");
                let _ = tx.send(ContentChunk::failed(e.to_string())).await;
                return;
            }
            Some(Ok(data)) => {
                buffer.extend_from_slice(data.as_ref());
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = &line[..line.len() - 1];
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    match decode_and_send(line, &tx).await {
                        Flow::Continue => {}
                        Flow::Stop => return,
                    }
                }
            }
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

async fn decode_and_send(line: &[u8], tx: &mpsc::Sender<ContentChunk>) -> Flow {
    match serde_json::from_slice::<OllamaGenerateResponse>(line) {
        Ok(frame) => {
            let chunk = conversions::chunk_from_frame(frame);
            let terminal = chunk.is_terminal();
            if tx.send(chunk).await.is_err() {
                // Consumer is gone, stop reading the socket.
                return Flow::Stop;
            }
            if terminal { Flow::Stop } else { Flow::Continue }
        }
        Err(e) => {
            warn!(error = %e, "Malformed stream frame");
            let _ = tx
                .send(ContentChunk::failed(format!("Malformed stream frame: {e}")))
                .await;
            Flow::Stop
        }
    }
}
