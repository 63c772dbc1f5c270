//! Model backend drivers for Studiolo.
//!
//! One driver so far: [`OllamaClient`], speaking the HTTP API of a local
//! Ollama server. Drivers here are deliberately raw: one request per call,
//! no gating, no retries. Wrap them in
//! [`ResilientClient`](https://docs.rs/studiolo_admission) for production use.

pub mod ollama;

pub use ollama::{OllamaClient, OllamaConfig};
