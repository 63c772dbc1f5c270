//! Studiolo: a study tutor built on a capacity-constrained local LLM.
//!
//! A local inference backend survives exactly one generation at a time, so
//! everything here funnels through a single-slot admission gate with a
//! classified retry loop on top. Above that sit the document-analysis
//! pipeline and the tutoring operations, all generic over the
//! [`StudioloDriver`] trait.
//!
//! This crate is the assembly point: it re-exports the workspace surface and
//! adds [`StudioloConfig`], which reads one TOML file and wires the whole
//! stack together:
//!
//! ```rust,no_run
//! use studiolo::{Document, StudioloConfig, init_tracing};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> studiolo::StudioloResult<()> {
//! init_tracing();
//! let tutor = StudioloConfig::from_file("studiolo.toml")?.connect()?;
//!
//! let docs = vec![Document::new("week1.pdf", "lecture text...")];
//! let topics = tutor.analyze_documents(&docs, &CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod observability;

pub use config::{AdmissionConfig, StudioloConfig};
pub use observability::init_tracing;

pub use tokio_util::sync::CancellationToken;

pub use studiolo_admission::{AdmissionGate, AdmissionPermit, ResilientClient, RetryConfig};
pub use studiolo_core::{
    ChatMessage, ContentChunk, Document, Evaluation, Explanation, GenerateRequest,
    GenerateResponse, ModelInfo, PlanStatus, PlannedTopic, Question, QuestionKind, Role, StudyPlan,
    Topic, TopicStatus,
};
pub use studiolo_error::{
    RetryClass, RetryableError, StudioloError, StudioloErrorKind, StudioloResult,
};
pub use studiolo_interface::{ChunkStream, DocumentSource, InMemoryDocuments, StudioloDriver};
pub use studiolo_models::{OllamaClient, OllamaConfig};
pub use studiolo_tutor::{AnalysisPipeline, Tutor, TutorConfig, extract_payload};
