//! Core data types shared across the Studiolo workspace.
//!
//! Everything a backend driver consumes or produces lives here: generation
//! requests and responses, chat messages, streamed content chunks, and the
//! study-domain records (documents, topics, questions, evaluations, plans)
//! that the analysis pipeline and tutor operate on.
//!
//! The types are plain data. Behavior belongs to the driver implementations
//! in `studiolo_models` and the orchestration layers above them.

mod chunk;
mod document;
mod evaluation;
mod explanation;
mod message;
mod model_info;
mod plan;
mod question;
mod request;
mod role;
mod topic;

pub use chunk::ContentChunk;
pub use document::{Document, DocumentBuilder, DocumentBuilderError};
pub use evaluation::Evaluation;
pub use explanation::Explanation;
pub use message::{ChatMessage, ChatMessageBuilder, ChatMessageBuilderError};
pub use model_info::ModelInfo;
pub use plan::{PlanStatus, PlannedTopic, StudyPlan, TopicStatus};
pub use question::{Question, QuestionKind};
pub use request::{GenerateRequest, GenerateResponse};
pub use role::Role;
pub use topic::Topic;
