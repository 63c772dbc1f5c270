//! Document analysis and tutoring over a single-flight model backend.
//!
//! The centerpiece is [`AnalysisPipeline`]: normalize, categorize, analyze,
//! prioritize, finalize. It turns uploaded study documents into an ordered
//! topic list, treating per-document failures and unusable model output as
//! routine rather than fatal. [`Tutor`] wraps the pipeline together with the
//! interactive operations (explanations, practice questions, grading, chat,
//! study plans), all generic over
//! [`StudioloDriver`](studiolo_interface::StudioloDriver).
//!
//! Model replies are free text with a JSON payload buried somewhere inside;
//! [`extract_payload`] cuts it out and decodes it in one strict step.

mod config;
mod extract;
mod pipeline;
mod prompts;
#[cfg(test)]
mod testing;
mod tutor;

pub use config::{DEFAULT_FAST_MODEL, TutorConfig};
pub use extract::{QuestionListPayload, RankingPayload, TopicListPayload, extract_payload};
pub use pipeline::AnalysisPipeline;
pub use tutor::Tutor;
