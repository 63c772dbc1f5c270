//! The tutor operations: everything the learner interacts with.

use crate::config::TutorConfig;
use crate::extract::{QuestionListPayload, extract_payload};
use crate::pipeline::AnalysisPipeline;
use crate::prompts;
use chrono::{DateTime, Utc};
use studiolo_core::{
    ChatMessage, Document, Evaluation, Explanation, GenerateRequest, Question, StudyPlan, Topic,
};
use studiolo_error::StudioloResult;
use studiolo_interface::StudioloDriver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// High-level tutoring operations over any [`StudioloDriver`].
///
/// Owns the driver and a [`TutorConfig`]. Hand it a gated
/// [`ResilientClient`](https://docs.rs/studiolo_admission) in production;
/// the tutor itself assumes nothing about serialization or retries.
#[derive(Debug)]
pub struct Tutor<D> {
    driver: D,
    config: TutorConfig,
}

impl<D: StudioloDriver> Tutor<D> {
    /// Creates a tutor with default configuration.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, TutorConfig::default())
    }

    pub fn with_config(driver: D, config: TutorConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Runs the full analysis pipeline over `documents`.
    pub async fn analyze_documents(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> StudioloResult<Vec<Topic>> {
        AnalysisPipeline::new(&self.driver, &self.config)
            .run(documents, cancel)
            .await
    }

    /// Writes a markdown explanation of `topic` grounded in `content`.
    #[instrument(skip(self, content, cancel), fields(topic))]
    pub async fn explain_topic(
        &self,
        topic: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> StudioloResult<Explanation> {
        let content = prompts::clip(content, prompts::TOPIC_CONTENT_CAP);
        let req = GenerateRequest::new(prompts::explain_topic(topic, content))
            .with_temperature(prompts::EXPLAIN_TEMPERATURE)
            .with_timeout(self.config.analysis_timeout());

        let response = self.driver.generate(&req, cancel).await?;
        Ok(Explanation::new(topic, response.content().trim()))
    }

    /// Generates practice questions for `topic` at the given difficulty.
    ///
    /// `count` falls back to the configured default and is capped at the
    /// configured maximum.
    ///
    /// # Errors
    ///
    /// Unlike the pipeline stages, a malformed reply here propagates as an
    /// extraction error; the caller sees it and can simply ask again.
    #[instrument(skip(self, content, cancel), fields(topic, difficulty))]
    pub async fn generate_questions(
        &self,
        topic: &str,
        content: &str,
        count: Option<u32>,
        difficulty: u8,
        cancel: &CancellationToken,
    ) -> StudioloResult<Vec<Question>> {
        let count = count
            .unwrap_or(*self.config.question_count())
            .min(*self.config.max_questions());
        let content = prompts::clip(content, prompts::TOPIC_CONTENT_CAP);
        let req = GenerateRequest::new(prompts::generate_questions(
            topic, content, count, difficulty,
        ))
        .with_temperature(prompts::QUESTION_TEMPERATURE)
        .with_timeout(self.config.analysis_timeout());

        let response = self.driver.generate(&req, cancel).await?;
        let payload: QuestionListPayload = extract_payload(response.content())?;
        debug!(questions = payload.questions.len(), "Questions generated");
        Ok(payload.questions)
    }

    /// Grades a learner's answer against a question.
    ///
    /// Answers too short to mean anything are rejected without a backend
    /// call. When the grader's reply does not decode, the verdict falls back
    /// to inspecting the raw reply text, with that text as the feedback;
    /// a rough grade still beats an error dialog mid-study-session.
    #[instrument(skip(self, question, answer, cancel))]
    pub async fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
        cancel: &CancellationToken,
    ) -> StudioloResult<Evaluation> {
        if answer.trim().chars().count() < 3 {
            return Ok(Evaluation::new(
                false,
                "That answer is too short. Try writing out your thinking.",
                0.0,
            ));
        }

        let req = GenerateRequest::new(prompts::evaluate_answer(
            question.question(),
            question.expected_answer(),
            answer,
        ))
        .with_temperature(prompts::EVALUATE_TEMPERATURE)
        .with_timeout(self.config.analysis_timeout());

        let response = self.driver.generate(&req, cancel).await?;
        match extract_payload::<Evaluation>(response.content()) {
            Ok(evaluation) => Ok(evaluation),
            Err(err) => {
                warn!(error = %err, "Grader reply did not decode, falling back to text inspection");
                let reply = response.content().to_lowercase();
                let verdict = reply.contains("correct") && !reply.contains("incorrect");
                Ok(Evaluation::new(
                    verdict,
                    response.content().trim(),
                    if verdict { 100.0 } else { 0.0 },
                ))
            }
        }
    }

    /// One turn of topic-bound tutoring chat.
    ///
    /// The history is the caller's transcript so far, oldest first, without
    /// any system message; the tutor prepends its own context framing.
    #[instrument(skip(self, content, history, cancel), fields(topic, turns = history.len()))]
    pub async fn chat(
        &self,
        topic: &str,
        content: &str,
        history: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> StudioloResult<String> {
        let content = prompts::clip(content, prompts::TOPIC_CONTENT_CAP);
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(prompts::chat_system(topic, content)));
        messages.extend_from_slice(history);

        let response = self
            .driver
            .chat(&messages, Some(prompts::CHAT_TEMPERATURE), cancel)
            .await?;
        Ok(response.content().clone())
    }

    /// Lays `topics` out as a study plan ending at `exam_date`.
    ///
    /// Pure computation, no backend call.
    pub fn create_study_plan(
        &self,
        name: &str,
        exam_date: DateTime<Utc>,
        topics: Vec<Topic>,
    ) -> StudyPlan {
        StudyPlan::schedule(name, exam_date, topics)
    }
}
