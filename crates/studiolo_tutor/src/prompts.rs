//! Prompt construction for the tutoring operations.
//!
//! Temperatures step down with how mechanical the task is: grading wants
//! near-determinism, explanations can breathe a little.

/// Temperature for per-document topic analysis.
pub(crate) const ANALYZE_TEMPERATURE: f32 = 0.3;
/// Temperature for exam-relevance ranking.
pub(crate) const RANK_TEMPERATURE: f32 = 0.2;
/// Temperature for topic explanations.
pub(crate) const EXPLAIN_TEMPERATURE: f32 = 0.5;
/// Temperature for question generation.
pub(crate) const QUESTION_TEMPERATURE: f32 = 0.4;
/// Temperature for answer grading.
pub(crate) const EVALUATE_TEMPERATURE: f32 = 0.1;
/// Temperature for tutoring chat.
pub(crate) const CHAT_TEMPERATURE: f32 = 0.5;

/// Character budget for one analyzed document.
pub(crate) const ANALYZE_CONTENT_CAP: usize = 4_000;
/// Character budget per reference document in the ranking prompt.
pub(crate) const REFERENCE_DOC_CAP: usize = 2_000;
/// Total character budget for reference material in the ranking prompt.
pub(crate) const REFERENCE_TOTAL_CAP: usize = 10_000;
/// Character budget for source material in explanation, question, and chat
/// prompts.
pub(crate) const TOPIC_CONTENT_CAP: usize = 6_000;

/// Truncates to at most `max_chars` characters without splitting a
/// character.
pub(crate) fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Maps a 1-5 difficulty grade onto a phrase the model understands.
pub(crate) fn difficulty_label(difficulty: u8) -> &'static str {
    match difficulty {
        1 => "very easy, basic recall",
        2 => "easy",
        3 => "moderate",
        4 => "challenging",
        5 => "very hard, exam level",
        _ => "moderate",
    }
}

pub(crate) fn analyze_document(name: &str, content: &str) -> String {
    format!(
        r#"You are analyzing study material for exam preparation.

Document: {name}

{content}

Identify the distinct topics a student must master from this document. Respond with ONLY a JSON object in exactly this form, no prose before or after:
{{"topics": [{{"name": "Topic name", "description": "One or two sentences", "difficulty": 3, "est_minutes": 30}}]}}

Difficulty is an integer from 1 (easy) to 5 (hard). Estimate minutes realistically for a student seeing the material for the second time."#
    )
}

pub(crate) fn rank_topics(topic_names: &[String], reference: &str) -> String {
    let listing = topic_names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"These topics were extracted from course material:
{listing}

The following exam and exercise material hints at what the examiner emphasizes:

{reference}

Order the topic names from most to least exam-relevant. Respond with ONLY a JSON object:
{{"priority": ["most relevant topic name", "next topic name"]}}

Use the topic names exactly as given above. Include every topic."#
    )
}

pub(crate) fn explain_topic(topic: &str, content: &str) -> String {
    format!(
        r#"You are a patient tutor. Explain the topic "{topic}" to a student preparing for an exam.

Source material:
{content}

Write a clear markdown explanation: a short introduction, the core ideas one by one, and a worked example where it helps. Stay under 500 words and do not assume knowledge beyond the material."#
    )
}

pub(crate) fn generate_questions(topic: &str, content: &str, count: u32, difficulty: u8) -> String {
    let grade = difficulty_label(difficulty);

    format!(
        r#"Create {count} practice questions about "{topic}" at {grade} difficulty.

Source material:
{content}

Respond with ONLY a JSON object in exactly this form:
{{"questions": [{{"question": "The question text", "expected_answer": "The expected answer", "hints": ["Mildest hint first"], "type": "open"}}]}}

Allowed type values: "open", "multiple_choice", "true_false". Multiple choice questions also carry an "options" array with exactly one correct entry."#
    )
}

pub(crate) fn evaluate_answer(question: &str, expected: &str, answer: &str) -> String {
    format!(
        r#"You are grading a student's answer.

Question: {question}
Expected answer: {expected}
Student's answer: {answer}

Judge whether the student's answer is correct in substance; wording may differ from the expected answer. Respond with ONLY a JSON object:
{{"is_correct": true, "feedback": "Two sentences at most, encouraging but honest", "score": 85}}

Score is an integer from 0 to 100."#
    )
}

pub(crate) fn chat_system(topic: &str, content: &str) -> String {
    format!(
        r#"You are a study tutor helping with the topic "{topic}". Ground your answers in the material below and say so explicitly when a question goes beyond it. Prefer short answers with one concrete example.

Material:
{content}"#
    )
}
