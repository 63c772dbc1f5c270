//! The document analysis pipeline.
//!
//! Linear stages, no branching back: normalize, categorize, analyze,
//! prioritize, finalize. Individual document failures and a failed ranking
//! pass degrade gracefully; most topics found beats all-or-nothing. Only
//! cancellation and a fully unusable document set abort a run.

use crate::config::TutorConfig;
use crate::extract::{RankingPayload, TopicListPayload, extract_payload};
use crate::prompts;
use std::collections::HashSet;
use studiolo_core::{Document, GenerateRequest, Topic};
use studiolo_error::{PipelineError, PipelineErrorKind, StudioloResult};
use studiolo_interface::StudioloDriver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Turns a pile of study documents into an ordered topic list.
///
/// The pipeline borrows its driver, so the same gated client can serve the
/// pipeline and the interactive tutor operations at once; the admission gate
/// under the driver keeps them from overlapping at the backend.
#[derive(Debug)]
pub struct AnalysisPipeline<'a, D> {
    driver: &'a D,
    config: &'a TutorConfig,
}

impl<'a, D: StudioloDriver> AnalysisPipeline<'a, D> {
    pub fn new(driver: &'a D, config: &'a TutorConfig) -> Self {
        Self { driver, config }
    }

    /// Runs every stage and returns the final topic order.
    ///
    /// # Errors
    ///
    /// [`PipelineErrorKind::Cancelled`] when `cancel` fires mid-run,
    /// [`PipelineErrorKind::NoUsableDocuments`] when not a single document
    /// produced topics.
    #[instrument(skip(self, documents, cancel), fields(documents = documents.len()))]
    pub async fn run(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> StudioloResult<Vec<Topic>> {
        let unique = normalize(documents);
        let (primary, reference) = categorize(&unique);

        // A set of nothing but old exams still deserves analysis; fall back
        // to every unique document rather than failing on an empty primary
        // partition.
        let to_analyze: Vec<&Document> = if primary.is_empty() {
            debug!("No primary documents, analyzing all unique documents");
            unique.iter().collect()
        } else {
            primary
        };

        let topics = self.analyze(&to_analyze, cancel).await?;
        if topics.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::NoUsableDocuments).into());
        }

        let topics = self.prioritize(topics, &reference, cancel).await;
        let finalized = dedupe_topics(topics);
        info!(topics = finalized.len(), "Document analysis finished");
        Ok(finalized)
    }

    /// Stage three: one generation per document, sequentially.
    ///
    /// Parallel dispatch would only queue at the admission gate, so the loop
    /// stays sequential on purpose. Per-document failures are logged and
    /// skipped; cancellation aborts.
    async fn analyze(
        &self,
        documents: &[&Document],
        cancel: &CancellationToken,
    ) -> StudioloResult<Vec<Topic>> {
        let mut topics = Vec::new();
        for doc in documents {
            if cancel.is_cancelled() {
                return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
            }

            let content = prompts::clip(doc.content(), prompts::ANALYZE_CONTENT_CAP);
            let req = GenerateRequest::new(prompts::analyze_document(doc.name(), content))
                .with_temperature(prompts::ANALYZE_TEMPERATURE)
                .with_model(self.config.fast_model().clone())
                .with_timeout(self.config.analysis_timeout());

            let response = match self.driver.generate(&req, cancel).await {
                Ok(response) => response,
                Err(err) if err.is_cancelled() => {
                    return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
                }
                Err(err) => {
                    warn!(document = %doc.name(), error = %err, "Analysis failed, skipping");
                    continue;
                }
            };

            match extract_payload::<TopicListPayload>(response.content()) {
                Ok(payload) => {
                    debug!(
                        document = %doc.name(),
                        topics = payload.topics.len(),
                        "Document analyzed"
                    );
                    topics.extend(payload.topics);
                }
                Err(err) => {
                    warn!(document = %doc.name(), error = %err, "Unusable analysis output, skipping");
                }
            }
        }
        Ok(topics)
    }

    /// Stage four: rank topics by exam relevance using reference material.
    ///
    /// Strictly optional. Any failure here keeps the discovery order, which
    /// is why this returns the topics instead of a result.
    async fn prioritize(
        &self,
        topics: Vec<Topic>,
        reference: &[&Document],
        cancel: &CancellationToken,
    ) -> Vec<Topic> {
        if reference.is_empty() || topics.is_empty() {
            return topics;
        }

        let names: Vec<String> = topics.iter().map(|t| t.name().clone()).collect();
        let material = reference_material(reference);
        let req = GenerateRequest::new(prompts::rank_topics(&names, &material))
            .with_temperature(prompts::RANK_TEMPERATURE)
            .with_model(self.config.fast_model().clone())
            .with_timeout(self.config.ranking_timeout());

        let response = match self.driver.generate(&req, cancel).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Ranking call failed, keeping discovery order");
                return topics;
            }
        };

        match extract_payload::<RankingPayload>(response.content()) {
            Ok(payload) => {
                debug!(ranked = payload.priority.len(), "Topics reordered by exam relevance");
                reorder(topics, &payload.priority)
            }
            Err(err) => {
                warn!(error = %err, "Unusable ranking output, keeping discovery order");
                topics
            }
        }
    }
}

/// Stage one: drop later documents with a name already seen, exact match.
fn normalize(documents: &[Document]) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .iter()
        .filter(|doc| seen.insert(doc.name().clone()))
        .cloned()
        .collect()
}

/// Stage two: partition into primary study material and exam/exercise
/// reference material by name.
fn categorize(documents: &[Document]) -> (Vec<&Document>, Vec<&Document>) {
    documents.iter().partition(|doc| !is_reference(doc.name()))
}

fn is_reference(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("exam") || name.contains("exercise")
}

/// Concatenates reference content under the per-document and total caps.
fn reference_material(reference: &[&Document]) -> String {
    let mut material = String::new();
    for doc in reference {
        if material.chars().count() >= prompts::REFERENCE_TOTAL_CAP {
            break;
        }
        material.push_str("--- ");
        material.push_str(doc.name());
        material.push_str(" ---\n");
        material.push_str(prompts::clip(doc.content(), prompts::REFERENCE_DOC_CAP));
        material.push_str("\n\n");
    }
    material
}

/// Reorders topics by their position in the ranking, ranked first.
///
/// Unranked topics sink below every ranked one but keep their relative
/// order, courtesy of the stable sort and the sentinel rank. Name lookup is
/// case-insensitive because models re-case freely.
fn reorder(topics: Vec<Topic>, priority: &[String]) -> Vec<Topic> {
    let rank = |name: &str| {
        priority
            .iter()
            .position(|p| p.to_lowercase() == name.to_lowercase())
            .unwrap_or(usize::MAX)
    };

    let mut keyed: Vec<(usize, Topic)> = topics
        .into_iter()
        .map(|topic| (rank(topic.name()), topic))
        .collect();
    keyed.sort_by_key(|(rank, _)| *rank);
    keyed.into_iter().map(|(_, topic)| topic).collect()
}

/// Stage five: collapse duplicate topic names, first occurrence wins.
fn dedupe_topics(topics: Vec<Topic>) -> Vec<Topic> {
    let mut seen = HashSet::new();
    topics
        .into_iter()
        .filter(|topic| seen.insert(topic.name().to_lowercase()))
        .collect()
}
