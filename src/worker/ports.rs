use async_trait::async_trait;

use crate::{
    store::types::{ConceptLink, Episode},
    worker::error::WorkerError,
};

/// External text-summarization collaborator for closed episodes.
#[async_trait]
pub trait EpisodeSummarizerPort: Send + Sync {
    async fn summarize(&self, episode: &Episode) -> Result<String, WorkerError>;
}

/// External concept-link extraction collaborator.
#[async_trait]
pub trait ConceptLinkExtractorPort: Send + Sync {
    async fn extract(&self, entity_id: &str) -> Result<Vec<ConceptLink>, WorkerError>;
}

/// Deterministic local summarizer: a headline over the member sequence.
/// Stands in until a text collaborator is wired.
pub struct HeadlineSummarizer;

#[async_trait]
impl EpisodeSummarizerPort for HeadlineSummarizer {
    async fn summarize(&self, episode: &Episode) -> Result<String, WorkerError> {
        let mut distinct: Vec<&str> = Vec::new();
        for member in &episode.member_ids {
            if !distinct.contains(&member.as_str()) {
                distinct.push(member.as_str());
            }
        }
        Ok(format!(
            "Episode {}: {} steps involving {}.",
            episode.id,
            episode.member_ids.len(),
            distinct.join(", ")
        ))
    }
}

pub struct NoopExtractor;

#[async_trait]
impl ConceptLinkExtractorPort for NoopExtractor {
    async fn extract(&self, _entity_id: &str) -> Result<Vec<ConceptLink>, WorkerError> {
        Ok(Vec::new())
    }
}
