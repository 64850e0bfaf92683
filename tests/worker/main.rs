
use std::sync::Arc;

use async_trait::async_trait;
use cardia::{
    fusion::FusionInputs,
    store::{
        ConceptLink, Episode, InMemoryStore, MaintenanceBacklogGauge, MemoryItem,
        NeighborhoodEntry, StoreError, error::internal_error, ports::MaintenanceStore,
    },
};
use time::OffsetDateTime;

pub fn ts(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(secs).expect("valid timestamp")
}

/// Delegating store that fails `fusion_inputs` for one poisoned subject,
/// for batch-resilience scenarios.
pub struct FailingStore {
    pub inner: Arc<InMemoryStore>,
    pub poisoned_subject: String,
}

#[async_trait]
impl MaintenanceStore for FailingStore {
    async fn stale_neighborhood_subjects(
        &self,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        self.inner.stale_neighborhood_subjects(limit).await
    }

    async fn fusion_inputs(&self, subject_id: &str) -> Result<FusionInputs, StoreError> {
        if subject_id == self.poisoned_subject {
            return Err(internal_error("simulated read failure"));
        }
        self.inner.fusion_inputs(subject_id).await
    }

    async fn put_neighborhood(&self, entry: &NeighborhoodEntry) -> Result<(), StoreError> {
        self.inner.put_neighborhood(entry).await
    }

    async fn neighborhood(
        &self,
        subject_id: &str,
    ) -> Result<Option<NeighborhoodEntry>, StoreError> {
        self.inner.neighborhood(subject_id).await
    }

    async fn closed_unsummarized_episodes(
        &self,
        limit: usize,
    ) -> Result<Vec<Episode>, StoreError> {
        self.inner.closed_unsummarized_episodes(limit).await
    }

    async fn attach_episode_summary(
        &self,
        episode_id: &str,
        summary: &MemoryItem,
    ) -> Result<(), StoreError> {
        self.inner.attach_episode_summary(episode_id, summary).await
    }

    async fn entities_missing_concept_links(
        &self,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        self.inner.entities_missing_concept_links(limit).await
    }

    async fn put_concept_links(
        &self,
        entity_id: &str,
        links: &[ConceptLink],
    ) -> Result<(), StoreError> {
        self.inner.put_concept_links(entity_id, links).await
    }

    async fn evict_neighborhoods_over(&self, max_entries: usize) -> Result<usize, StoreError> {
        self.inner.evict_neighborhoods_over(max_entries).await
    }

    async fn maintenance_backlog(&self) -> Result<MaintenanceBacklogGauge, StoreError> {
        self.inner.maintenance_backlog().await
    }
}
