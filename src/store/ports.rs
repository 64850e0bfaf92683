use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    backlog::types::Goal,
    fusion::types::FusionInputs,
    heartbeat::types::HeartbeatRecord,
    store::{
        error::StoreError,
        types::{
            ConceptLink, EntityId, Episode, MaintenanceBacklogGauge, MemoryItem,
            NeighborhoodEntry, SchedulerState,
        },
    },
};

/// Store surface for the heartbeat scheduler. The background worker never
/// receives this trait, which keeps "the worker must never decide"
/// structurally enforced rather than convention-enforced.
#[async_trait]
pub trait SchedulerStore: Send + Sync {
    async fn load_scheduler_state(&self) -> Result<Option<SchedulerState>, StoreError>;
    async fn save_scheduler_state(&self, state: &SchedulerState) -> Result<(), StoreError>;

    async fn load_goals(&self) -> Result<Vec<Goal>, StoreError>;
    async fn save_goals(&self, goals: &[Goal]) -> Result<(), StoreError>;

    async fn append_heartbeat_record(&self, record: &HeartbeatRecord) -> Result<(), StoreError>;
    async fn recent_heartbeat_records(
        &self,
        limit: usize,
    ) -> Result<Vec<HeartbeatRecord>, StoreError>;

    async fn append_memory(&self, item: &MemoryItem) -> Result<(), StoreError>;
    async fn recent_memories(&self, limit: usize) -> Result<Vec<MemoryItem>, StoreError>;

    async fn active_topics(&self) -> Result<Vec<String>, StoreError>;
    async fn identity_summary(&self) -> Result<Option<String>, StoreError>;
    async fn pending_events(&self) -> Result<Vec<String>, StoreError>;
    async fn last_user_contact(&self) -> Result<Option<OffsetDateTime>, StoreError>;
}

/// Store surface for the background worker: derived caches and maintenance
/// queues only. No goals, no energy, no heartbeat records.
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    async fn stale_neighborhood_subjects(&self, limit: usize)
    -> Result<Vec<EntityId>, StoreError>;
    async fn fusion_inputs(&self, subject_id: &str) -> Result<FusionInputs, StoreError>;
    async fn put_neighborhood(&self, entry: &NeighborhoodEntry) -> Result<(), StoreError>;
    async fn neighborhood(&self, subject_id: &str)
    -> Result<Option<NeighborhoodEntry>, StoreError>;

    async fn closed_unsummarized_episodes(&self, limit: usize)
    -> Result<Vec<Episode>, StoreError>;
    async fn attach_episode_summary(
        &self,
        episode_id: &str,
        summary: &MemoryItem,
    ) -> Result<(), StoreError>;

    async fn entities_missing_concept_links(
        &self,
        limit: usize,
    ) -> Result<Vec<EntityId>, StoreError>;
    async fn put_concept_links(
        &self,
        entity_id: &str,
        links: &[ConceptLink],
    ) -> Result<(), StoreError>;

    /// Size-bound cleanup: evicts oldest non-stale neighborhood entries over
    /// `max_entries`. Returns the number evicted.
    async fn evict_neighborhoods_over(&self, max_entries: usize) -> Result<usize, StoreError>;

    async fn maintenance_backlog(&self) -> Result<MaintenanceBacklogGauge, StoreError>;
}
