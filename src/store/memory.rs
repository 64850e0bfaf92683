use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    backlog::types::Goal,
    fusion::types::{EpisodeTrace, FusionInputs},
    heartbeat::types::HeartbeatRecord,
    store::{
        error::StoreError,
        persistence::StatePersistence,
        ports::{MaintenanceStore, SchedulerStore},
        types::{
            ConceptLink, EntityId, Episode, MaintenanceBacklogGauge, MemoryItem,
            NeighborhoodEntry, SchedulerState,
        },
    },
};

#[derive(Default)]
struct Inner {
    scheduler_state: Option<SchedulerState>,
    goals: Vec<Goal>,
    heartbeat_records: Vec<HeartbeatRecord>,
    memories: Vec<MemoryItem>,
    active_topics: Vec<String>,
    identity_summary: Option<String>,
    pending_events: Vec<String>,
    last_user_contact: Option<OffsetDateTime>,
    edges: BTreeMap<EntityId, BTreeSet<EntityId>>,
    embeddings: BTreeMap<EntityId, Vec<f32>>,
    active_entities: BTreeSet<EntityId>,
    episodes: BTreeMap<String, Episode>,
    neighborhoods: BTreeMap<EntityId, NeighborhoodEntry>,
    concept_links: BTreeMap<EntityId, Vec<ConceptLink>>,
    entities_needing_links: BTreeSet<EntityId>,
}

/// Reference store backing tests and the default binaries. Implements both
/// store surfaces over one mutex-guarded state; the production deployment
/// swaps in a database-backed implementation behind the same traits.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    state_persistence: Option<StatePersistence>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            state_persistence: None,
        }
    }

    /// Persists the scheduler-state singleton through an atomic file snapshot
    /// at `path`, on every save.
    pub fn with_state_path(path: PathBuf) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            state_persistence: Some(StatePersistence::new(path)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ---- seeding / write surface for collaborators and tests ----

    pub fn set_identity_summary(&self, summary: impl Into<String>) {
        self.lock().identity_summary = Some(summary.into());
    }

    pub fn set_active_topics(&self, topics: Vec<String>) {
        self.lock().active_topics = topics;
    }

    pub fn push_pending_event(&self, event: impl Into<String>) {
        self.lock().pending_events.push(event.into());
    }

    pub fn set_last_user_contact(&self, at: OffsetDateTime) {
        self.lock().last_user_contact = Some(at);
    }

    pub fn seed_memory(&self, item: MemoryItem) {
        self.lock().memories.push(item);
    }

    /// Creates an undirected relationship edge and flips both endpoints'
    /// neighborhood entries stale (created lazily on first staleness).
    pub fn add_relationship(&self, a: &str, b: &str, now: OffsetDateTime) {
        let mut inner = self.lock();
        inner
            .edges
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        inner
            .edges
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
        ensure_stale(&mut inner, a, now);
        ensure_stale(&mut inner, b, now);
    }

    /// A new or changed embedding may surface as a high-similarity neighbor
    /// of any cached subject, so every existing entry goes stale.
    pub fn set_embedding(&self, entity_id: &str, embedding: Vec<f32>, now: OffsetDateTime) {
        let mut inner = self.lock();
        inner.embeddings.insert(entity_id.to_string(), embedding);
        for entry in inner.neighborhoods.values_mut() {
            entry.stale = true;
        }
        ensure_stale(&mut inner, entity_id, now);
    }

    pub fn set_active(&self, entity_id: &str, active: bool) {
        let mut inner = self.lock();
        if active {
            inner.active_entities.insert(entity_id.to_string());
        } else {
            inner.active_entities.remove(entity_id);
        }
    }

    /// Records an episode; each member gains a co-occurring entity, so every
    /// member's entry goes stale.
    pub fn add_episode(&self, episode: Episode, now: OffsetDateTime) {
        let mut inner = self.lock();
        let members = episode.member_ids.clone();
        inner.episodes.insert(episode.id.clone(), episode);
        for member in members {
            ensure_stale(&mut inner, &member, now);
        }
    }

    pub fn mark_neighborhood_stale(&self, subject_id: &str, now: OffsetDateTime) {
        let mut inner = self.lock();
        ensure_stale(&mut inner, subject_id, now);
    }

    pub fn mark_entity_needs_links(&self, entity_id: &str) {
        self.lock()
            .entities_needing_links
            .insert(entity_id.to_string());
    }

    pub fn concept_links_for(&self, entity_id: &str) -> Vec<ConceptLink> {
        self.lock()
            .concept_links
            .get(entity_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn episode(&self, episode_id: &str) -> Option<Episode> {
        self.lock().episodes.get(episode_id).cloned()
    }
}

fn ensure_stale(inner: &mut Inner, subject_id: &str, now: OffsetDateTime) {
    inner
        .neighborhoods
        .entry(subject_id.to_string())
        .and_modify(|entry| entry.stale = true)
        .or_insert_with(|| NeighborhoodEntry {
            subject_id: subject_id.to_string(),
            neighbors: BTreeMap::new(),
            computed_at: now,
            stale: true,
        });
}

#[async_trait]
impl SchedulerStore for InMemoryStore {
    async fn load_scheduler_state(&self) -> Result<Option<SchedulerState>, StoreError> {
        {
            let inner = self.lock();
            if inner.scheduler_state.is_some() {
                return Ok(inner.scheduler_state.clone());
            }
        }
        let Some(persistence) = self.state_persistence.as_ref() else {
            return Ok(None);
        };
        let loaded = persistence.load()?;
        if let Some(state) = loaded.as_ref() {
            self.lock().scheduler_state = Some(state.clone());
        }
        Ok(loaded)
    }

    async fn save_scheduler_state(&self, state: &SchedulerState) -> Result<(), StoreError> {
        self.lock().scheduler_state = Some(state.clone());
        if let Some(persistence) = self.state_persistence.as_ref() {
            persistence.save(state)?;
        }
        Ok(())
    }

    async fn load_goals(&self) -> Result<Vec<Goal>, StoreError> {
        Ok(self.lock().goals.clone())
    }

    async fn save_goals(&self, goals: &[Goal]) -> Result<(), StoreError> {
        self.lock().goals = goals.to_vec();
        Ok(())
    }

    async fn append_heartbeat_record(&self, record: &HeartbeatRecord) -> Result<(), StoreError> {
        self.lock().heartbeat_records.push(record.clone());
        Ok(())
    }

    async fn recent_heartbeat_records(
        &self,
        limit: usize,
    ) -> Result<Vec<HeartbeatRecord>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .heartbeat_records
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn append_memory(&self, item: &MemoryItem) -> Result<(), StoreError> {
        self.lock().memories.push(item.clone());
        Ok(())
    }

    async fn recent_memories(&self, limit: usize) -> Result<Vec<MemoryItem>, StoreError> {
        let inner = self.lock();
        Ok(inner.memories.iter().rev().take(limit).cloned().collect())
    }

    async fn active_topics(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock().active_topics.clone())
    }

    async fn identity_summary(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock().identity_summary.clone())
    }

    async fn pending_events(&self) -> Result<Vec<String>, StoreError> {
        Ok(std::mem::take(&mut self.lock().pending_events))
    }

    async fn last_user_contact(&self) -> Result<Option<OffsetDateTime>, StoreError> {
        Ok(self.lock().last_user_contact)
    }
}

#[async_trait]
impl MaintenanceStore for InMemoryStore {
    async fn stale_neighborhood_subjects(
        &self,
        limit: usize,
    ) -> Result<Vec<EntityId>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .neighborhoods
            .values()
            .filter(|entry| entry.stale)
            .take(limit)
            .map(|entry| entry.subject_id.clone())
            .collect())
    }

    async fn fusion_inputs(&self, subject_id: &str) -> Result<FusionInputs, StoreError> {
        let inner = self.lock();
        let edges = inner
            .edges
            .iter()
            .map(|(entity_id, adjacent)| {
                (entity_id.clone(), adjacent.iter().cloned().collect())
            })
            .collect();
        let active_embeddings = inner
            .active_entities
            .iter()
            .filter_map(|entity_id| {
                inner
                    .embeddings
                    .get(entity_id)
                    .map(|embedding| (entity_id.clone(), embedding.clone()))
            })
            .collect();
        let episodes = inner
            .episodes
            .values()
            .filter(|episode| episode.member_ids.iter().any(|member| member == subject_id))
            .map(|episode| EpisodeTrace {
                member_ids: episode.member_ids.clone(),
            })
            .collect();

        Ok(FusionInputs {
            edges,
            subject_embedding: inner.embeddings.get(subject_id).cloned(),
            active_embeddings,
            episodes,
        })
    }

    async fn put_neighborhood(&self, entry: &NeighborhoodEntry) -> Result<(), StoreError> {
        self.lock()
            .neighborhoods
            .insert(entry.subject_id.clone(), entry.clone());
        Ok(())
    }

    async fn neighborhood(
        &self,
        subject_id: &str,
    ) -> Result<Option<NeighborhoodEntry>, StoreError> {
        Ok(self.lock().neighborhoods.get(subject_id).cloned())
    }

    async fn closed_unsummarized_episodes(
        &self,
        limit: usize,
    ) -> Result<Vec<Episode>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .episodes
            .values()
            .filter(|episode| episode.closed && episode.summary_memory_id.is_none())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn attach_episode_summary(
        &self,
        episode_id: &str,
        summary: &MemoryItem,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let episode = inner.episodes.get_mut(episode_id).ok_or_else(|| {
            crate::store::error::not_found(format!("unknown episode '{}'", episode_id))
        })?;
        episode.summary_memory_id = Some(summary.id.clone());
        inner.memories.push(summary.clone());
        Ok(())
    }

    async fn entities_missing_concept_links(
        &self,
        limit: usize,
    ) -> Result<Vec<EntityId>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .entities_needing_links
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn put_concept_links(
        &self,
        entity_id: &str,
        links: &[ConceptLink],
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner
            .concept_links
            .insert(entity_id.to_string(), links.to_vec());
        inner.entities_needing_links.remove(entity_id);
        Ok(())
    }

    async fn evict_neighborhoods_over(&self, max_entries: usize) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        let over = inner.neighborhoods.len().saturating_sub(max_entries);
        if over == 0 {
            return Ok(0);
        }

        let mut evictable: Vec<(EntityId, OffsetDateTime)> = inner
            .neighborhoods
            .values()
            .filter(|entry| !entry.stale)
            .map(|entry| (entry.subject_id.clone(), entry.computed_at))
            .collect();
        evictable.sort_by(|lhs, rhs| lhs.1.cmp(&rhs.1).then_with(|| lhs.0.cmp(&rhs.0)));

        let mut evicted = 0usize;
        for (subject_id, _) in evictable.into_iter().take(over) {
            inner.neighborhoods.remove(&subject_id);
            evicted += 1;
        }
        Ok(evicted)
    }

    async fn maintenance_backlog(&self) -> Result<MaintenanceBacklogGauge, StoreError> {
        let inner = self.lock();
        Ok(MaintenanceBacklogGauge {
            stale_neighborhoods: inner
                .neighborhoods
                .values()
                .filter(|entry| entry.stale)
                .count(),
            unsummarized_episodes: inner
                .episodes
                .values()
                .filter(|episode| episode.closed && episode.summary_memory_id.is_none())
                .count(),
            unlinked_entities: inner.entities_needing_links.len(),
        })
    }
}
