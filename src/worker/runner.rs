use std::sync::Arc;

use time::OffsetDateTime;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    fusion::engine::NeighborhoodFusionEngine,
    store::{
        ports::MaintenanceStore,
        types::{MaintenanceBacklogGauge, MemoryItem, derive_memory_id},
    },
    worker::{
        error::WorkerError,
        ports::{ConceptLinkExtractorPort, EpisodeSummarizerPort},
    },
};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub cycle_interval: Duration,
    pub error_backoff: Duration,
    pub neighborhood_batch: usize,
    pub episode_summary_batch: usize,
    pub concept_link_batch: usize,
    pub cleanup_interval: time::Duration,
    pub cache_max_entries: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_secs(30),
            error_backoff: Duration::from_secs(60),
            neighborhood_batch: 50,
            episode_summary_batch: 5,
            concept_link_batch: 10,
            cleanup_interval: time::Duration::hours(1),
            cache_max_entries: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerCycleReport {
    pub neighborhoods_refreshed: usize,
    pub neighborhoods_failed: usize,
    pub episodes_summarized: usize,
    pub episodes_failed: usize,
    pub entities_linked: usize,
    pub entities_failed: usize,
    pub cleanup_evicted: usize,
    pub backlog: MaintenanceBacklogGauge,
}

/// The maintenance loop. No decision-making authority: it sees only the
/// maintenance store surface, so goals, energy, and the oracle are out of
/// reach by construction. A failed item is logged and skipped; a failed
/// cycle backs off; the loop itself never terminates on a transient error.
pub struct MaintenanceWorker {
    store: Arc<dyn MaintenanceStore>,
    summarizer: Arc<dyn EpisodeSummarizerPort>,
    extractor: Arc<dyn ConceptLinkExtractorPort>,
    config: WorkerConfig,
    last_cleanup: Option<OffsetDateTime>,
}

impl MaintenanceWorker {
    pub fn new(
        store: Arc<dyn MaintenanceStore>,
        summarizer: Arc<dyn EpisodeSummarizerPort>,
        extractor: Arc<dyn ConceptLinkExtractorPort>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            store,
            summarizer,
            extractor,
            config,
            last_cleanup: None,
        }
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            let sleep_for = match self.run_once(OffsetDateTime::now_utc()).await {
                Ok(report) => {
                    tracing::info!(
                        target: "worker",
                        refreshed = report.neighborhoods_refreshed,
                        summarized = report.episodes_summarized,
                        linked = report.entities_linked,
                        evicted = report.cleanup_evicted,
                        stale_backlog = report.backlog.stale_neighborhoods,
                        episode_backlog = report.backlog.unsummarized_episodes,
                        unlinked_backlog = report.backlog.unlinked_entities,
                        "maintenance_cycle_completed"
                    );
                    self.config.cycle_interval
                }
                Err(err) => {
                    tracing::warn!(
                        target: "worker",
                        error = %err,
                        "maintenance_cycle_failed_backing_off"
                    );
                    self.config.error_backoff
                }
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(sleep_for) => {}
            }
        }
    }

    pub async fn run_once(&mut self, now: OffsetDateTime) -> Result<WorkerCycleReport, WorkerError> {
        let mut report = WorkerCycleReport::default();

        let subjects = self
            .store
            .stale_neighborhood_subjects(self.config.neighborhood_batch)
            .await?;
        for subject_id in subjects {
            match self.refresh_neighborhood(&subject_id, now).await {
                Ok(()) => report.neighborhoods_refreshed += 1,
                Err(err) => {
                    report.neighborhoods_failed += 1;
                    tracing::warn!(
                        target: "worker",
                        subject = %subject_id,
                        error = %err,
                        "neighborhood_refresh_failed"
                    );
                }
            }
        }

        let episodes = self
            .store
            .closed_unsummarized_episodes(self.config.episode_summary_batch)
            .await?;
        for episode in episodes {
            match self.summarize_episode(&episode, now).await {
                Ok(()) => report.episodes_summarized += 1,
                Err(err) => {
                    report.episodes_failed += 1;
                    tracing::warn!(
                        target: "worker",
                        episode = %episode.id,
                        error = %err,
                        "episode_summary_failed"
                    );
                }
            }
        }

        let entities = self
            .store
            .entities_missing_concept_links(self.config.concept_link_batch)
            .await?;
        for entity_id in entities {
            match self.link_concepts(&entity_id).await {
                Ok(()) => report.entities_linked += 1,
                Err(err) => {
                    report.entities_failed += 1;
                    tracing::warn!(
                        target: "worker",
                        entity = %entity_id,
                        error = %err,
                        "concept_link_extraction_failed"
                    );
                }
            }
        }

        if self.cleanup_due(now) {
            report.cleanup_evicted = self
                .store
                .evict_neighborhoods_over(self.config.cache_max_entries)
                .await?;
            self.last_cleanup = Some(now);
        }

        report.backlog = self.store.maintenance_backlog().await?;
        Ok(report)
    }

    async fn refresh_neighborhood(
        &self,
        subject_id: &str,
        now: OffsetDateTime,
    ) -> Result<(), WorkerError> {
        let inputs = self.store.fusion_inputs(subject_id).await?;
        let entry = NeighborhoodFusionEngine::recompute(subject_id, &inputs, now);
        self.store.put_neighborhood(&entry).await?;
        Ok(())
    }

    async fn summarize_episode(
        &self,
        episode: &crate::store::types::Episode,
        now: OffsetDateTime,
    ) -> Result<(), WorkerError> {
        let summary = self.summarizer.summarize(episode).await?;
        let memory = MemoryItem {
            id: derive_memory_id(&serde_json::json!({
                "episode": episode.id,
                "summary": summary,
            })),
            content: summary,
            topics: vec!["episode-summary".to_string()],
            created_at: now,
        };
        self.store
            .attach_episode_summary(&episode.id, &memory)
            .await?;
        Ok(())
    }

    async fn link_concepts(&self, entity_id: &str) -> Result<(), WorkerError> {
        let links = self.extractor.extract(entity_id).await?;
        self.store.put_concept_links(entity_id, &links).await?;
        Ok(())
    }

    fn cleanup_due(&self, now: OffsetDateTime) -> bool {
        match self.last_cleanup {
            Some(last) => now - last >= self.config.cleanup_interval,
            None => true,
        }
    }
}
