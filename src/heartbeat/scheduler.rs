use std::sync::Arc;

use time::OffsetDateTime;
use tokio::time::{Duration, timeout};

use crate::{
    actions::{
        catalog::ActionCatalog,
        executor::ExecutorRegistry,
        gate::DecisionGate,
        types::{ActionOutcome, ActionResult},
    },
    backlog::{
        manager::GoalBacklog,
        review::{
            GoalRelevanceProbe, GoalValidityProbe, NoopRelevanceProbe, NoopValidityProbe, review,
        },
        types::GoalChangeRequest,
    },
    energy::{ledger::EnergyLedger, types::EnergyState},
    heartbeat::{
        error::{HeartbeatError, hydration_error},
        types::{CycleOutcome, EnvironmentSnapshot, HeartbeatRecord},
    },
    oracle::{
        error::OracleErrorKind,
        ports::DecisionOraclePort,
        types::{Decision, DecisionRequest, GoalSummary},
    },
    store::{
        ports::SchedulerStore,
        types::{MemoryItem, SchedulerState, derive_memory_id},
    },
};

#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    pub energy_max: f64,
    pub energy_base_regen: f64,
    pub recent_memory_window: usize,
    pub oracle_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            energy_max: 100.0,
            energy_base_regen: 10.0,
            recent_memory_window: 20,
            oracle_timeout: Duration::from_millis(60_000),
        }
    }
}

/// Drives one Observe → Orient → Decide → Gate → Act → Record cycle at a
/// time. Owns the energy ledger and the goal backlog for the process
/// lifetime; both are hydrated from and persisted to the store.
pub struct HeartbeatScheduler {
    store: Arc<dyn SchedulerStore>,
    oracle: Arc<dyn DecisionOraclePort>,
    executors: ExecutorRegistry,
    validity_probe: Box<dyn GoalValidityProbe>,
    relevance_probe: Box<dyn GoalRelevanceProbe>,
    config: HeartbeatConfig,
    backlog: GoalBacklog,
    ledger: EnergyLedger,
    cycle_counter: u64,
    hydrated: bool,
}

impl HeartbeatScheduler {
    pub fn new(
        store: Arc<dyn SchedulerStore>,
        oracle: Arc<dyn DecisionOraclePort>,
        executors: ExecutorRegistry,
        config: HeartbeatConfig,
    ) -> Self {
        let ledger = EnergyLedger::new(EnergyState::full(
            config.energy_max,
            config.energy_base_regen,
        ));
        Self {
            store,
            oracle,
            executors,
            validity_probe: Box::new(NoopValidityProbe),
            relevance_probe: Box::new(NoopRelevanceProbe),
            config,
            backlog: GoalBacklog::new(),
            ledger,
            cycle_counter: 0,
            hydrated: false,
        }
    }

    pub fn with_probes(
        mut self,
        validity_probe: Box<dyn GoalValidityProbe>,
        relevance_probe: Box<dyn GoalRelevanceProbe>,
    ) -> Self {
        self.validity_probe = validity_probe;
        self.relevance_probe = relevance_probe;
        self
    }

    pub fn backlog(&self) -> &GoalBacklog {
        &self.backlog
    }

    pub fn backlog_mut(&mut self) -> &mut GoalBacklog {
        &mut self.backlog
    }

    pub fn available_energy(&self) -> f64 {
        self.ledger.available()
    }

    pub fn cycle_counter(&self) -> u64 {
        self.cycle_counter
    }

    /// Loads the persisted scheduler-state singleton and the goal arena.
    /// Runs once; a missing snapshot means a fresh start at full energy.
    pub async fn hydrate(&mut self) -> Result<(), HeartbeatError> {
        if self.hydrated {
            return Ok(());
        }

        if let Some(state) = self.store.load_scheduler_state().await? {
            let mut energy = state.energy;
            energy.max = self.config.energy_max;
            energy.base_regen = self.config.energy_base_regen;
            self.ledger = EnergyLedger::new(energy);
            self.cycle_counter = state.cycle_counter;
        }

        let goals = self.store.load_goals().await?;
        self.backlog = GoalBacklog::from_goals(goals)
            .map_err(|err| hydration_error(format!("persisted goals are invalid: {err}")))?;

        self.hydrated = true;
        Ok(())
    }

    pub async fn run_cycle(
        &mut self,
        now: OffsetDateTime,
        session_active: bool,
    ) -> Result<CycleOutcome, HeartbeatError> {
        self.hydrate().await?;

        // Initialize
        self.ledger.regenerate();
        self.cycle_counter = self.cycle_counter.saturating_add(1);
        let number = self.cycle_counter;
        let energy_start = self.ledger.available();
        let started_at = now;

        // Observe
        let pending_events = self.store.pending_events().await?;
        let last_contact = self.store.last_user_contact().await?;
        let environment = EnvironmentSnapshot {
            captured_at: now,
            session_active,
            seconds_since_user_contact: last_contact.map(|at| (now - at).whole_seconds()),
            pending_events,
        };

        // Orient
        let goal_review = review(
            &self.backlog,
            now,
            self.validity_probe.as_ref(),
            self.relevance_probe.as_ref(),
        );
        let recent_memories = self
            .store
            .recent_memories(self.config.recent_memory_window)
            .await?;
        let active_topics = self.store.active_topics().await?;
        let identity_summary = self.store.identity_summary().await?;

        // Decide
        let request = DecisionRequest {
            cycle: number,
            environment: environment.clone(),
            goal_review,
            goals: self
                .backlog
                .open_goals()
                .into_iter()
                .map(GoalSummary::of)
                .collect(),
            recent_memories,
            active_topics,
            identity_summary,
            available_energy: self.ledger.available(),
            catalog: ActionCatalog::all(),
        };

        let decision = match timeout(self.config.oracle_timeout, self.oracle.decide(&request)).await
        {
            Ok(Ok(decision)) => decision,
            Ok(Err(err)) => match err.kind {
                OracleErrorKind::Malformed => {
                    tracing::warn!(
                        target: "oracle",
                        cycle = number,
                        error = %err,
                        "oracle_response_malformed_using_fallback"
                    );
                    Decision::fallback()
                }
                OracleErrorKind::Refusal => {
                    tracing::warn!(
                        target: "oracle",
                        cycle = number,
                        error = %err,
                        "oracle_refused_using_minimal"
                    );
                    Decision::minimal()
                }
                OracleErrorKind::Unavailable | OracleErrorKind::Timeout => {
                    return self.skip_cycle(number, err.message).await;
                }
            },
            Err(_elapsed) => {
                return self
                    .skip_cycle(number, "oracle call exceeded the cycle deadline")
                    .await;
            }
        };

        // Gate
        let proposed_count = decision.actions.len();
        let gate = DecisionGate::admit(decision.actions, self.ledger.available());

        // Act
        let mut outcomes: Vec<ActionOutcome> = Vec::new();
        for action in gate.admitted {
            let cost = ActionCatalog::cost(action.kind);
            // Gate and ledger can drift if an executor touches energy out of
            // band; the live re-check keeps the budget authoritative.
            if !self.ledger.try_charge(cost) {
                tracing::warn!(
                    target: "heartbeat",
                    cycle = number,
                    kind = ?action.kind,
                    "budget_exhausted_mid_act"
                );
                break;
            }

            let result = match self.executors.resolve(action.kind) {
                Some(executor) => match executor.execute(&action.params).await {
                    Ok(value) => ActionResult::Completed { value },
                    Err(err) => {
                        tracing::warn!(
                            target: "heartbeat",
                            cycle = number,
                            kind = ?action.kind,
                            error = %err,
                            "action_execution_failed"
                        );
                        ActionResult::Failed {
                            error: err.message,
                        }
                    }
                },
                None => ActionResult::Failed {
                    error: "no executor bound for action kind".to_string(),
                },
            };

            outcomes.push(ActionOutcome {
                kind: action.kind,
                params: action.params,
                cost_charged: cost,
                result,
                timestamp: now,
            });
        }

        let mut goals_modified: Vec<GoalChangeRequest> = Vec::new();
        for change in &decision.goal_changes {
            match self.backlog.apply_change(change, now) {
                Ok(()) => goals_modified.push(change.clone()),
                Err(err) => {
                    tracing::warn!(
                        target: "backlog",
                        cycle = number,
                        goal_id = %change.goal_id,
                        error = %err,
                        "goal_change_dropped"
                    );
                }
            }
        }

        // Record
        let energy_end = self.ledger.available();
        let narrative = build_narrative(number, proposed_count, &outcomes, &goals_modified);
        let narrative_memory_id = derive_memory_id(&serde_json::json!({
            "cycle": number,
            "narrative": narrative,
        }));
        self.store
            .append_memory(&MemoryItem {
                id: narrative_memory_id.clone(),
                content: narrative.clone(),
                topics: vec!["heartbeat".to_string()],
                created_at: now,
            })
            .await?;

        let emotional_valence = self.cycle_valence(&goals_modified);
        let record = HeartbeatRecord {
            number,
            started_at,
            ended_at: now,
            energy_start,
            energy_end,
            environment,
            decision_reasoning: decision.reasoning,
            actions: outcomes,
            goals_modified,
            narrative,
            narrative_memory_id: Some(narrative_memory_id),
            emotional_valence,
        };

        self.store.append_heartbeat_record(&record).await?;
        self.persist().await?;

        tracing::info!(
            target: "heartbeat",
            cycle = number,
            actions = record.actions.len(),
            energy_start,
            energy_end,
            "cycle_completed"
        );

        Ok(CycleOutcome::Completed { record })
    }

    /// Oracle unreachable: no Act, no narrative, no record. The regenerated
    /// energy and the incremented counter still persist, so the gap in the
    /// record log is the skip's only trace.
    async fn skip_cycle(
        &mut self,
        number: u64,
        reason: impl Into<String>,
    ) -> Result<CycleOutcome, HeartbeatError> {
        let reason = reason.into();
        tracing::warn!(
            target: "heartbeat",
            cycle = number,
            reason = %reason,
            "cycle_skipped"
        );
        self.persist().await?;
        Ok(CycleOutcome::Skipped { reason })
    }

    async fn persist(&self) -> Result<(), HeartbeatError> {
        self.store.save_goals(&self.backlog.snapshot()).await?;
        self.store
            .save_scheduler_state(&SchedulerState {
                energy: self.ledger.state().clone(),
                cycle_counter: self.cycle_counter,
            })
            .await?;
        Ok(())
    }

    fn cycle_valence(&self, goals_modified: &[GoalChangeRequest]) -> f32 {
        let valences: Vec<f32> = goals_modified
            .iter()
            .filter_map(|change| self.backlog.get(&change.goal_id))
            .map(|goal| goal.emotional_valence)
            .collect();
        if valences.is_empty() {
            return 0.0;
        }
        valences.iter().sum::<f32>() / valences.len() as f32
    }
}

fn build_narrative(
    number: u64,
    proposed_count: usize,
    outcomes: &[ActionOutcome],
    goals_modified: &[GoalChangeRequest],
) -> String {
    let failed = outcomes
        .iter()
        .filter(|outcome| matches!(outcome.result, ActionResult::Failed { .. }))
        .count();
    let spent: f64 = outcomes.iter().map(|outcome| outcome.cost_charged).sum();
    format!(
        "Cycle {number}: ran {executed} of {proposed_count} proposed actions \
         ({failed} failed), spent {spent:.1} energy, applied {goal_count} goal changes.",
        executed = outcomes.len(),
        goal_count = goals_modified.len(),
    )
}
