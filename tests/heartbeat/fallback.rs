use std::sync::Arc;

use async_trait::async_trait;
use cardia::{
    actions::{ActionKind, ExecutorRegistry},
    heartbeat::{CycleOutcome, HeartbeatConfig, HeartbeatScheduler},
    oracle::{
        Decision, DecisionOraclePort, DecisionRequest, OracleError, ScriptedOracle,
        error::{malformed, refusal, timeout, unavailable},
    },
    store::{InMemoryStore, ports::SchedulerStore},
};
use tokio::time::Duration;

use super::{scheduler_with_budget, ts};

fn executed_kinds(outcome: &CycleOutcome) -> Vec<ActionKind> {
    match outcome {
        CycleOutcome::Completed { record } => {
            record.actions.iter().map(|outcome| outcome.kind).collect()
        }
        CycleOutcome::Skipped { reason } => panic!("cycle unexpectedly skipped: {reason}"),
    }
}

#[tokio::test]
async fn given_malformed_oracle_output_then_fallback_reflect_and_rest() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Err(malformed("not valid json")));
    let store = Arc::new(InMemoryStore::new());
    let mut scheduler = scheduler_with_budget(oracle, store, 10.0);

    let outcome = scheduler
        .run_cycle(ts(0), false)
        .await
        .expect("cycle should run");

    assert_eq!(
        executed_kinds(&outcome),
        vec![ActionKind::Reflect, ActionKind::Rest]
    );
    match outcome {
        CycleOutcome::Completed { record } => {
            assert_eq!(record.decision_reasoning, "fallback");
            assert!(record.goals_modified.is_empty());
        }
        CycleOutcome::Skipped { .. } => unreachable!(),
    }
}

#[tokio::test]
async fn given_oracle_refusal_then_minimal_observe_and_remember() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Err(refusal("declining this hour")));
    let store = Arc::new(InMemoryStore::new());
    let mut scheduler = scheduler_with_budget(oracle, store, 10.0);

    let outcome = scheduler
        .run_cycle(ts(0), false)
        .await
        .expect("cycle should run");

    assert_eq!(
        executed_kinds(&outcome),
        vec![ActionKind::Observe, ActionKind::Remember]
    );
    match outcome {
        CycleOutcome::Completed { record } => {
            // Both substitutes are free: refusal costs nothing.
            assert_eq!(record.energy_start, record.energy_end);
        }
        CycleOutcome::Skipped { .. } => unreachable!(),
    }
}

#[tokio::test]
async fn given_oracle_unavailable_then_cycle_skipped_without_traces() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Err(unavailable("connection refused")));
    let store = Arc::new(InMemoryStore::new());
    let mut scheduler = scheduler_with_budget(oracle, Arc::clone(&store), 10.0);

    let outcome = scheduler
        .run_cycle(ts(0), false)
        .await
        .expect("cycle should run");

    assert!(matches!(outcome, CycleOutcome::Skipped { .. }));
    assert!(
        store
            .recent_heartbeat_records(10)
            .await
            .expect("records should load")
            .is_empty()
    );
    assert!(
        store
            .recent_memories(10)
            .await
            .expect("memories should load")
            .is_empty()
    );
}

#[tokio::test]
async fn given_oracle_reported_timeout_then_cycle_skipped() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Err(timeout("upstream deadline")));
    let store = Arc::new(InMemoryStore::new());
    let mut scheduler = scheduler_with_budget(oracle, store, 10.0);

    let outcome = scheduler
        .run_cycle(ts(0), false)
        .await
        .expect("cycle should run");
    assert!(matches!(outcome, CycleOutcome::Skipped { .. }));
}

struct StalledOracle;

#[async_trait]
impl DecisionOraclePort for StalledOracle {
    async fn decide(&self, _request: &DecisionRequest) -> Result<Decision, OracleError> {
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(Decision::minimal())
    }
}

#[tokio::test(start_paused = true)]
async fn given_stalled_oracle_then_bounded_deadline_skips_the_cycle() {
    let store = Arc::new(InMemoryStore::new());
    let mut scheduler = HeartbeatScheduler::new(
        Arc::clone(&store) as Arc<dyn SchedulerStore>,
        Arc::new(StalledOracle),
        ExecutorRegistry::with_defaults(),
        HeartbeatConfig {
            energy_max: 10.0,
            energy_base_regen: 0.0,
            recent_memory_window: 10,
            oracle_timeout: Duration::from_millis(50),
        },
    );

    let outcome = scheduler
        .run_cycle(ts(0), false)
        .await
        .expect("cycle should run");

    assert!(matches!(outcome, CycleOutcome::Skipped { .. }));
    assert!(
        store
            .recent_heartbeat_records(10)
            .await
            .expect("records should load")
            .is_empty()
    );
}
