mod fallback;

use std::sync::Arc;

use cardia::{
    actions::ExecutorRegistry,
    heartbeat::{HeartbeatConfig, HeartbeatScheduler},
    oracle::ScriptedOracle,
    store::InMemoryStore,
};
use time::OffsetDateTime;
use tokio::time::Duration;

pub fn ts(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(secs).expect("valid timestamp")
}

/// Scheduler over a fresh in-memory store: no persisted snapshot, so the
/// first cycle starts at full energy `max` (base_regen 0 keeps arithmetic
/// exact).
pub fn scheduler_with_budget(
    oracle: Arc<ScriptedOracle>,
    store: Arc<InMemoryStore>,
    max: f64,
) -> HeartbeatScheduler {
    scheduler_with_energy(oracle, store, max, 0.0)
}

pub fn scheduler_with_energy(
    oracle: Arc<ScriptedOracle>,
    store: Arc<InMemoryStore>,
    max: f64,
    base_regen: f64,
) -> HeartbeatScheduler {
    HeartbeatScheduler::new(
        store,
        oracle,
        ExecutorRegistry::with_defaults(),
        HeartbeatConfig {
            energy_max: max,
            energy_base_regen: base_regen,
            recent_memory_window: 10,
            oracle_timeout: Duration::from_millis(250),
        },
    )
}
