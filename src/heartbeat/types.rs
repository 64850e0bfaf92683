use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{actions::types::ActionOutcome, backlog::types::GoalChangeRequest};

pub type CycleId = u64;

/// What the world looked like when the cycle started. Captured during
/// Observe, free of any oracle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub session_active: bool,
    #[serde(default)]
    pub seconds_since_user_contact: Option<i64>,
    #[serde(default)]
    pub pending_events: Vec<String>,
}

/// Append-only trace of one full heartbeat cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    pub number: CycleId,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ended_at: OffsetDateTime,
    pub energy_start: f64,
    pub energy_end: f64,
    pub environment: EnvironmentSnapshot,
    pub decision_reasoning: String,
    pub actions: Vec<ActionOutcome>,
    pub goals_modified: Vec<GoalChangeRequest>,
    pub narrative: String,
    #[serde(default)]
    pub narrative_memory_id: Option<String>,
    pub emotional_valence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The cycle ran to Record and its trace was appended.
    Completed { record: HeartbeatRecord },
    /// The oracle was unreachable or timed out: no Act phase, no narrative,
    /// no record. Regenerated energy carries to the next cycle.
    Skipped { reason: String },
}
