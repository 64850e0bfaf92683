use serde::{Deserialize, Serialize};

use crate::{
    actions::types::{ActionKind, ActionSpec, ProposedAction},
    backlog::{
        review::ReviewReport,
        types::{Goal, GoalChangeRequest, GoalId, GoalPriority},
    },
    heartbeat::types::EnvironmentSnapshot,
    store::types::MemoryItem,
};

/// Context bundle sent to the Decision Oracle each cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRequest {
    pub cycle: u64,
    pub environment: EnvironmentSnapshot,
    pub goal_review: ReviewReport,
    pub goals: Vec<GoalSummary>,
    pub recent_memories: Vec<MemoryItem>,
    pub active_topics: Vec<String>,
    pub identity_summary: Option<String>,
    pub available_energy: f64,
    pub catalog: Vec<ActionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub id: GoalId,
    pub title: String,
    pub priority: GoalPriority,
    pub blocked: bool,
    pub emotional_valence: f32,
}

impl GoalSummary {
    pub fn of(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            priority: goal.priority,
            blocked: goal.blocked_by.is_some(),
            emotional_valence: goal.emotional_valence,
        }
    }
}

/// The oracle's structured answer: reasoning, a priority-ordered action list,
/// and goal changes to apply through the backlog's transition rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub reasoning: String,
    #[serde(default)]
    pub actions: Vec<ProposedAction>,
    #[serde(default)]
    pub goal_changes: Vec<GoalChangeRequest>,
}

impl Decision {
    /// Substitute for a malformed oracle response.
    pub fn fallback() -> Self {
        Self {
            reasoning: "fallback".to_string(),
            actions: vec![
                ProposedAction::bare(ActionKind::Reflect),
                ProposedAction::bare(ActionKind::Rest),
            ],
            goal_changes: Vec::new(),
        }
    }

    /// Substitute for an oracle refusal. Observe and Remember are free and
    /// already run during the cycle's own phases, so this means "do nothing
    /// extra".
    pub fn minimal() -> Self {
        Self {
            reasoning: "minimal".to_string(),
            actions: vec![
                ProposedAction::bare(ActionKind::Observe),
                ProposedAction::bare(ActionKind::Remember),
            ],
            goal_changes: Vec::new(),
        }
    }
}
