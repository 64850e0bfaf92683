use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type GoalId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPriority {
    Active,
    Queued,
    Backburner,
    Completed,
    Abandoned,
}

impl GoalPriority {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    pub fn is_open(self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSource {
    Curiosity,
    UserRequest,
    Identity,
    Derived,
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressNote {
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    pub priority: GoalPriority,
    pub source: GoalSource,
    #[serde(default)]
    pub parent_id: Option<GoalId>,
    #[serde(default)]
    pub progress: Vec<ProgressNote>,
    #[serde(default)]
    pub blocked_by: Option<String>,
    pub emotional_valence: f32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_touched: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub abandoned_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub abandonment_reason: Option<String>,
}

/// Creation input. Initial priority is derived from `source` by the backlog,
/// never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    pub source: GoalSource,
    #[serde(default)]
    pub parent_id: Option<GoalId>,
    #[serde(default)]
    pub emotional_valence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalChange {
    Create {
        title: String,
        description: String,
        #[serde(default)]
        parent_id: Option<GoalId>,
        #[serde(default)]
        source: Option<GoalSource>,
    },
    Promote,
    Demote,
    Complete {
        #[serde(default)]
        override_children: bool,
    },
    Abandon {
        reason: String,
    },
    LogProgress {
        note: String,
    },
    Block {
        reference: String,
    },
    Unblock,
    Reparent {
        #[serde(default)]
        parent_id: Option<GoalId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalChangeRequest {
    pub goal_id: GoalId,
    pub change: GoalChange,
}
