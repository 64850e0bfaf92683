use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::backlog::{
    manager::GoalBacklog,
    types::{Goal, GoalId, GoalPriority},
};

pub const STALE_AFTER: Duration = Duration::days(7);

/// External validity check for active goals. A contradicted goal is flagged
/// for the oracle; the review itself never touches priority.
pub trait GoalValidityProbe: Send + Sync {
    fn contradicted(&self, goal: &Goal) -> bool;
}

/// External relevance signal for queued goals.
pub trait GoalRelevanceProbe: Send + Sync {
    fn relevance_increased(&self, goal: &Goal) -> bool;
}

pub struct NoopValidityProbe;

impl GoalValidityProbe for NoopValidityProbe {
    fn contradicted(&self, _goal: &Goal) -> bool {
        false
    }
}

pub struct NoopRelevanceProbe;

impl GoalRelevanceProbe for NoopRelevanceProbe {
    fn relevance_increased(&self, _goal: &Goal) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalFlag {
    Blocked { goal_id: GoalId, reference: String },
    Stale { goal_id: GoalId, idle_days: i64 },
    ContradictionCandidate { goal_id: GoalId },
    PromotionCandidate { goal_id: GoalId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSuggestion {
    PromoteFromQueue,
    BrainstormNeeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReviewReport {
    pub flags: Vec<GoalFlag>,
    pub suggestions: Vec<ReviewSuggestion>,
}

/// Per-cycle review, run during Orient. Free of budget cost, and strictly
/// read-only over the backlog: it flags, the oracle decides.
pub fn review(
    backlog: &GoalBacklog,
    now: OffsetDateTime,
    validity: &dyn GoalValidityProbe,
    relevance: &dyn GoalRelevanceProbe,
) -> ReviewReport {
    let mut report = ReviewReport::default();

    for goal in backlog.goals_with_priority(GoalPriority::Active) {
        if let Some(reference) = goal.blocked_by.as_ref() {
            report.flags.push(GoalFlag::Blocked {
                goal_id: goal.id.clone(),
                reference: reference.clone(),
            });
        }
        let idle = now - goal.last_touched;
        if idle > STALE_AFTER {
            report.flags.push(GoalFlag::Stale {
                goal_id: goal.id.clone(),
                idle_days: idle.whole_days(),
            });
        }
        if validity.contradicted(goal) {
            report.flags.push(GoalFlag::ContradictionCandidate {
                goal_id: goal.id.clone(),
            });
        }
    }

    for goal in backlog.goals_with_priority(GoalPriority::Queued) {
        if relevance.relevance_increased(goal) {
            report.flags.push(GoalFlag::PromotionCandidate {
                goal_id: goal.id.clone(),
            });
        }
    }

    if backlog.is_empty() {
        report.suggestions.push(ReviewSuggestion::BrainstormNeeded);
    } else if backlog.goals_with_priority(GoalPriority::Active).is_empty() {
        report.suggestions.push(ReviewSuggestion::PromoteFromQueue);
    }

    report
}
