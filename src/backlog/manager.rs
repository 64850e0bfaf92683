use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::backlog::{
    error::{BacklogError, invalid_request, invalid_transition, invariant_violation},
    types::{Goal, GoalChange, GoalChangeRequest, GoalId, GoalPriority, GoalSource, NewGoal},
};

/// Arena of goal records keyed by id. All lifecycle mutation goes through the
/// transition rules here; the per-cycle review routine only reads.
#[derive(Debug, Clone, Default)]
pub struct GoalBacklog {
    goals: BTreeMap<GoalId, Goal>,
}

impl GoalBacklog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates from a persisted snapshot, re-checking the arena invariants
    /// so a corrupt store cannot smuggle in a parent cycle.
    pub fn from_goals(goals: Vec<Goal>) -> Result<Self, BacklogError> {
        let mut backlog = Self::new();
        for goal in goals {
            if backlog.goals.contains_key(&goal.id) {
                return Err(invalid_request(format!("duplicate goal id '{}'", goal.id)));
            }
            backlog.goals.insert(goal.id.clone(), goal);
        }
        backlog.assert_invariants()?;
        Ok(backlog)
    }

    pub fn get(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.get(goal_id)
    }

    pub fn snapshot(&self) -> Vec<Goal> {
        self.goals.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn goals_with_priority(&self, priority: GoalPriority) -> Vec<&Goal> {
        self.goals
            .values()
            .filter(|goal| goal.priority == priority)
            .collect()
    }

    pub fn open_goals(&self) -> Vec<&Goal> {
        self.goals
            .values()
            .filter(|goal| goal.priority.is_open())
            .collect()
    }

    pub fn children_of(&self, goal_id: &str) -> Vec<&Goal> {
        self.goals
            .values()
            .filter(|goal| goal.parent_id.as_deref() == Some(goal_id))
            .collect()
    }

    pub fn create(&mut self, new_goal: NewGoal, now: OffsetDateTime) -> Result<GoalId, BacklogError> {
        if self.goals.contains_key(&new_goal.id) {
            return Err(invalid_request(format!(
                "duplicate goal id '{}'",
                new_goal.id
            )));
        }

        if let Some(parent_id) = new_goal.parent_id.as_ref() {
            if !self.goals.contains_key(parent_id) {
                return Err(invalid_request(format!(
                    "goal '{}' references unknown parent '{}'",
                    new_goal.id, parent_id
                )));
            }
        }

        let priority = match new_goal.source {
            GoalSource::UserRequest => GoalPriority::Active,
            GoalSource::Derived => {
                let parent_id = new_goal.parent_id.as_ref().ok_or_else(|| {
                    invalid_request(format!(
                        "derived goal '{}' requires parent_id",
                        new_goal.id
                    ))
                })?;
                let parent = self
                    .goals
                    .get(parent_id)
                    .ok_or_else(|| invariant_violation("parent disappeared during create"))?;
                if parent.priority.is_open() {
                    parent.priority
                } else {
                    GoalPriority::Queued
                }
            }
            GoalSource::Curiosity | GoalSource::Identity | GoalSource::External => {
                GoalPriority::Queued
            }
        };

        let goal = Goal {
            id: new_goal.id.clone(),
            title: new_goal.title,
            description: new_goal.description,
            priority,
            source: new_goal.source,
            parent_id: new_goal.parent_id,
            progress: Vec::new(),
            blocked_by: None,
            emotional_valence: new_goal.emotional_valence.clamp(-1.0, 1.0),
            created_at: now,
            last_touched: now,
            completed_at: None,
            abandoned_at: None,
            abandonment_reason: None,
        };

        self.goals.insert(new_goal.id.clone(), goal);
        Ok(new_goal.id)
    }

    /// Moves a goal to `to` if the transition set allows it. Adjacent moves
    /// only between the open tiers (`backburner <-> queued <-> active`);
    /// any open tier may terminate to completed or abandoned.
    pub fn transition(
        &mut self,
        goal_id: &str,
        to: GoalPriority,
        now: OffsetDateTime,
        reason: Option<&str>,
        override_children: bool,
    ) -> Result<(), BacklogError> {
        let from = self
            .goals
            .get(goal_id)
            .ok_or_else(|| invalid_request(format!("unknown goal '{}'", goal_id)))?
            .priority;

        if !transition_allowed(from, to) {
            return Err(invalid_transition(format!(
                "goal '{}' cannot move {:?} -> {:?}",
                goal_id, from, to
            )));
        }

        if to == GoalPriority::Completed && !override_children {
            let incomplete: Vec<&str> = self
                .children_of(goal_id)
                .into_iter()
                .filter(|child| child.priority != GoalPriority::Completed)
                .map(|child| child.id.as_str())
                .collect();
            if !incomplete.is_empty() {
                return Err(invalid_transition(format!(
                    "goal '{}' has incomplete children: {}",
                    goal_id,
                    incomplete.join(", ")
                )));
            }
        }

        if to == GoalPriority::Abandoned && reason.map(str::trim).unwrap_or("").is_empty() {
            return Err(invalid_transition(format!(
                "abandoning goal '{}' requires a reason",
                goal_id
            )));
        }

        let goal = self
            .goals
            .get_mut(goal_id)
            .ok_or_else(|| invariant_violation("goal disappeared during transition"))?;
        goal.priority = to;
        goal.last_touched = now;
        match to {
            GoalPriority::Completed => goal.completed_at = Some(now),
            GoalPriority::Abandoned => {
                goal.abandoned_at = Some(now);
                goal.abandonment_reason = reason.map(|text| text.trim().to_string());
            }
            _ => {}
        }
        Ok(())
    }

    pub fn log_progress(
        &mut self,
        goal_id: &str,
        note: impl Into<String>,
        now: OffsetDateTime,
    ) -> Result<(), BacklogError> {
        let goal = self
            .goals
            .get_mut(goal_id)
            .ok_or_else(|| invalid_request(format!("unknown goal '{}'", goal_id)))?;
        if goal.priority.is_terminal() {
            return Err(invalid_transition(format!(
                "cannot log progress on terminal goal '{}'",
                goal_id
            )));
        }
        goal.progress.push(crate::backlog::types::ProgressNote {
            at: now,
            note: note.into(),
        });
        goal.last_touched = now;
        Ok(())
    }

    pub fn set_blocked(
        &mut self,
        goal_id: &str,
        reference: Option<String>,
        now: OffsetDateTime,
    ) -> Result<(), BacklogError> {
        let goal = self
            .goals
            .get_mut(goal_id)
            .ok_or_else(|| invalid_request(format!("unknown goal '{}'", goal_id)))?;
        goal.blocked_by = reference;
        goal.last_touched = now;
        Ok(())
    }

    /// Re-points `goal_id` at `new_parent`, walking the candidate ancestor
    /// chain first so the parent graph stays acyclic.
    pub fn reparent(
        &mut self,
        goal_id: &str,
        new_parent: Option<GoalId>,
        now: OffsetDateTime,
    ) -> Result<(), BacklogError> {
        if !self.goals.contains_key(goal_id) {
            return Err(invalid_request(format!("unknown goal '{}'", goal_id)));
        }

        if let Some(parent_id) = new_parent.as_ref() {
            if parent_id == goal_id {
                return Err(invalid_request(format!(
                    "goal '{}' cannot parent itself",
                    goal_id
                )));
            }
            if !self.goals.contains_key(parent_id) {
                return Err(invalid_request(format!(
                    "unknown parent goal '{}'",
                    parent_id
                )));
            }
            if self.ancestor_chain_contains(parent_id, goal_id) {
                return Err(invalid_request(format!(
                    "reparenting '{}' under '{}' would create a cycle",
                    goal_id, parent_id
                )));
            }
        }

        let goal = self
            .goals
            .get_mut(goal_id)
            .ok_or_else(|| invariant_violation("goal disappeared during reparent"))?;
        goal.parent_id = new_parent;
        goal.last_touched = now;
        Ok(())
    }

    /// Applies one oracle-issued change through the transition rules. The
    /// caller drops and logs the error for an invalid change and continues
    /// with the rest of the batch.
    pub fn apply_change(
        &mut self,
        request: &GoalChangeRequest,
        now: OffsetDateTime,
    ) -> Result<(), BacklogError> {
        match &request.change {
            GoalChange::Create {
                title,
                description,
                parent_id,
                source,
            } => {
                self.create(
                    NewGoal {
                        id: request.goal_id.clone(),
                        title: title.clone(),
                        description: description.clone(),
                        source: source.unwrap_or(GoalSource::Curiosity),
                        parent_id: parent_id.clone(),
                        emotional_valence: 0.0,
                    },
                    now,
                )?;
                Ok(())
            }
            GoalChange::Promote => {
                let target = match self.priority_of(&request.goal_id)? {
                    GoalPriority::Backburner => GoalPriority::Queued,
                    GoalPriority::Queued => GoalPriority::Active,
                    other => {
                        return Err(invalid_transition(format!(
                            "goal '{}' cannot be promoted from {:?}",
                            request.goal_id, other
                        )));
                    }
                };
                self.transition(&request.goal_id, target, now, None, false)
            }
            GoalChange::Demote => {
                let target = match self.priority_of(&request.goal_id)? {
                    GoalPriority::Active => GoalPriority::Queued,
                    GoalPriority::Queued => GoalPriority::Backburner,
                    other => {
                        return Err(invalid_transition(format!(
                            "goal '{}' cannot be demoted from {:?}",
                            request.goal_id, other
                        )));
                    }
                };
                self.transition(&request.goal_id, target, now, None, false)
            }
            GoalChange::Complete { override_children } => self.transition(
                &request.goal_id,
                GoalPriority::Completed,
                now,
                None,
                *override_children,
            ),
            GoalChange::Abandon { reason } => self.transition(
                &request.goal_id,
                GoalPriority::Abandoned,
                now,
                Some(reason),
                false,
            ),
            GoalChange::LogProgress { note } => {
                self.log_progress(&request.goal_id, note.clone(), now)
            }
            GoalChange::Block { reference } => {
                self.set_blocked(&request.goal_id, Some(reference.clone()), now)
            }
            GoalChange::Unblock => self.set_blocked(&request.goal_id, None, now),
            GoalChange::Reparent { parent_id } => {
                self.reparent(&request.goal_id, parent_id.clone(), now)
            }
        }
    }

    pub fn assert_invariants(&self) -> Result<(), BacklogError> {
        for (goal_id, goal) in &self.goals {
            if let Some(parent_id) = goal.parent_id.as_ref() {
                if !self.goals.contains_key(parent_id) {
                    return Err(invariant_violation(format!(
                        "goal '{}' parent '{}' does not exist",
                        goal_id, parent_id
                    )));
                }
                if self.ancestor_chain_contains(parent_id, goal_id) {
                    return Err(invariant_violation(format!(
                        "goal '{}' participates in a parent cycle",
                        goal_id
                    )));
                }
            }

            if goal.priority == GoalPriority::Abandoned && goal.abandonment_reason.is_none() {
                return Err(invariant_violation(format!(
                    "goal '{}' is abandoned without a reason",
                    goal_id
                )));
            }
        }
        Ok(())
    }

    fn priority_of(&self, goal_id: &str) -> Result<GoalPriority, BacklogError> {
        self.goals
            .get(goal_id)
            .map(|goal| goal.priority)
            .ok_or_else(|| invalid_request(format!("unknown goal '{}'", goal_id)))
    }

    fn ancestor_chain_contains(&self, start: &str, needle: &str) -> bool {
        let mut current = Some(start.to_string());
        let mut hops = 0usize;
        while let Some(goal_id) = current {
            if goal_id == needle {
                return true;
            }
            hops += 1;
            if hops > self.goals.len() {
                return true;
            }
            current = self
                .goals
                .get(&goal_id)
                .and_then(|goal| goal.parent_id.clone());
        }
        false
    }
}

fn transition_allowed(from: GoalPriority, to: GoalPriority) -> bool {
    use GoalPriority::*;
    matches!(
        (from, to),
        (Backburner, Queued)
            | (Queued, Backburner)
            | (Queued, Active)
            | (Active, Queued)
            | (Active, Completed)
            | (Queued, Completed)
            | (Backburner, Completed)
            | (Active, Abandoned)
            | (Queued, Abandoned)
            | (Backburner, Abandoned)
    )
}
