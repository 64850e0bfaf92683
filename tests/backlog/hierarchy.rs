use cardia::backlog::{BacklogErrorKind, Goal, GoalBacklog, GoalPriority, GoalSource};

use super::{child_goal, new_goal, ts};

#[test]
fn given_reparent_to_own_descendant_then_cycle_rejected() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("a", GoalSource::Curiosity), ts(0))
        .expect("goal should create");
    backlog
        .create(child_goal("b", "a", GoalSource::Derived), ts(1))
        .expect("goal should create");
    backlog
        .create(child_goal("c", "b", GoalSource::Derived), ts(2))
        .expect("goal should create");

    let err = backlog
        .reparent("a", Some("c".to_string()), ts(3))
        .expect_err("a -> c would close a cycle");
    assert_eq!(err.kind, BacklogErrorKind::InvalidRequest);

    // The arena is untouched by the refused reparent.
    backlog.assert_invariants().expect("invariants should hold");
    assert_eq!(backlog.get("a").expect("goal exists").parent_id, None);
}

#[test]
fn given_reparent_to_self_then_rejected() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("a", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    let err = backlog
        .reparent("a", Some("a".to_string()), ts(1))
        .expect_err("self-parenting must fail");
    assert_eq!(err.kind, BacklogErrorKind::InvalidRequest);
}

#[test]
fn given_valid_reparent_then_parent_updates() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("a", GoalSource::Curiosity), ts(0))
        .expect("goal should create");
    backlog
        .create(new_goal("b", GoalSource::Curiosity), ts(1))
        .expect("goal should create");

    backlog
        .reparent("b", Some("a".to_string()), ts(2))
        .expect("reparent should apply");
    assert_eq!(
        backlog.get("b").expect("goal exists").parent_id.as_deref(),
        Some("a")
    );
}

#[test]
fn given_persisted_parent_cycle_when_rehydrated_then_rejected() {
    let cyclic = |id: &str, parent: &str| Goal {
        id: id.to_string(),
        title: format!("goal-{id}"),
        description: String::new(),
        priority: GoalPriority::Queued,
        source: GoalSource::Curiosity,
        parent_id: Some(parent.to_string()),
        progress: Vec::new(),
        blocked_by: None,
        emotional_valence: 0.0,
        created_at: ts(0),
        last_touched: ts(0),
        completed_at: None,
        abandoned_at: None,
        abandonment_reason: None,
    };

    let err = GoalBacklog::from_goals(vec![cyclic("a", "b"), cyclic("b", "a")])
        .expect_err("cyclic snapshot must be rejected");
    assert_eq!(err.kind, BacklogErrorKind::InvariantViolation);
}

#[test]
fn given_unknown_parent_in_snapshot_when_rehydrated_then_rejected() {
    let orphan = Goal {
        id: "a".to_string(),
        title: "goal-a".to_string(),
        description: String::new(),
        priority: GoalPriority::Queued,
        source: GoalSource::Curiosity,
        parent_id: Some("ghost".to_string()),
        progress: Vec::new(),
        blocked_by: None,
        emotional_valence: 0.0,
        created_at: ts(0),
        last_touched: ts(0),
        completed_at: None,
        abandoned_at: None,
        abandonment_reason: None,
    };

    let err = GoalBacklog::from_goals(vec![orphan])
        .expect_err("dangling parent must be rejected");
    assert_eq!(err.kind, BacklogErrorKind::InvariantViolation);
}
