use cardia::backlog::{
    BacklogErrorKind, GoalBacklog, GoalChange, GoalChangeRequest, GoalPriority, GoalSource,
};

use super::{child_goal, new_goal, ts};

#[test]
fn given_user_request_source_when_created_then_active() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::UserRequest), ts(0))
        .expect("goal should create");

    assert_eq!(
        backlog.get("g1").expect("goal exists").priority,
        GoalPriority::Active
    );
}

#[test]
fn given_curiosity_source_when_created_then_queued() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    assert_eq!(
        backlog.get("g1").expect("goal exists").priority,
        GoalPriority::Queued
    );
}

#[test]
fn given_derived_source_when_created_then_inherits_parent_priority() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("parent", GoalSource::UserRequest), ts(0))
        .expect("parent should create");
    backlog
        .create(child_goal("child", "parent", GoalSource::Derived), ts(1))
        .expect("child should create");

    assert_eq!(
        backlog.get("child").expect("child exists").priority,
        GoalPriority::Active
    );
}

#[test]
fn given_derived_source_without_parent_when_created_then_rejected() {
    let mut backlog = GoalBacklog::new();
    let err = backlog
        .create(new_goal("child", GoalSource::Derived), ts(0))
        .expect_err("derived goal requires parent");
    assert_eq!(err.kind, BacklogErrorKind::InvalidRequest);
}

#[test]
fn given_queued_goal_when_promoted_then_active() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    backlog
        .apply_change(
            &GoalChangeRequest {
                goal_id: "g1".to_string(),
                change: GoalChange::Promote,
            },
            ts(1),
        )
        .expect("promotion should apply");

    assert_eq!(
        backlog.get("g1").expect("goal exists").priority,
        GoalPriority::Active
    );
}

#[test]
fn given_backburner_goal_when_promoted_then_only_one_tier_up() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");
    backlog
        .transition("g1", GoalPriority::Backburner, ts(1), None, false)
        .expect("demotion to backburner should apply");

    backlog
        .apply_change(
            &GoalChangeRequest {
                goal_id: "g1".to_string(),
                change: GoalChange::Promote,
            },
            ts(2),
        )
        .expect("promotion should apply");

    assert_eq!(
        backlog.get("g1").expect("goal exists").priority,
        GoalPriority::Queued
    );
}

#[test]
fn given_backburner_goal_when_moved_directly_to_active_then_rejected() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");
    backlog
        .transition("g1", GoalPriority::Backburner, ts(1), None, false)
        .expect("demotion should apply");

    let err = backlog
        .transition("g1", GoalPriority::Active, ts(2), None, false)
        .expect_err("skipping the queued tier must fail");
    assert_eq!(err.kind, BacklogErrorKind::InvalidTransition);
}

#[test]
fn given_abandon_without_reason_then_rejected() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    let err = backlog
        .transition("g1", GoalPriority::Abandoned, ts(1), None, false)
        .expect_err("abandonment requires a reason");
    assert_eq!(err.kind, BacklogErrorKind::InvalidTransition);

    backlog
        .transition("g1", GoalPriority::Abandoned, ts(1), Some("superseded"), false)
        .expect("abandonment with reason should apply");
    let goal = backlog.get("g1").expect("goal exists");
    assert_eq!(goal.priority, GoalPriority::Abandoned);
    assert_eq!(goal.abandonment_reason.as_deref(), Some("superseded"));
    assert!(goal.abandoned_at.is_some());
}

#[test]
fn given_terminal_goal_when_promoted_then_rejected() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");
    backlog
        .transition("g1", GoalPriority::Completed, ts(1), None, false)
        .expect("completion should apply");

    let err = backlog
        .apply_change(
            &GoalChangeRequest {
                goal_id: "g1".to_string(),
                change: GoalChange::Promote,
            },
            ts(2),
        )
        .expect_err("terminal goals cannot move");
    assert_eq!(err.kind, BacklogErrorKind::InvalidTransition);
}

#[test]
fn given_parent_with_incomplete_children_when_completed_then_rejected() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("parent", GoalSource::UserRequest), ts(0))
        .expect("parent should create");
    backlog
        .create(child_goal("child", "parent", GoalSource::Derived), ts(1))
        .expect("child should create");

    let err = backlog
        .transition("parent", GoalPriority::Completed, ts(2), None, false)
        .expect_err("incomplete child must block completion");
    assert_eq!(err.kind, BacklogErrorKind::InvalidTransition);

    // Manual override completes the parent regardless.
    backlog
        .transition("parent", GoalPriority::Completed, ts(3), None, true)
        .expect("override should complete the parent");
}

#[test]
fn given_parent_with_completed_children_when_completed_then_applies() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("parent", GoalSource::UserRequest), ts(0))
        .expect("parent should create");
    backlog
        .create(child_goal("child", "parent", GoalSource::Derived), ts(1))
        .expect("child should create");
    backlog
        .transition("child", GoalPriority::Completed, ts(2), None, false)
        .expect("child completion should apply");

    backlog
        .transition("parent", GoalPriority::Completed, ts(3), None, false)
        .expect("parent completion should apply");
    assert!(backlog.get("parent").expect("parent exists").completed_at.is_some());
}

#[test]
fn given_progress_logged_then_last_touched_advances() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    backlog
        .apply_change(
            &GoalChangeRequest {
                goal_id: "g1".to_string(),
                change: GoalChange::LogProgress {
                    note: "made headway".to_string(),
                },
            },
            ts(500),
        )
        .expect("progress should log");

    let goal = backlog.get("g1").expect("goal exists");
    assert_eq!(goal.progress.len(), 1);
    assert_eq!(goal.last_touched, ts(500));
}

#[test]
fn given_create_change_when_applied_then_goal_exists_with_default_source() {
    let mut backlog = GoalBacklog::new();
    backlog
        .apply_change(
            &GoalChangeRequest {
                goal_id: "g-new".to_string(),
                change: GoalChange::Create {
                    title: "learn lutherie".to_string(),
                    description: "curiosity branch".to_string(),
                    parent_id: None,
                    source: None,
                },
            },
            ts(0),
        )
        .expect("create change should apply");

    let goal = backlog.get("g-new").expect("goal exists");
    assert_eq!(goal.source, GoalSource::Curiosity);
    assert_eq!(goal.priority, GoalPriority::Queued);
}
