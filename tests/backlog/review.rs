use cardia::backlog::{
    Goal, GoalBacklog, GoalChange, GoalChangeRequest, GoalFlag, GoalPriority, GoalRelevanceProbe,
    GoalSource, GoalValidityProbe, NoopRelevanceProbe, NoopValidityProbe, ReviewSuggestion,
    review,
};

use super::{new_goal, ts};

struct AlwaysContradicted;

impl GoalValidityProbe for AlwaysContradicted {
    fn contradicted(&self, _goal: &Goal) -> bool {
        true
    }
}

struct AlwaysRelevant;

impl GoalRelevanceProbe for AlwaysRelevant {
    fn relevance_increased(&self, _goal: &Goal) -> bool {
        true
    }
}

const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

#[test]
fn given_active_goal_idle_beyond_a_week_then_flagged_stale() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::UserRequest), ts(0))
        .expect("goal should create");

    let report = review(
        &backlog,
        ts(WEEK_SECS + 3_600),
        &NoopValidityProbe,
        &NoopRelevanceProbe,
    );

    assert!(report.flags.iter().any(|flag| matches!(
        flag,
        GoalFlag::Stale { goal_id, .. } if goal_id == "g1"
    )));
}

#[test]
fn given_active_goal_touched_within_a_week_then_not_stale() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::UserRequest), ts(0))
        .expect("goal should create");

    let report = review(
        &backlog,
        ts(WEEK_SECS - 3_600),
        &NoopValidityProbe,
        &NoopRelevanceProbe,
    );

    assert!(report.flags.is_empty());
}

#[test]
fn given_blocked_active_goal_then_flagged_blocked() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::UserRequest), ts(0))
        .expect("goal should create");
    backlog
        .apply_change(
            &GoalChangeRequest {
                goal_id: "g1".to_string(),
                change: GoalChange::Block {
                    reference: "waiting-on-reply".to_string(),
                },
            },
            ts(1),
        )
        .expect("block should apply");

    let report = review(&backlog, ts(2), &NoopValidityProbe, &NoopRelevanceProbe);

    assert!(report.flags.iter().any(|flag| matches!(
        flag,
        GoalFlag::Blocked { goal_id, reference }
            if goal_id == "g1" && reference == "waiting-on-reply"
    )));
}

#[test]
fn given_contradiction_probe_fires_then_active_goal_flagged() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::UserRequest), ts(0))
        .expect("goal should create");

    let report = review(&backlog, ts(1), &AlwaysContradicted, &NoopRelevanceProbe);

    assert!(report.flags.iter().any(|flag| matches!(
        flag,
        GoalFlag::ContradictionCandidate { goal_id } if goal_id == "g1"
    )));
}

#[test]
fn given_relevance_probe_fires_then_queued_goal_is_promotion_candidate() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    let report = review(&backlog, ts(1), &NoopValidityProbe, &AlwaysRelevant);

    assert!(report.flags.iter().any(|flag| matches!(
        flag,
        GoalFlag::PromotionCandidate { goal_id } if goal_id == "g1"
    )));
}

#[test]
fn given_no_active_goals_then_promote_from_queue_suggested() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::Curiosity), ts(0))
        .expect("goal should create");

    let report = review(&backlog, ts(1), &NoopValidityProbe, &NoopRelevanceProbe);

    assert_eq!(report.suggestions, vec![ReviewSuggestion::PromoteFromQueue]);
}

#[test]
fn given_empty_backlog_then_brainstorm_needed() {
    let backlog = GoalBacklog::new();

    let report = review(&backlog, ts(0), &NoopValidityProbe, &NoopRelevanceProbe);

    assert_eq!(report.suggestions, vec![ReviewSuggestion::BrainstormNeeded]);
}

#[test]
fn given_review_runs_then_priorities_are_untouched() {
    let mut backlog = GoalBacklog::new();
    backlog
        .create(new_goal("g1", GoalSource::UserRequest), ts(0))
        .expect("goal should create");
    backlog
        .create(new_goal("g2", GoalSource::Curiosity), ts(0))
        .expect("goal should create");
    let before = backlog.snapshot();

    let _report = review(
        &backlog,
        ts(WEEK_SECS * 2),
        &AlwaysContradicted,
        &AlwaysRelevant,
    );

    assert_eq!(backlog.snapshot(), before, "review must only flag");
    assert_eq!(
        backlog.get("g2").expect("goal exists").priority,
        GoalPriority::Queued
    );
}
