use cardia::actions::{ActionKind, DecisionGate, ProposedAction};

fn proposal(kinds: &[ActionKind]) -> Vec<ProposedAction> {
    kinds.iter().map(|kind| ProposedAction::bare(*kind)).collect()
}

#[test]
fn given_energy_ten_when_gating_productive_turn_then_all_four_admitted() {
    // Reflect(2) + InquireShallow(3) + Synthesize(4) + Connect(1) = 10.
    let outcome = DecisionGate::admit(
        proposal(&[
            ActionKind::Reflect,
            ActionKind::InquireShallow,
            ActionKind::Synthesize,
            ActionKind::Connect,
        ]),
        10.0,
    );

    assert_eq!(outcome.admitted.len(), 4);
    assert!(outcome.rejected.is_empty());
    assert_eq!(outcome.planned_cost, 10.0);
}

#[test]
fn given_energy_six_when_first_item_consumes_budget_then_rest_rejected() {
    let outcome = DecisionGate::admit(
        proposal(&[
            ActionKind::InquireDeep,
            ActionKind::Synthesize,
            ActionKind::ReachOutUser,
        ]),
        6.0,
    );

    assert_eq!(outcome.admitted.len(), 1);
    assert_eq!(outcome.admitted[0].kind, ActionKind::InquireDeep);
    assert_eq!(outcome.rejected.len(), 2);
    assert_eq!(outcome.planned_cost, 6.0);
}

#[test]
fn given_midlist_overrun_when_gating_then_later_fitting_item_still_rejected() {
    // Synthesize(4) fits in 5; InquireDeep(6) overruns and terminates the
    // scan; the trailing Connect(1) would fit individually but admission is
    // a prefix, never a reordered subset.
    let outcome = DecisionGate::admit(
        proposal(&[
            ActionKind::Synthesize,
            ActionKind::InquireDeep,
            ActionKind::Connect,
        ]),
        5.0,
    );

    assert_eq!(outcome.admitted.len(), 1);
    assert_eq!(outcome.admitted[0].kind, ActionKind::Synthesize);
    assert_eq!(
        outcome
            .rejected
            .iter()
            .map(|action| action.kind)
            .collect::<Vec<_>>(),
        vec![ActionKind::InquireDeep, ActionKind::Connect],
    );
}

#[test]
fn given_zero_energy_when_gating_free_actions_then_admitted() {
    let outcome = DecisionGate::admit(
        proposal(&[ActionKind::Observe, ActionKind::Remember, ActionKind::Rest]),
        0.0,
    );

    assert_eq!(outcome.admitted.len(), 3);
    assert_eq!(outcome.planned_cost, 0.0);
}

#[test]
fn given_any_proposal_when_gated_then_admission_is_a_prefix() {
    let proposed = proposal(&[
        ActionKind::Connect,
        ActionKind::Reflect,
        ActionKind::Brainstorm,
        ActionKind::InquireShallow,
        ActionKind::Synthesize,
    ]);

    for budget in [0.0, 1.0, 3.0, 6.0, 9.0, 13.0] {
        let outcome = DecisionGate::admit(proposed.clone(), budget);
        let mut rebuilt = outcome.admitted.clone();
        rebuilt.extend(outcome.rejected.clone());
        assert_eq!(rebuilt, proposed, "order must survive gating at {budget}");
    }
}
