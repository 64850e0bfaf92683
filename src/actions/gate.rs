use crate::actions::{catalog::ActionCatalog, types::ProposedAction};

#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub admitted: Vec<ProposedAction>,
    pub rejected: Vec<ProposedAction>,
    pub planned_cost: f64,
}

/// Admission control over the oracle's ordered proposal list.
///
/// Admission is a prefix of the proposed list: the first item whose cost
/// would exceed the remaining budget terminates iteration, and every later
/// item is rejected even if it would individually fit. The oracle's stated
/// ordering is a hard contract; the gate never reorders.
pub struct DecisionGate;

impl DecisionGate {
    pub fn admit(proposed: Vec<ProposedAction>, available: f64) -> GateOutcome {
        let mut admitted = Vec::new();
        let mut rejected = Vec::new();
        let mut cumulative = 0.0_f64;
        let mut cut = false;

        for action in proposed {
            if cut {
                rejected.push(action);
                continue;
            }
            let cost = ActionCatalog::cost(action.kind);
            if cumulative + cost <= available {
                cumulative += cost;
                admitted.push(action);
            } else {
                cut = true;
                rejected.push(action);
            }
        }

        GateOutcome {
            admitted,
            rejected,
            planned_cost: cumulative,
        }
    }
}
