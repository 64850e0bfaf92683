use crate::actions::types::{ActionCategory, ActionKind, ActionSpec};

/// Static cost table. Exhaustive over `ActionKind`, so a new kind cannot be
/// added without a cost, category, and side-effect flags.
pub struct ActionCatalog;

impl ActionCatalog {
    pub fn spec(kind: ActionKind) -> ActionSpec {
        match kind {
            ActionKind::Observe => ActionSpec {
                kind,
                cost: 0.0,
                category: ActionCategory::Free,
                requires_oracle: false,
                requires_network: false,
            },
            ActionKind::Remember => ActionSpec {
                kind,
                cost: 0.0,
                category: ActionCategory::Free,
                requires_oracle: false,
                requires_network: false,
            },
            ActionKind::Rest => ActionSpec {
                kind,
                cost: 0.0,
                category: ActionCategory::Free,
                requires_oracle: false,
                requires_network: false,
            },
            ActionKind::Reflect => ActionSpec {
                kind,
                cost: 2.0,
                category: ActionCategory::Reasoning,
                requires_oracle: true,
                requires_network: false,
            },
            ActionKind::Connect => ActionSpec {
                kind,
                cost: 1.0,
                category: ActionCategory::Memory,
                requires_oracle: false,
                requires_network: false,
            },
            ActionKind::InquireShallow => ActionSpec {
                kind,
                cost: 3.0,
                category: ActionCategory::Retrieval,
                requires_oracle: false,
                requires_network: true,
            },
            ActionKind::InquireDeep => ActionSpec {
                kind,
                cost: 6.0,
                category: ActionCategory::Retrieval,
                requires_oracle: true,
                requires_network: true,
            },
            ActionKind::Synthesize => ActionSpec {
                kind,
                cost: 4.0,
                category: ActionCategory::Reasoning,
                requires_oracle: true,
                requires_network: false,
            },
            ActionKind::Brainstorm => ActionSpec {
                kind,
                cost: 3.0,
                category: ActionCategory::Goals,
                requires_oracle: true,
                requires_network: false,
            },
            ActionKind::Reprioritize => ActionSpec {
                kind,
                cost: 1.0,
                category: ActionCategory::Goals,
                requires_oracle: false,
                requires_network: false,
            },
            ActionKind::ReachOutUser => ActionSpec {
                kind,
                cost: 5.0,
                category: ActionCategory::Communication,
                requires_oracle: false,
                requires_network: true,
            },
            ActionKind::Recalibrate => ActionSpec {
                kind,
                cost: 2.0,
                category: ActionCategory::Meta,
                requires_oracle: true,
                requires_network: false,
            },
        }
    }

    pub fn cost(kind: ActionKind) -> f64 {
        Self::spec(kind).cost
    }

    pub fn all() -> Vec<ActionSpec> {
        ActionKind::ALL.iter().map(|kind| Self::spec(*kind)).collect()
    }
}
