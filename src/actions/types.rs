use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Observe,
    Remember,
    Rest,
    Reflect,
    Connect,
    InquireShallow,
    InquireDeep,
    Synthesize,
    Brainstorm,
    Reprioritize,
    ReachOutUser,
    Recalibrate,
}

impl ActionKind {
    pub const ALL: [ActionKind; 12] = [
        ActionKind::Observe,
        ActionKind::Remember,
        ActionKind::Rest,
        ActionKind::Reflect,
        ActionKind::Connect,
        ActionKind::InquireShallow,
        ActionKind::InquireDeep,
        ActionKind::Synthesize,
        ActionKind::Brainstorm,
        ActionKind::Reprioritize,
        ActionKind::ReachOutUser,
        ActionKind::Recalibrate,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Free,
    Retrieval,
    Memory,
    Reasoning,
    Goals,
    Communication,
    Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionSpec {
    pub kind: ActionKind,
    pub cost: f64,
    pub category: ActionCategory,
    pub requires_oracle: bool,
    pub requires_network: bool,
}

/// An action the oracle wants run, in its stated priority order. Not yet
/// charged or executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    pub kind: ActionKind,
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl ProposedAction {
    pub fn bare(kind: ActionKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionResult {
    Completed { value: serde_json::Value },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
    pub cost_charged: f64,
    pub result: ActionResult,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
