use std::{
    collections::VecDeque,
    sync::Mutex,
};

use async_trait::async_trait;

use crate::oracle::{
    error::{OracleError, unavailable},
    ports::DecisionOraclePort,
    types::{Decision, DecisionRequest},
};

/// Scripted oracle for tests: pops one queued result per call and records the
/// context bundles it received.
#[derive(Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Result<Decision, OracleError>>>,
    requests: Mutex<Vec<DecisionRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: Result<Decision, OracleError>) {
        self.script
            .lock()
            .expect("scripted oracle lock poisoned")
            .push_back(result);
    }

    pub fn seen_requests(&self) -> Vec<DecisionRequest> {
        self.requests
            .lock()
            .expect("scripted oracle lock poisoned")
            .clone()
    }
}

#[async_trait]
impl DecisionOraclePort for ScriptedOracle {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, OracleError> {
        self.requests
            .lock()
            .expect("scripted oracle lock poisoned")
            .push(request.clone());
        self.script
            .lock()
            .expect("scripted oracle lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(unavailable("oracle script exhausted")))
    }
}
