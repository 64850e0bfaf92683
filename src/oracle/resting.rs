use async_trait::async_trait;

use crate::oracle::{
    error::OracleError,
    ports::DecisionOraclePort,
    types::{Decision, DecisionRequest},
};

/// Oracle stand-in for deployments without a configured endpoint: every cycle
/// gets the minimal decision, so the loop keeps its rhythm without reasoning.
pub struct RestingOracle;

#[async_trait]
impl DecisionOraclePort for RestingOracle {
    async fn decide(&self, _request: &DecisionRequest) -> Result<Decision, OracleError> {
        Ok(Decision::minimal())
    }
}
