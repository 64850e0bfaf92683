use async_trait::async_trait;

use crate::oracle::{
    error::OracleError,
    types::{Decision, DecisionRequest},
};

/// The external reasoning collaborator. The scheduler bounds every call with
/// a timeout; adapters report failures through the oracle error taxonomy and
/// never panic the cycle.
#[async_trait]
pub trait DecisionOraclePort: Send + Sync {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, OracleError>;
}
