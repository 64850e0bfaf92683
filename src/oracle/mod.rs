pub mod error;
pub mod http;
pub mod parse;
pub mod ports;
pub mod prompts;
pub mod resting;
pub mod testing;
pub mod types;

pub use error::{OracleError, OracleErrorKind};
pub use http::{HttpDecisionOracle, HttpOracleConfig};
pub use parse::{decision_json_schema, parse_decision};
pub use ports::DecisionOraclePort;
pub use resting::RestingOracle;
pub use testing::ScriptedOracle;
pub use types::{Decision, DecisionRequest, GoalSummary};
