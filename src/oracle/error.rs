use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleErrorKind {
    Malformed,
    Refusal,
    Unavailable,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleError {
    pub kind: OracleErrorKind,
    pub message: String,
}

impl OracleError {
    pub fn new(kind: OracleErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OracleError {}

pub fn malformed(message: impl Into<String>) -> OracleError {
    OracleError::new(OracleErrorKind::Malformed, message)
}

pub fn refusal(message: impl Into<String>) -> OracleError {
    OracleError::new(OracleErrorKind::Refusal, message)
}

pub fn unavailable(message: impl Into<String>) -> OracleError {
    OracleError::new(OracleErrorKind::Unavailable, message)
}

pub fn timeout(message: impl Into<String>) -> OracleError {
    OracleError::new(OracleErrorKind::Timeout, message)
}
