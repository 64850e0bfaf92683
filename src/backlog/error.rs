use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogErrorKind {
    InvalidRequest,
    InvalidTransition,
    InvariantViolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogError {
    pub kind: BacklogErrorKind,
    pub message: String,
}

impl BacklogError {
    pub fn new(kind: BacklogErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for BacklogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BacklogError {}

pub fn invalid_request(message: impl Into<String>) -> BacklogError {
    BacklogError::new(BacklogErrorKind::InvalidRequest, message)
}

pub fn invalid_transition(message: impl Into<String>) -> BacklogError {
    BacklogError::new(BacklogErrorKind::InvalidTransition, message)
}

pub fn invariant_violation(message: impl Into<String>) -> BacklogError {
    BacklogError::new(BacklogErrorKind::InvariantViolation, message)
}
