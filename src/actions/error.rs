use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionErrorKind {
    ExecutionFailed,
    CollaboratorUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub kind: ActionErrorKind,
    pub message: String,
}

impl ActionError {
    pub fn new(kind: ActionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ActionError {}

pub fn execution_failed(message: impl Into<String>) -> ActionError {
    ActionError::new(ActionErrorKind::ExecutionFailed, message)
}

pub fn collaborator_unavailable(message: impl Into<String>) -> ActionError {
    ActionError::new(ActionErrorKind::CollaboratorUnavailable, message)
}

pub fn internal_error(message: impl Into<String>) -> ActionError {
    ActionError::new(ActionErrorKind::Internal, message)
}
