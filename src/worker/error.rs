use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerErrorKind {
    Store,
    Collaborator,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerError {
    pub kind: WorkerErrorKind,
    pub message: String,
}

impl WorkerError {
    pub fn new(kind: WorkerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WorkerError {}

impl From<StoreError> for WorkerError {
    fn from(err: StoreError) -> Self {
        WorkerError::new(WorkerErrorKind::Store, err.message)
    }
}

pub fn collaborator_error(message: impl Into<String>) -> WorkerError {
    WorkerError::new(WorkerErrorKind::Collaborator, message)
}

pub fn internal_error(message: impl Into<String>) -> WorkerError {
    WorkerError::new(WorkerErrorKind::Internal, message)
}
