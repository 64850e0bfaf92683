use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartbeatErrorKind {
    Store,
    Hydration,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatError {
    pub kind: HeartbeatErrorKind,
    pub message: String,
}

impl HeartbeatError {
    pub fn new(kind: HeartbeatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for HeartbeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HeartbeatError {}

impl From<StoreError> for HeartbeatError {
    fn from(err: StoreError) -> Self {
        HeartbeatError::new(HeartbeatErrorKind::Store, err.message)
    }
}

pub fn hydration_error(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorKind::Hydration, message)
}

pub fn internal_error(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorKind::Internal, message)
}
