//! UseCase layer errors.

use thiserror::Error;

use crate::domain::StoreError;

#[derive(Debug, Error, PartialEq)]
pub enum ConnectError {
    /// The freshly registered connection could not receive its initial
    /// snapshot. The connection is already unregistered again when this is
    /// returned.
    #[error("Initial snapshot push failed: {0}")]
    InitialPushFailed(String),
}

#[derive(Debug, Error)]
pub enum LogResultError {
    #[error("Failed to persist log entry: {0}")]
    Store(#[from] StoreError),
}
