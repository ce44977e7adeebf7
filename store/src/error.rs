//! Errors returned by store operations.

use crate::config::StoreMode;

/// Errors that can occur while reading or mutating the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No item carries the requested identifier.
    #[error("item not found: {0}")]
    NotFound(String),

    /// The single secret has never been saved (or was saved empty).
    #[error("no secret stored")]
    Empty,

    /// The operation belongs to the other store mode.
    #[error("{operation} is not available in {mode} mode")]
    Unsupported {
        operation: &'static str,
        mode: StoreMode,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// True for failures of the persistence file rather than of the request.
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Serialization(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
