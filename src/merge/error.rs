//! Error types for the merge engine.

use crate::store_actor::StoreError;
use thiserror::Error;

/// Why the manifest could not be obtained. Any of these aborts the whole sync.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Manifest request failed: {0}")]
    Network(String),

    #[error("Manifest request returned HTTP {0}")]
    Status(u16),

    #[error("Malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// Another `sync()` is in flight. The store was not touched.
    #[error("A sync is already in progress")]
    AlreadyRunning,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Sync cancelled")]
    Cancelled,

    #[error("Store unavailable: {0}")]
    Store(StoreError),
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SyncAlreadyRunning => SyncError::AlreadyRunning,
            other => SyncError::Store(other),
        }
    }
}
