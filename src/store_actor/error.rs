//! Error types for the Store actor.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `BeginSync` arrived while another sync was still running.
    #[error("A sync is already in progress")]
    SyncAlreadyRunning,

    /// Reading or writing the persisted blob failed.
    #[error("Persistence error for key {key}: {source}")]
    Persistence {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The persisted blob could not be encoded or decoded.
    #[error("Persisted state is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::ActorCommunication(msg)
    }
}
