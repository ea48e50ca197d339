//! Error types for the Asset Cache.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Local filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("Download of {url} failed: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("Download of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }
}
