//! # Asset Cache
//!
//! Capability interface the merge engine uses to find or fetch product images.
//!
//! The filesystem *is* the cache: a file at the deterministic path from
//! [`AssetLayout`] is a hit. There is no eviction and no content revalidation, so an
//! image replaced remotely under the same file name is not re-downloaded.

pub mod error;
pub mod layout;

pub use error::*;
pub use layout::*;

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// Operations the merge engine needs from the image cache.
#[async_trait]
pub trait AssetCache: Send + Sync {
    /// Whether a cached file exists at `path`. Errors count as a miss.
    async fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and its parents if needed.
    async fn ensure_dir(&self, path: &Path) -> Result<(), AssetError>;

    /// Fetches `remote_ref` and stores it at `dest`.
    async fn download(&self, remote_ref: &str, dest: &Path) -> Result<(), AssetError>;
}

/// [`AssetCache`] backed by the local filesystem and an HTTP client.
#[derive(Debug, Clone)]
pub struct FsAssetCache {
    http: reqwest::Client,
}

impl FsAssetCache {
    /// `http` should carry the per-request timeout.
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AssetCache for FsAssetCache {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn ensure_dir(&self, path: &Path) -> Result<(), AssetError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| AssetError::io(path, e))
    }

    /// The body is written to a `.part` sibling and renamed into place, so an
    /// interrupted download never leaves a file that would count as a cache hit.
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    async fn download(&self, remote_ref: &str, dest: &Path) -> Result<(), AssetError> {
        let network = |e: reqwest::Error| AssetError::Network {
            url: remote_ref.to_string(),
            message: e.to_string(),
        };

        let response = self.http.get(remote_ref).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: remote_ref.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(network)?;

        let mut staging = dest.as_os_str().to_owned();
        staging.push(".part");
        let staging = std::path::PathBuf::from(staging);

        let stored = match tokio::fs::write(&staging, &bytes).await {
            Ok(()) => tokio::fs::rename(&staging, dest)
                .await
                .map_err(|e| AssetError::io(dest, e)),
            Err(e) => Err(AssetError::io(&staging, e)),
        };
        if let Err(e) = stored {
            // Never leave a partial file behind
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }

        debug!(bytes = bytes.len(), "Asset stored");
        Ok(())
    }
}
