//! Durable storage for the local state.
//!
//! The catalog, the cart and the last sync time are written as one JSON blob under a
//! fixed key after every committing command, and read back once at startup.

use crate::model::{CartEntry, Group};
use crate::store_actor::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// The persisted shape of the local state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub brands: Vec<Group>,
    #[serde(default)]
    pub cart: Vec<CartEntry>,
    #[serde(default)]
    pub last_synced: Option<DateTime<Utc>>,
}

impl PersistedState {
    /// Decodes what it can from a blob that failed strict decoding.
    ///
    /// Groups and cart entries are decoded one at a time; the ones that no longer
    /// decode are dropped and counted. Returns `None` if the blob is not a JSON
    /// object at all.
    pub fn salvage(blob: &str) -> Option<(Self, usize)> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(blob).ok()? else {
            return None;
        };
        let mut dropped = 0;
        let brands = salvage_list(fields.remove("brands"), &mut dropped);
        let cart = salvage_list(fields.remove("cart"), &mut dropped);
        let last_synced = fields
            .remove("lastSynced")
            .and_then(|v| serde_json::from_value(v).ok())
            .flatten();
        Some((
            Self {
                brands,
                cart,
                last_synced,
            },
            dropped,
        ))
    }
}

fn salvage_list<T: DeserializeOwned>(value: Option<Value>, dropped: &mut usize) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    *dropped += total - kept.len();
    kept
}

/// Key-value blob storage.
#[async_trait]
pub trait StateStorage: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn save(&self, key: &str, blob: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a crash
/// mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Persistence {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Persistence {
            key: key.to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let target = self.path_for(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&staging, blob).await.map_err(io_err)?;
        tokio::fs::rename(&staging, &target).await.map_err(io_err)?;
        debug!(path = %target.display(), bytes = blob.len(), "State persisted");
        Ok(())
    }
}

/// In-memory storage, for tests and for hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored blob without going through the async trait.
    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// What the Store actor needs to persist itself: a storage backend and the key.
#[derive(Clone)]
pub struct PersistenceContext {
    pub storage: Arc<dyn StateStorage>,
    pub key: String,
}

impl PersistenceContext {
    pub fn new(storage: Arc<dyn StateStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}
