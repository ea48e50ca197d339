use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of the most recent sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

/// Sync status as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub status: SyncStatus,
    /// 0–100.
    pub progress: u8,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Partial update for [`SyncState`]; `None` fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncStatePatch {
    pub status: Option<SyncStatus>,
    pub progress: Option<u8>,
    pub last_synced_at: Option<Option<DateTime<Utc>>>,
}

impl SyncStatePatch {
    pub fn status(status: SyncStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }
}

impl SyncState {
    pub fn apply(&mut self, patch: SyncStatePatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }
        if let Some(last_synced_at) = patch.last_synced_at {
            self.last_synced_at = last_synced_at;
        }
    }
}
