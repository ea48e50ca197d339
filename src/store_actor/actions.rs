//! Commands accepted by the Store actor.
//!
//! Every mutation of the catalog, the cart or the sync state is one of these
//! variants. The actor applies them one at a time, which is what makes a catalog
//! replacement or a cart upsert impossible to observe half-done.
//!
//! See [`impl ActorState for LocalState`](crate::store_actor::LocalState) for the
//! handling of each command.

use crate::model::{CartEntry, CartKey, Group, SyncState, SyncStatePatch};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum StoreCommand {
    /// Swaps the whole catalog for a new one.
    ReplaceCatalog(Vec<Group>),
    /// Flips `is_expanded` on the named group. No-op if absent.
    ToggleGroupExpanded(String),
    /// Inserts the entry, or replaces the existing entry with the same key in place.
    UpsertCartEntry(CartEntry),
    /// Removes the entry with this key. No-op if absent.
    RemoveCartEntry(CartKey),
    /// Merges the set fields into the sync state.
    SetSyncState(SyncStatePatch),
    /// Enters `Syncing` with progress 0.
    ///
    /// # Errors
    /// Fails with `SyncAlreadyRunning` if the status is already `Syncing`.
    BeginSync,
    /// Installs a merged catalog and marks the sync successful, in one step.
    ///
    /// Groups keep the `is_expanded` they currently have in the store, so a toggle
    /// made while the sync was running survives it.
    CompleteSync {
        catalog: Vec<Group>,
        synced_at: DateTime<Utc>,
    },
    /// Marks a sync that will never complete as failed. No-op unless `Syncing`.
    AbandonSync,
    /// Resets progress to 0 after the sync that finished at `synced_at`.
    ///
    /// No-op once another sync has started or finished since.
    SettleProgress { synced_at: DateTime<Utc> },
}

impl StoreCommand {
    /// Whether the command touches anything that is persisted.
    pub fn touches_persisted_state(&self) -> bool {
        match self {
            StoreCommand::ReplaceCatalog(_)
            | StoreCommand::ToggleGroupExpanded(_)
            | StoreCommand::UpsertCartEntry(_)
            | StoreCommand::RemoveCartEntry(_)
            | StoreCommand::CompleteSync { .. } => true,
            StoreCommand::SetSyncState(patch) => patch.last_synced_at.is_some(),
            StoreCommand::BeginSync
            | StoreCommand::AbandonSync
            | StoreCommand::SettleProgress { .. } => false,
        }
    }
}

/// Results from StoreCommands - variants match 1:1 with StoreCommand
#[derive(Debug, Clone, PartialEq)]
pub enum StoreReply {
    /// Number of groups now in the catalog.
    ReplaceCatalog(usize),
    /// New `is_expanded` value, or `None` if no group had that name.
    ToggleGroupExpanded(Option<bool>),
    /// `true` if an existing entry was replaced.
    UpsertCartEntry(bool),
    /// `true` if an entry was removed.
    RemoveCartEntry(bool),
    SetSyncState(SyncState),
    BeginSync(SyncState),
    CompleteSync(SyncState),
    /// `true` if a running sync was marked failed.
    AbandonSync(bool),
    /// `true` if progress was reset.
    SettleProgress(bool),
}
