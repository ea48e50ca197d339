//! # Store Client
//!
//! Provides a high-level API for interacting with the Store actor.
//! It wraps a `StateClient<LocalState>` and exposes one method per store operation.
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, StateClient};
use crate::model::{CartEntry, CartKey, Group, SyncState, SyncStatePatch};
use crate::store_actor::{LocalState, StoreCommand, StoreError, StoreReply};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

/// Client for interacting with the Store actor.
#[derive(Clone)]
pub struct StoreClient {
    inner: StateClient<LocalState>,
}

impl StoreClient {
    pub fn new(inner: StateClient<LocalState>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<LocalState> for StoreClient {
    type Error = StoreError;

    fn inner(&self) -> &StateClient<LocalState> {
        &self.inner
    }

    /// Recovers the typed [`StoreError`] when the actor rejected a command.
    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::StateError(inner) => match inner.downcast::<StoreError>() {
                Ok(store_error) => *store_error,
                Err(other) => StoreError::ActorCommunication(other.to_string()),
            },
            other => StoreError::ActorCommunication(other.to_string()),
        }
    }
}

impl StoreClient {
    async fn send(&self, command: StoreCommand) -> Result<StoreReply, StoreError> {
        self.inner.send(command).await.map_err(Self::map_error)
    }

    /// Replaces the entire catalog. Returns the new group count.
    #[instrument(skip(self, groups), fields(groups = groups.len()))]
    pub async fn replace_catalog(&self, groups: Vec<Group>) -> Result<usize, StoreError> {
        debug!("Sending request");
        match self.send(StoreCommand::ReplaceCatalog(groups)).await? {
            StoreReply::ReplaceCatalog(count) => Ok(count),
            _ => unreachable!("ReplaceCatalog command must return ReplaceCatalog reply"),
        }
    }

    /// Flips `is_expanded` on a group.
    ///
    /// Returns the new value, or `None` if no group has that name.
    #[instrument(skip(self))]
    pub async fn toggle_group_expanded(&self, group_name: &str) -> Result<Option<bool>, StoreError> {
        debug!("Sending request");
        match self
            .send(StoreCommand::ToggleGroupExpanded(group_name.to_string()))
            .await?
        {
            StoreReply::ToggleGroupExpanded(expanded) => Ok(expanded),
            _ => unreachable!("ToggleGroupExpanded command must return ToggleGroupExpanded reply"),
        }
    }

    /// Inserts or replaces a cart entry by key. Returns `true` on replace.
    #[instrument(skip(self, entry), fields(key = %entry.key))]
    pub async fn upsert_cart_entry(&self, entry: CartEntry) -> Result<bool, StoreError> {
        debug!(selection = %entry.selection, "Sending request");
        match self.send(StoreCommand::UpsertCartEntry(entry)).await? {
            StoreReply::UpsertCartEntry(replaced) => Ok(replaced),
            _ => unreachable!("UpsertCartEntry command must return UpsertCartEntry reply"),
        }
    }

    /// Removes a cart entry. Returns `true` if one was removed.
    #[instrument(skip(self))]
    pub async fn remove_cart_entry(&self, key: CartKey) -> Result<bool, StoreError> {
        debug!("Sending request");
        match self.send(StoreCommand::RemoveCartEntry(key)).await? {
            StoreReply::RemoveCartEntry(removed) => Ok(removed),
            _ => unreachable!("RemoveCartEntry command must return RemoveCartEntry reply"),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_sync_state(&self, patch: SyncStatePatch) -> Result<SyncState, StoreError> {
        match self.send(StoreCommand::SetSyncState(patch)).await? {
            StoreReply::SetSyncState(state) => Ok(state),
            _ => unreachable!("SetSyncState command must return SetSyncState reply"),
        }
    }

    /// Enters `Syncing`.
    ///
    /// # Errors
    /// [`StoreError::SyncAlreadyRunning`] if a sync is in flight.
    #[instrument(skip(self))]
    pub async fn begin_sync(&self) -> Result<SyncState, StoreError> {
        match self.send(StoreCommand::BeginSync).await? {
            StoreReply::BeginSync(state) => Ok(state),
            _ => unreachable!("BeginSync command must return BeginSync reply"),
        }
    }

    /// Installs the merged catalog and marks the sync successful in one command.
    #[instrument(skip(self, catalog), fields(groups = catalog.len()))]
    pub async fn complete_sync(
        &self,
        catalog: Vec<Group>,
        synced_at: DateTime<Utc>,
    ) -> Result<SyncState, StoreError> {
        match self
            .send(StoreCommand::CompleteSync { catalog, synced_at })
            .await?
        {
            StoreReply::CompleteSync(state) => Ok(state),
            _ => unreachable!("CompleteSync command must return CompleteSync reply"),
        }
    }

    /// Marks a running sync as failed without waiting for the actor.
    ///
    /// For callers that cannot await, such as a guard being dropped. Falls back to
    /// a spawned send when the mailbox is full.
    pub fn abandon_sync(&self) {
        match self.inner.try_send_detached(StoreCommand::AbandonSync) {
            Ok(()) => debug!("Abandon queued"),
            Err(FrameworkError::MailboxFull) => match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let client = self.clone();
                    runtime.spawn(async move {
                        if let Err(e) = client.send(StoreCommand::AbandonSync).await {
                            warn!(error = %e, "Could not abandon sync");
                        }
                    });
                }
                Err(_) => warn!("Mailbox full and no runtime, sync left running"),
            },
            Err(e) => warn!(error = %e, "Could not abandon sync"),
        }
    }

    /// Resets progress to 0 if the sync that finished at `synced_at` is still the
    /// latest one. Returns `true` if progress was reset.
    #[instrument(skip(self))]
    pub async fn settle_progress(&self, synced_at: DateTime<Utc>) -> Result<bool, StoreError> {
        match self.send(StoreCommand::SettleProgress { synced_at }).await? {
            StoreReply::SettleProgress(settled) => Ok(settled),
            _ => unreachable!("SettleProgress command must return SettleProgress reply"),
        }
    }

    pub async fn catalog(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.snapshot().await?.catalog)
    }

    pub async fn cart(&self) -> Result<Vec<CartEntry>, StoreError> {
        Ok(self.snapshot().await?.cart)
    }

    pub async fn sync_state(&self) -> Result<SyncState, StoreError> {
        Ok(self.snapshot().await?.sync)
    }
}
