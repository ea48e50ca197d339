//! [`ActorState`] implementation for the local catalog/cart state.
//!
//! This is the only place the catalog, the cart and the sync state are mutated.

use super::actions::{StoreCommand, StoreReply};
use super::persistence::{PersistedState, PersistenceContext};
use super::StoreError;
use crate::framework::ActorState;
use crate::model::{CartEntry, CartKey, Group, SyncState, SyncStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{info, warn};

/// Everything the UI renders from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalState {
    pub catalog: Vec<Group>,
    pub cart: Vec<CartEntry>,
    pub sync: SyncState,
}

impl LocalState {
    /// Loads the persisted blob, falling back to an empty state.
    ///
    /// Entries that no longer decode are dropped one by one and the rest is kept.
    /// A blob that is not JSON at all is logged and ignored rather than failing
    /// startup; it gets overwritten by the next commit.
    pub async fn restore(ctx: &PersistenceContext) -> Result<Self, StoreError> {
        let Some(blob) = ctx.storage.load(&ctx.key).await? else {
            info!(key = %ctx.key, "No persisted state, starting empty");
            return Ok(Self::default());
        };
        match serde_json::from_str::<PersistedState>(&blob) {
            Ok(persisted) => {
                info!(
                    key = %ctx.key,
                    groups = persisted.brands.len(),
                    cart = persisted.cart.len(),
                    "Restored persisted state"
                );
                Ok(Self::from(persisted))
            }
            Err(e) => match PersistedState::salvage(&blob) {
                Some((persisted, dropped)) => {
                    warn!(
                        key = %ctx.key,
                        error = %e,
                        dropped,
                        groups = persisted.brands.len(),
                        cart = persisted.cart.len(),
                        "Restored persisted state partially"
                    );
                    Ok(Self::from(persisted))
                }
                None => {
                    warn!(key = %ctx.key, error = %e, "Discarding unreadable persisted state");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            brands: self.catalog.clone(),
            cart: self.cart.clone(),
            last_synced: self.sync.last_synced_at,
        }
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.catalog.iter().find(|g| g.name == name)
    }

    pub fn cart_entry(&self, key: &CartKey) -> Option<&CartEntry> {
        self.cart.iter().find(|e| &e.key == key)
    }

    fn toggle_group(&mut self, name: &str) -> Option<bool> {
        let group = self.catalog.iter_mut().find(|g| g.name == name)?;
        group.is_expanded = !group.is_expanded;
        Some(group.is_expanded)
    }

    /// Copies the live `is_expanded` onto same-named groups of `incoming`.
    fn carry_expansion(&self, incoming: &mut [Group]) {
        let mut expanded: HashMap<&str, bool> = HashMap::new();
        for group in &self.catalog {
            expanded.entry(group.name.as_str()).or_insert(group.is_expanded);
        }
        for group in incoming.iter_mut() {
            if let Some(&is_expanded) = expanded.get(group.name.as_str()) {
                group.is_expanded = is_expanded;
            }
        }
    }

    fn upsert(&mut self, entry: CartEntry) -> bool {
        match self.cart.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.cart.push(entry);
                false
            }
        }
    }

    fn remove(&mut self, key: &CartKey) -> bool {
        let before = self.cart.len();
        self.cart.retain(|e| &e.key != key);
        self.cart.len() != before
    }
}

impl From<PersistedState> for LocalState {
    fn from(persisted: PersistedState) -> Self {
        Self {
            catalog: persisted.brands,
            cart: persisted.cart,
            sync: SyncState {
                last_synced_at: persisted.last_synced,
                ..SyncState::default()
            },
        }
    }
}

#[async_trait]
impl ActorState for LocalState {
    type Command = StoreCommand;
    type Reply = StoreReply;
    type Context = PersistenceContext;
    type Error = StoreError;

    async fn handle(
        &mut self,
        command: StoreCommand,
        _ctx: &PersistenceContext,
    ) -> Result<StoreReply, StoreError> {
        let reply = match command {
            StoreCommand::ReplaceCatalog(groups) => {
                self.catalog = groups;
                info!(groups = self.catalog.len(), "Catalog replaced");
                StoreReply::ReplaceCatalog(self.catalog.len())
            }
            StoreCommand::ToggleGroupExpanded(name) => {
                StoreReply::ToggleGroupExpanded(self.toggle_group(&name))
            }
            StoreCommand::UpsertCartEntry(entry) => {
                let key = entry.key.clone();
                let replaced = self.upsert(entry);
                info!(%key, replaced, size = self.cart.len(), "Cart entry saved");
                StoreReply::UpsertCartEntry(replaced)
            }
            StoreCommand::RemoveCartEntry(key) => {
                let removed = self.remove(&key);
                info!(%key, removed, size = self.cart.len(), "Cart entry removed");
                StoreReply::RemoveCartEntry(removed)
            }
            StoreCommand::SetSyncState(patch) => {
                self.sync.apply(patch);
                StoreReply::SetSyncState(self.sync.clone())
            }
            StoreCommand::BeginSync => {
                if self.sync.status == SyncStatus::Syncing {
                    return Err(StoreError::SyncAlreadyRunning);
                }
                self.sync.status = SyncStatus::Syncing;
                self.sync.progress = 0;
                StoreReply::BeginSync(self.sync.clone())
            }
            StoreCommand::CompleteSync {
                mut catalog,
                synced_at,
            } => {
                self.carry_expansion(&mut catalog);
                self.catalog = catalog;
                info!(groups = self.catalog.len(), "Catalog replaced");
                self.sync = SyncState {
                    status: SyncStatus::Success,
                    progress: 100,
                    last_synced_at: Some(synced_at),
                };
                StoreReply::CompleteSync(self.sync.clone())
            }
            StoreCommand::AbandonSync => {
                let abandoned = self.sync.status == SyncStatus::Syncing;
                if abandoned {
                    self.sync.status = SyncStatus::Error;
                    warn!(progress = self.sync.progress, "Sync abandoned");
                }
                StoreReply::AbandonSync(abandoned)
            }
            StoreCommand::SettleProgress { synced_at } => {
                let settle = self.sync.status != SyncStatus::Syncing
                    && self.sync.last_synced_at == Some(synced_at)
                    && self.sync.progress != 0;
                if settle {
                    self.sync.progress = 0;
                }
                StoreReply::SettleProgress(settle)
            }
        };
        Ok(reply)
    }

    fn should_commit(command: &StoreCommand) -> bool {
        command.touches_persisted_state()
    }

    async fn on_commit(&self, ctx: &PersistenceContext) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&self.to_persisted())?;
        ctx.storage.save(&ctx.key, &blob).await
    }
}
