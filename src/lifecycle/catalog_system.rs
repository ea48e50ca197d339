use crate::asset_cache::{AssetCache, AssetLayout, FsAssetCache};
use crate::clients::StoreClient;
use crate::config::{CatalogConfig, ConfigError};
use crate::manifest_sync::{ContentsClient, ManifestSync};
use crate::merge::{
    AssumeGranted, CatalogMergeEngine, HttpManifestSource, ManifestSource, MediaPermission,
};
use crate::model::{CartEntry, CartKeyPolicy, Product, Selection};
use crate::store_actor::{self, FileStorage, LocalState, PersistenceContext, StateStorage, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to build HTTP client: {0}")]
    Http(String),

    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}

/// The pluggable pieces of a [`CatalogSystem`].
///
/// [`SystemComponents::from_config`] wires the production implementations; tests and
/// embedding hosts can swap any of them.
pub struct SystemComponents {
    pub storage: Arc<dyn StateStorage>,
    pub source: Arc<dyn ManifestSource>,
    pub assets: Arc<dyn AssetCache>,
    pub permissions: Arc<dyn MediaPermission>,
    pub contents: ContentsClient,
}

impl SystemComponents {
    /// File-backed storage plus HTTP manifest, image and contents clients sharing one
    /// `reqwest::Client` with the configured timeout.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, SystemError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SystemError::Http(e.to_string()))?;

        Ok(Self {
            storage: Arc::new(FileStorage::new(&config.state_dir)),
            source: Arc::new(HttpManifestSource::new(http.clone(), &config.manifest_url)),
            assets: Arc::new(FsAssetCache::new(http.clone())),
            permissions: Arc::new(AssumeGranted),
            contents: ContentsClient::new(http),
        })
    }
}

/// Owns the store actor and hands out everything a host needs to drive it.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::start(CatalogConfig::load()?).await?;
///
/// system.engine.sync().await?;
/// let entry = system.cart_entry("Acme", product, Selection::sets(2)?);
/// system.store.upsert_cart_entry(entry).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    pub store: StoreClient,
    pub engine: CatalogMergeEngine,
    pub manifest_sync: ManifestSync,
    cart_key_policy: CartKeyPolicy,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Validates `config` and starts the system with the production components.
    pub async fn start(config: CatalogConfig) -> Result<Self, SystemError> {
        config.validate()?;
        let components = SystemComponents::from_config(&config)?;
        Self::with_components(&config, components).await
    }

    /// Restores persisted state, spawns the store actor and builds the engine.
    pub async fn with_components(
        config: &CatalogConfig,
        components: SystemComponents,
    ) -> Result<Self, SystemError> {
        let ctx = PersistenceContext::new(components.storage, config.storage_key.clone());
        let state = LocalState::restore(&ctx).await?;

        let (store_actor, store) = store_actor::new(config.mailbox_size, state);
        let store_handle = tokio::spawn(store_actor.run(ctx));

        let engine = CatalogMergeEngine::new(
            store.clone(),
            components.source,
            components.assets,
            AssetLayout::new(&config.asset_root),
        )
        .with_permissions(components.permissions)
        .with_progress_reset_delay(config.progress_reset_delay())
        .with_event_capacity(config.event_capacity);

        let manifest_sync = ManifestSync::new(components.contents, config.manifest_locations.clone());

        info!(
            asset_root = %config.asset_root.display(),
            locations = config.manifest_locations.len(),
            "Catalog system started"
        );

        Ok(Self {
            store,
            engine,
            manifest_sync,
            cart_key_policy: config.cart_key_policy,
            handles: vec![store_handle],
        })
    }

    /// Builds a cart entry keyed by the configured [`CartKeyPolicy`].
    pub fn cart_entry(
        &self,
        group_name: impl Into<String>,
        product: Product,
        selection: Selection,
    ) -> CartEntry {
        CartEntry::new(self.cart_key_policy, group_name, product, selection)
    }

    /// Stops background work, closes the store mailbox and waits for the actor.
    ///
    /// Clones of the store client or engine held elsewhere keep the actor alive
    /// until they are dropped too.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down catalog system...");

        self.engine.close();
        drop(self.engine);
        drop(self.manifest_sync);
        drop(self.store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("Catalog system shutdown complete.");
        Ok(())
    }
}
