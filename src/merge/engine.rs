//! The catalog merge engine.
//!
//! One `sync()` fetches the manifest, resolves every product image through the
//! [`AssetCache`], and installs the result with a single store command that also
//! carries each group's `is_expanded` flag over from the live catalog. Nothing in
//! the store's catalog changes until that last step, so a sync that fails, is
//! cancelled, or is dropped part-way leaves the previous catalog exactly as it was.

use super::{
    AssumeGranted, ManifestSource, MediaPermission, ProgressTracker, SyncError, SyncEvent,
    SyncOutcome,
};
use crate::asset_cache::{AssetCache, AssetError, AssetLayout, AssetLocation};
use crate::clients::StoreClient;
use crate::model::{Product, SyncStatePatch, SyncStatus};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

pub const DEFAULT_PROGRESS_RESET_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// What happened to one product's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResolution {
    /// No remote image, or no usable file name in its URL.
    NoImage,
    CacheHit(String),
    Downloaded(String),
    /// Directory creation or download failed; the product keeps only its remote URL.
    Failed,
}

impl ImageResolution {
    pub fn local_path(&self) -> Option<&str> {
        match self {
            ImageResolution::CacheHit(path) | ImageResolution::Downloaded(path) => Some(path),
            ImageResolution::NoImage | ImageResolution::Failed => None,
        }
    }
}

impl SyncOutcome {
    fn record(&mut self, resolution: &ImageResolution) {
        self.products += 1;
        match resolution {
            ImageResolution::CacheHit(_) => self.cache_hits += 1,
            ImageResolution::Downloaded(_) => self.downloaded += 1,
            ImageResolution::Failed => self.failed_images += 1,
            ImageResolution::NoImage => {}
        }
    }
}

/// Releases the store's sync guard if a sync future is dropped before it settles.
struct SyncGuard {
    store: Option<StoreClient>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncGuard {
    fn arm(store: StoreClient, events: broadcast::Sender<SyncEvent>) -> Self {
        Self {
            store: Some(store),
            events,
        }
    }

    fn disarm(mut self) {
        self.store = None;
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        if let Some(store) = self.store.take() {
            warn!("Sync dropped before finishing");
            store.abandon_sync();
            let _ = self.events.send(SyncEvent::Failed {
                reason: "Sync abandoned".to_string(),
            });
        }
    }
}

/// Drives a sync from manifest fetch to catalog replacement.
///
/// Cheap to clone; clones share the event channel and the shutdown token.
#[derive(Clone)]
pub struct CatalogMergeEngine {
    store: StoreClient,
    source: Arc<dyn ManifestSource>,
    assets: Arc<dyn AssetCache>,
    permissions: Arc<dyn MediaPermission>,
    layout: AssetLayout,
    events: broadcast::Sender<SyncEvent>,
    progress_reset_delay: Duration,
    shutdown: CancellationToken,
}

impl CatalogMergeEngine {
    pub fn new(
        store: StoreClient,
        source: Arc<dyn ManifestSource>,
        assets: Arc<dyn AssetCache>,
        layout: AssetLayout,
    ) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            store,
            source,
            assets,
            permissions: Arc::new(AssumeGranted),
            layout,
            events,
            progress_reset_delay: DEFAULT_PROGRESS_RESET_DELAY,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: Arc<dyn MediaPermission>) -> Self {
        self.permissions = permissions;
        self
    }

    /// How long progress stays at 100 after a successful sync.
    pub fn with_progress_reset_delay(mut self, delay: Duration) -> Self {
        self.progress_reset_delay = delay;
        self
    }

    /// Replaces the event channel. Existing subscribers stop receiving events.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        self.events = events;
        self
    }

    /// Subscribes to [`SyncEvent`]s from every subsequent sync.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Stops pending background work (the delayed progress reset).
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    /// Runs one sync to completion.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        self.sync_with_cancel(&CancellationToken::new()).await
    }

    /// Runs one sync, giving up with [`SyncError::Cancelled`] once `cancel` fires.
    ///
    /// Cancellation is honoured while the manifest is being fetched and before each
    /// group and each product; an image download already in progress finishes first.
    ///
    /// # Errors
    /// - [`SyncError::AlreadyRunning`] if another sync holds the store; nothing is changed.
    /// - [`SyncError::Fetch`] if the manifest could not be fetched or parsed.
    /// - [`SyncError::Cancelled`] / [`SyncError::Store`] otherwise.
    ///
    /// Every error except `AlreadyRunning` leaves the status at `Error` and the
    /// catalog untouched. So does dropping the returned future mid-sync, so a
    /// timed-out caller never blocks the next sync.
    #[instrument(skip_all)]
    pub async fn sync_with_cancel(&self, cancel: &CancellationToken) -> Result<SyncOutcome, SyncError> {
        self.store.begin_sync().await?;
        let guard = SyncGuard::arm(self.store.clone(), self.events.clone());
        info!("Sync started");
        self.emit(SyncEvent::Started);

        match self.run(cancel).await {
            Ok((outcome, synced_at)) => {
                guard.disarm();
                info!(
                    groups = outcome.groups,
                    products = outcome.products,
                    downloaded = outcome.downloaded,
                    cache_hits = outcome.cache_hits,
                    failed_images = outcome.failed_images,
                    "Sync completed"
                );
                self.emit(SyncEvent::Completed(outcome.clone()));
                self.schedule_progress_reset(synced_at);
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, "Sync failed");
                if let Err(store_err) = self
                    .store
                    .set_sync_state(SyncStatePatch::status(SyncStatus::Error))
                    .await
                {
                    warn!(error = %store_err, "Could not record sync failure");
                }
                guard.disarm();
                self.emit(SyncEvent::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(SyncOutcome, DateTime<Utc>), SyncError> {
        if !self.permissions.request_access().await {
            warn!("Media permission denied, image downloads may fail");
        }

        let manifest = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SyncError::Cancelled),
            fetched = self.source.fetch_manifest() => fetched?,
        };

        let mut progress = ProgressTracker::for_manifest(&manifest);
        debug!(groups = manifest.len(), total = progress.total(), "Manifest accepted");
        if progress.total() == 0 {
            self.store
                .set_sync_state(SyncStatePatch::progress(progress.percent()))
                .await?;
        }

        let mut outcome = SyncOutcome::default();
        let mut catalog = Vec::with_capacity(manifest.len());
        for mut group in manifest {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            self.tick(&mut progress).await?;
            group.is_expanded = true;

            for product in group.products.iter_mut() {
                if cancel.is_cancelled() {
                    return Err(SyncError::Cancelled);
                }
                let resolution = self.resolve_image(&group.name, product).await;
                product.local_image_ref = resolution.local_path().map(str::to_owned);
                outcome.record(&resolution);
                self.tick(&mut progress).await?;
            }

            outcome.groups += 1;
            catalog.push(group);
        }

        let synced_at = Utc::now();
        self.store.complete_sync(catalog, synced_at).await?;
        Ok((outcome, synced_at))
    }

    /// Finds or fetches the local copy of a product image. Never fails: a broken
    /// download is logged and reported as [`ImageResolution::Failed`].
    async fn resolve_image(&self, group_name: &str, product: &Product) -> ImageResolution {
        let Some(remote) = product.remote_image_ref.as_deref() else {
            return ImageResolution::NoImage;
        };
        let Some(location) = self.layout.locate(group_name, remote) else {
            debug!(group = group_name, url = remote, "Image URL has no file name");
            return ImageResolution::NoImage;
        };
        let local = location.file.to_string_lossy().into_owned();

        if self.assets.exists(&location.file).await {
            return ImageResolution::CacheHit(local);
        }

        match self.fetch_into_cache(remote, &location).await {
            Ok(()) => {
                debug!(group = group_name, product = %product.product_name, path = %local, "Image downloaded");
                ImageResolution::Downloaded(local)
            }
            Err(e) => {
                warn!(
                    group = group_name,
                    product = %product.product_name,
                    url = remote,
                    error = %e,
                    "Image download failed"
                );
                ImageResolution::Failed
            }
        }
    }

    async fn fetch_into_cache(&self, remote: &str, location: &AssetLocation) -> Result<(), AssetError> {
        self.assets.ensure_dir(&location.dir).await?;
        self.assets.download(remote, &location.file).await
    }

    async fn tick(&self, progress: &mut ProgressTracker) -> Result<(), SyncError> {
        let percent = progress.tick();
        self.store
            .set_sync_state(SyncStatePatch::progress(percent))
            .await?;
        self.emit(SyncEvent::Progress {
            processed: progress.processed(),
            total: progress.total(),
            percent,
        });
        Ok(())
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn schedule_progress_reset(&self, synced_at: DateTime<Utc>) {
        let store = self.store.clone();
        let delay = self.progress_reset_delay;
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Err(e) = store.settle_progress(synced_at).await {
                        debug!(error = %e, "Progress reset skipped");
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::FetchError;
    use crate::model::Group;
    use crate::store_actor::{self, LocalState, MemoryStorage, PersistedState, PersistenceContext};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const CACHE_ROOT: &str = "/cache";

    struct StaticSource(Vec<Group>);

    #[async_trait]
    impl ManifestSource for StaticSource {
        async fn fetch_manifest(&self) -> Result<Vec<Group>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ManifestSource for FailingSource {
        async fn fetch_manifest(&self) -> Result<Vec<Group>, FetchError> {
            Err(FetchError::Status(500))
        }
    }

    /// Holds the fetch open until `gate` is notified.
    struct GatedSource {
        groups: Vec<Group>,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ManifestSource for GatedSource {
        async fn fetch_manifest(&self) -> Result<Vec<Group>, FetchError> {
            self.gate.notified().await;
            Ok(self.groups.clone())
        }
    }

    struct Denied;

    #[async_trait]
    impl MediaPermission for Denied {
        async fn request_access(&self) -> bool {
            false
        }
    }

    /// In-memory cache: a path is a hit once something was "downloaded" to it.
    #[derive(Default)]
    struct FakeAssets {
        files: Mutex<HashSet<PathBuf>>,
        broken_urls: HashSet<String>,
        downloads: AtomicUsize,
    }

    impl FakeAssets {
        fn failing_on(url: &str) -> Self {
            Self {
                broken_urls: HashSet::from([url.to_string()]),
                ..Default::default()
            }
        }

        fn downloads(&self) -> usize {
            self.downloads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetCache for FakeAssets {
        async fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains(path)
        }

        async fn ensure_dir(&self, _path: &Path) -> Result<(), AssetError> {
            Ok(())
        }

        async fn download(&self, remote_ref: &str, dest: &Path) -> Result<(), AssetError> {
            if self.broken_urls.contains(remote_ref) {
                return Err(AssetError::Status {
                    url: remote_ref.to_string(),
                    status: 404,
                });
            }
            self.downloads.fetch_add(1, Ordering::SeqCst);
            self.files.lock().unwrap().insert(dest.to_path_buf());
            Ok(())
        }
    }

    fn manifest() -> Vec<Group> {
        vec![
            Group::new(
                "Acme Tools",
                vec![
                    Product::new("Bolt").with_image("https://cdn.test/img/bolt.jpg"),
                    Product::new("Nut"),
                ],
            ),
            Group::new(
                "Zen",
                vec![Product::new("Cup").with_image("https://cdn.test/zen/cup.png?v=2")],
            ),
        ]
    }

    fn cached_path(group_dir: &str, file: &str) -> String {
        Path::new(CACHE_ROOT)
            .join(group_dir)
            .join(file)
            .to_string_lossy()
            .into_owned()
    }

    fn start_store(initial: LocalState) -> (StoreClient, MemoryStorage) {
        let storage = MemoryStorage::new();
        let ctx = PersistenceContext::new(Arc::new(storage.clone()), "sbe-storage");
        let (actor, client) = store_actor::new(32, initial);
        tokio::spawn(actor.run(ctx));
        (client, storage)
    }

    fn engine(
        store: StoreClient,
        source: impl ManifestSource + 'static,
        assets: Arc<FakeAssets>,
    ) -> CatalogMergeEngine {
        CatalogMergeEngine::new(store, Arc::new(source), assets, AssetLayout::new(CACHE_ROOT))
            .with_progress_reset_delay(Duration::from_secs(60))
    }

    fn drain(rx: &mut broadcast::Receiver<SyncEvent>) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_sync_installs_manifest_with_cached_images() {
        let (store, storage) = start_store(LocalState::default());
        let assets = Arc::new(FakeAssets::default());
        let engine = engine(store.clone(), StaticSource(manifest()), assets.clone());

        let outcome = engine.sync().await.unwrap();
        assert_eq!(outcome.groups, 2);
        assert_eq!(outcome.products, 3);
        assert_eq!(outcome.downloaded, 2);
        assert_eq!(outcome.failed_images, 0);

        let catalog = store.catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.iter().all(|g| g.is_expanded));
        assert_eq!(
            catalog[0].products[0].local_image_ref.as_deref(),
            Some(cached_path("Acme_Tools", "bolt.jpg").as_str())
        );
        assert_eq!(catalog[0].products[1].local_image_ref, None);
        assert_eq!(
            catalog[1].products[0].local_image_ref.as_deref(),
            Some(cached_path("Zen", "cup.png").as_str())
        );

        let sync = store.sync_state().await.unwrap();
        assert_eq!(sync.status, SyncStatus::Success);
        assert_eq!(sync.progress, 100);
        assert!(sync.last_synced_at.is_some());

        let blob = storage.get("sbe-storage").expect("state persisted");
        let persisted: PersistedState = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted.brands, catalog);
        assert_eq!(persisted.last_synced, sync.last_synced_at);
    }

    #[tokio::test]
    async fn test_sync_keeps_expansion_of_known_groups() {
        let mut collapsed = Group::new("Acme Tools", vec![]);
        collapsed.is_expanded = false;
        let (store, _) = start_store(LocalState {
            catalog: vec![collapsed, Group::new("Gone", vec![])],
            ..Default::default()
        });
        let engine = engine(
            store.clone(),
            StaticSource(manifest()),
            Arc::new(FakeAssets::default()),
        );

        engine.sync().await.unwrap();

        let catalog = store.catalog().await.unwrap();
        let names: Vec<_> = catalog.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Tools", "Zen"]);
        assert!(!catalog[0].is_expanded);
        assert!(catalog[1].is_expanded);
    }

    #[tokio::test]
    async fn test_second_sync_downloads_nothing() {
        let (store, _) = start_store(LocalState::default());
        let assets = Arc::new(FakeAssets::default());
        let engine = engine(store.clone(), StaticSource(manifest()), assets.clone());

        engine.sync().await.unwrap();
        let first = store.catalog().await.unwrap();
        assert_eq!(assets.downloads(), 2);

        let outcome = engine.sync().await.unwrap();
        assert_eq!(outcome.downloaded, 0);
        assert_eq!(outcome.cache_hits, 2);
        assert_eq!(assets.downloads(), 2);
        assert_eq!(store.catalog().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_failed_image_keeps_product_without_local_copy() {
        let (store, _) = start_store(LocalState::default());
        let assets = Arc::new(FakeAssets::failing_on("https://cdn.test/img/bolt.jpg"));
        let engine = engine(store.clone(), StaticSource(manifest()), assets);

        let outcome = engine.sync().await.unwrap();
        assert_eq!(outcome.failed_images, 1);
        assert_eq!(outcome.downloaded, 1);

        let catalog = store.catalog().await.unwrap();
        let bolt = catalog[0].find_product("Bolt").unwrap();
        assert_eq!(bolt.local_image_ref, None);
        assert_eq!(
            bolt.remote_image_ref.as_deref(),
            Some("https://cdn.test/img/bolt.jpg")
        );
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Success);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_catalog_and_reports_once() {
        let previous = vec![Group::new("Old", vec![Product::new("Thing")])];
        let (store, _) = start_store(LocalState {
            catalog: previous.clone(),
            ..Default::default()
        });
        let engine = engine(store.clone(), FailingSource, Arc::new(FakeAssets::default()));
        let mut rx = engine.subscribe();

        let err = engine.sync().await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(FetchError::Status(500))));

        assert_eq!(store.catalog().await.unwrap(), previous);
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Error);

        let events = drain(&mut rx);
        assert_eq!(events.first(), Some(&SyncEvent::Started));
        let failures = events
            .iter()
            .filter(|e| matches!(e, SyncEvent::Failed { .. }))
            .count();
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn test_progress_events_cover_groups_and_products() {
        let (store, _) = start_store(LocalState::default());
        let engine = engine(
            store,
            StaticSource(manifest()),
            Arc::new(FakeAssets::default()),
        );
        let mut rx = engine.subscribe();

        engine.sync().await.unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.first(), Some(&SyncEvent::Started));
        assert!(matches!(events.last(), Some(SyncEvent::Completed(_))));

        let percents: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                SyncEvent::Progress { total, percent, .. } => {
                    assert_eq!(*total, 5);
                    Some(*percent)
                }
                _ => None,
            })
            .collect();
        assert_eq!(percents.len(), 5);
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(percents.last(), Some(&100));
    }

    #[tokio::test]
    async fn test_empty_manifest_clears_catalog() {
        let (store, _) = start_store(LocalState {
            catalog: manifest(),
            ..Default::default()
        });
        let engine = engine(store.clone(), StaticSource(vec![]), Arc::new(FakeAssets::default()));

        let outcome = engine.sync().await.unwrap();
        assert_eq!(outcome, SyncOutcome::default());
        assert!(store.catalog().await.unwrap().is_empty());

        let sync = store.sync_state().await.unwrap();
        assert_eq!(sync.status, SyncStatus::Success);
        assert_eq!(sync.progress, 100);
    }

    #[tokio::test]
    async fn test_second_sync_is_rejected_while_first_runs() {
        let (store, _) = start_store(LocalState::default());
        let gate = Arc::new(Notify::new());
        let engine = engine(
            store.clone(),
            GatedSource {
                groups: manifest(),
                gate: gate.clone(),
            },
            Arc::new(FakeAssets::default()),
        );

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.sync().await }
        });
        while store.sync_state().await.unwrap().status != SyncStatus::Syncing {
            tokio::task::yield_now().await;
        }

        let err = engine.sync().await.unwrap_err();
        assert!(matches!(err, SyncError::AlreadyRunning));
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Syncing);

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Success);
    }

    #[tokio::test]
    async fn test_dropped_sync_does_not_block_the_next_one() {
        let previous = vec![Group::new("Old", vec![])];
        let (store, _) = start_store(LocalState {
            catalog: previous.clone(),
            ..Default::default()
        });
        let stuck = engine(
            store.clone(),
            GatedSource {
                groups: manifest(),
                gate: Arc::new(Notify::new()),
            },
            Arc::new(FakeAssets::default()),
        );
        let mut rx = stuck.subscribe();

        let timed_out = tokio::time::timeout(Duration::from_millis(50), stuck.sync()).await;
        assert!(timed_out.is_err());
        assert_eq!(store.catalog().await.unwrap(), previous);
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Error);
        assert!(drain(&mut rx).contains(&SyncEvent::Failed {
            reason: "Sync abandoned".to_string()
        }));

        let retry = engine(
            store.clone(),
            StaticSource(manifest()),
            Arc::new(FakeAssets::default()),
        );
        retry.sync().await.unwrap();
        assert_eq!(store.catalog().await.unwrap().len(), 2);
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Success);
    }

    #[tokio::test]
    async fn test_toggle_during_sync_survives_install() {
        let (store, _) = start_store(LocalState {
            catalog: manifest(),
            ..Default::default()
        });
        let gate = Arc::new(Notify::new());
        let engine = engine(
            store.clone(),
            GatedSource {
                groups: manifest(),
                gate: gate.clone(),
            },
            Arc::new(FakeAssets::default()),
        );

        let running = tokio::spawn({
            let engine = engine.clone();
            async move { engine.sync().await }
        });
        while store.sync_state().await.unwrap().status != SyncStatus::Syncing {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.toggle_group_expanded("Zen").await.unwrap(), Some(false));

        gate.notify_one();
        running.await.unwrap().unwrap();

        let catalog = store.catalog().await.unwrap();
        assert!(catalog[0].is_expanded);
        assert!(!catalog[1].is_expanded);
    }

    #[tokio::test]
    async fn test_cancelled_sync_keeps_previous_catalog() {
        let previous = vec![Group::new("Old", vec![])];
        let (store, _) = start_store(LocalState {
            catalog: previous.clone(),
            ..Default::default()
        });
        let engine = engine(
            store.clone(),
            GatedSource {
                groups: manifest(),
                gate: Arc::new(Notify::new()),
            },
            Arc::new(FakeAssets::default()),
        );

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = engine.sync_with_cancel(&cancel).await.unwrap_err();

        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(store.catalog().await.unwrap(), previous);
        assert_eq!(store.sync_state().await.unwrap().status, SyncStatus::Error);
    }

    #[tokio::test]
    async fn test_denied_permission_does_not_stop_sync() {
        let (store, _) = start_store(LocalState::default());
        let engine = engine(
            store.clone(),
            StaticSource(manifest()),
            Arc::new(FakeAssets::default()),
        )
        .with_permissions(Arc::new(Denied));

        engine.sync().await.unwrap();
        assert_eq!(store.catalog().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_progress_resets_after_delay() {
        let (store, _) = start_store(LocalState::default());
        let engine = engine(
            store.clone(),
            StaticSource(manifest()),
            Arc::new(FakeAssets::default()),
        )
        .with_progress_reset_delay(Duration::from_millis(10));

        engine.sync().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let sync = store.sync_state().await.unwrap();
        assert_eq!(sync.progress, 0);
        assert_eq!(sync.status, SyncStatus::Success);
    }
}
