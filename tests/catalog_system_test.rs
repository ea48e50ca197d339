use catalog_sync::clients::ActorClient;
use catalog_sync::config::{CatalogConfig, ManifestLocation};
use catalog_sync::lifecycle::CatalogSystem;
use catalog_sync::merge::{SyncError, SyncEvent};
use catalog_sync::model::{ImageSource, Selection, SetCount, SyncStatus};
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, dir: &Path) -> CatalogConfig {
    CatalogConfig {
        manifest_url: format!("{}/stock.json", server.uri()),
        asset_root: dir.join("images"),
        state_dir: dir.join("state"),
        request_timeout_ms: 5_000,
        progress_reset_delay_ms: 10,
        ..Default::default()
    }
}

async fn serve_catalog(server: &MockServer) {
    let manifest = json!([
        {
            "groupName": "Acme Tools",
            "totalAmount": 40.0,
            "products": [
                {"productName": "Bolt", "quantity": 10, "rate": 2.0, "amount": 20.0,
                 "imageUrl": format!("{}/img/bolt.jpg", server.uri())},
                {"productName": "Nut", "quantity": 20, "rate": 1.0, "amount": 20.0,
                 "imageUrl": format!("{}/img/broken.jpg", server.uri())}
            ]
        },
        {
            "groupName": "Zen",
            "products": [{"productName": "Cup", "quantity": 3, "rate": 5.0, "amount": 15.0}]
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/stock.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/bolt.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bolt-jpeg".to_vec()))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/broken.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// Sync, browse state and cart survive a restart, and the warm image cache means
/// the second sync downloads nothing.
#[tokio::test]
async fn test_sync_persist_restart_and_resync() {
    let server = MockServer::start().await;
    serve_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&server, dir.path());

    // First run
    let system = CatalogSystem::start(config.clone())
        .await
        .expect("Failed to start system");
    let mut events = system.engine.subscribe();

    let outcome = system.engine.sync().await.expect("Sync failed");
    assert_eq!(outcome.groups, 2);
    assert_eq!(outcome.products, 3);
    assert_eq!(outcome.downloaded, 1);
    assert_eq!(outcome.failed_images, 1);

    let cached = dir.path().join("images").join("Acme_Tools").join("bolt.jpg");
    assert_eq!(std::fs::read(&cached).unwrap(), b"bolt-jpeg");

    let catalog = system.store.catalog().await.unwrap();
    let bolt = catalog[0].find_product("Bolt").unwrap();
    let cached_str = cached.to_string_lossy().into_owned();
    assert_eq!(bolt.image_source(), ImageSource::Local(&cached_str));
    let nut = catalog[0].find_product("Nut").unwrap();
    assert!(matches!(nut.image_source(), ImageSource::Remote(url) if url.ends_with("/img/broken.jpg")));
    assert_eq!(catalog[1].find_product("Cup").unwrap().image_source(), ImageSource::Placeholder);

    let mut progress_events = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, SyncEvent::Progress { .. }) {
            progress_events += 1;
        }
    }
    assert_eq!(progress_events, 5);

    assert_eq!(
        system.store.toggle_group_expanded("Zen").await.unwrap(),
        Some(false)
    );
    let bolt = bolt.clone();
    system
        .store
        .upsert_cart_entry(system.cart_entry("Acme Tools", bolt.clone(), Selection::Sets(SetCount::One)))
        .await
        .unwrap();
    let replaced = system
        .store
        .upsert_cart_entry(system.cart_entry("Acme Tools", bolt, Selection::note("urgent")))
        .await
        .unwrap();
    assert!(replaced);

    let first_sync = system.store.sync_state().await.unwrap();
    assert_eq!(first_sync.status, SyncStatus::Success);
    system.shutdown().await.expect("Failed to shut down");

    // Second run over the same directories
    let system = CatalogSystem::start(config).await.expect("Failed to restart");

    let restored = system.store.snapshot().await.expect("Failed to read state");
    assert_eq!(restored.catalog.len(), 2);
    assert!(!restored.catalog[1].is_expanded);
    assert_eq!(restored.cart.len(), 1);
    assert_eq!(restored.cart[0].selection, Selection::note("urgent"));
    assert_eq!(restored.sync.status, SyncStatus::Idle);
    assert_eq!(restored.sync.last_synced_at, first_sync.last_synced_at);

    let outcome = system.engine.sync().await.expect("Resync failed");
    assert_eq!(outcome.downloaded, 0);
    assert_eq!(outcome.cache_hits, 1);

    let catalog = system.store.catalog().await.unwrap();
    assert!(!catalog[1].is_expanded, "Collapsed group must stay collapsed");
    assert_eq!(system.store.cart().await.unwrap().len(), 1);

    system.shutdown().await.expect("Failed to shut down");
}

#[tokio::test]
async fn test_failed_fetch_keeps_persisted_catalog() {
    let server = MockServer::start().await;
    serve_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&server, dir.path());

    let system = CatalogSystem::start(config.clone()).await.unwrap();
    system.engine.sync().await.unwrap();
    let before = system.store.catalog().await.unwrap();
    system.shutdown().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/stock.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let system = CatalogSystem::start(config).await.unwrap();
    let err = system.engine.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Fetch(_)));
    assert_eq!(system.store.catalog().await.unwrap(), before);
    assert_eq!(
        system.store.sync_state().await.unwrap().status,
        SyncStatus::Error
    );
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_image_update_reaches_every_location() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let manifest = json!([{"groupName": "Acme", "products": [{"productName": "Bolt"}]}]);
    let encoded = {
        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD.encode(manifest.to_string())
    };

    for repo in ["stock", "stock-mirror"] {
        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/{repo}/contents/stock.json")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"sha": "s1", "content": encoded})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/repos/acme/{repo}/contents/stock.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": {"sha": "s2"}})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let location = |repo: &str| ManifestLocation {
        api_base: server.uri(),
        owner: "acme".to_string(),
        repo: repo.to_string(),
        path: "stock.json".to_string(),
        token: "t".to_string(),
        ..Default::default()
    };
    let config = CatalogConfig {
        manifest_locations: vec![location("stock"), location("stock-mirror")],
        ..config(&server, dir.path())
    };

    let system = CatalogSystem::start(config).await.unwrap();
    let report = system
        .manifest_sync
        .update_product_image("Bolt", Some("https://cdn.test/uploads/bolt.jpg"))
        .await
        .expect("Update failed");

    assert!(report.is_complete());
    assert_eq!(report.updated.len(), 2);
    system.shutdown().await.unwrap();
}
