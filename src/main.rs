//! # Catalog Sync demo
//!
//! Runs one sync against the configured manifest, puts the first listed product in
//! the cart and prints the shareable order summary.
//!
//! ```bash
//! CATALOG_SYNC_MANIFEST_URL=https://example.com/stock.json RUST_LOG=info cargo run
//! ```

use catalog_sync::browse::{build_listing, ListingRow};
use catalog_sync::config::CatalogConfig;
use catalog_sync::export::order_summary_text;
use catalog_sync::lifecycle::{setup_tracing, CatalogSystem};
use catalog_sync::merge::SyncEvent;
use catalog_sync::model::Selection;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = CatalogConfig::load()?;
    info!(manifest_url = %config.manifest_url, "Starting catalog sync demo");

    let system = CatalogSystem::start(config).await?;

    let mut events = system.engine.subscribe();
    let reporter = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SyncEvent::Progress { percent, .. } if percent % 25 == 0 => {
                    info!(percent, "Sync progress")
                }
                SyncEvent::Failed { reason } => error!(%reason, "Sync failed"),
                SyncEvent::Completed(_) => break,
                _ => {}
            }
        }
    });

    let span = tracing::info_span!("sync");
    match system.engine.sync().instrument(span).await {
        Ok(outcome) => info!(?outcome, "Catalog synced"),
        Err(e) => error!(error = %e, "Sync did not complete"),
    }
    reporter.abort();

    let catalog = system.store.catalog().await?;
    let first = build_listing(&catalog, "").into_iter().find_map(|row| match row {
        ListingRow::Product {
            group_name,
            product,
        } => Some((group_name.to_string(), product.clone())),
        ListingRow::Header { .. } => None,
    });

    if let Some((group_name, product)) = first {
        let entry = system.cart_entry(group_name, product, Selection::sets(1)?);
        system.store.upsert_cart_entry(entry).await?;
        let cart = system.store.cart().await?;
        println!("{}", order_summary_text(&cart)?);
    } else {
        info!("Catalog is empty, nothing to order");
    }

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
