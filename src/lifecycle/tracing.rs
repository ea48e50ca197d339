//! # Observability
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` filtered by `RUST_LOG`.
//!
//! ```bash
//! # Sync milestones, cart mutations and failures
//! RUST_LOG=info cargo run
//!
//! # Every store command, image download and manifest request
//! RUST_LOG=debug cargo run
//!
//! # Only the merge engine
//! RUST_LOG=catalog_sync::merge=debug cargo run
//! ```
//!
//! A typical sync at `info`:
//!
//! ```text
//! INFO Actor started state_type="LocalState"
//! INFO sync_with_cancel: Sync started
//! WARN sync_with_cancel: Image download failed group="Acme" product=Bolt url=https://... error=...
//! INFO sync_with_cancel: Catalog replaced groups=12
//! INFO sync_with_cancel: Sync completed groups=12 products=240 downloaded=3 cache_hits=236 failed_images=1
//! ```

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
