#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Catalog Sync
//!
//! > **Offline-first product catalog with a single-writer local store.**
//!
//! A remote JSON manifest of product groups is fetched, merged with local UI state,
//! and installed into a local store together with cached copies of every product
//! image. A cart of selections lives alongside the catalog and survives restarts.
//!
//! ## 🏗️ Design
//!
//! ### One writer
//! The catalog, the cart and the sync state live inside one actor
//! ([`store_actor`]). Every mutation is a command processed in order, so readers
//! never observe a half-replaced catalog and two syncs can never interleave: the
//! second one is rejected by the store itself.
//!
//! ### Merge, then swap
//! [`merge::CatalogMergeEngine`] builds the complete new catalog off to the side
//! (carrying over which groups the user had collapsed, resolving images through the
//! [`asset_cache`]) and installs it with a single command. A failed or cancelled
//! sync leaves the previous catalog untouched.
//!
//! ### Images are best effort
//! A product whose image cannot be downloaded still appears, pointing at its remote
//! URL. Only manifest-level failures fail a sync.
//!
//! ### Observability
//! `tracing` everywhere with structured fields; see [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`] - the generic [`StateActor`](framework::StateActor) and its client
//! - [`store_actor`] / [`clients`] - the local store and its typed [`StoreClient`](clients::StoreClient)
//! - [`merge`] - the sync driver, manifest source and progress events
//! - [`asset_cache`] - on-disk image cache
//! - [`manifest_sync`] - editing the authoritative manifest through a contents API
//! - [`browse`] / [`export`] - list rows for the UI and shareable order summaries
//! - [`config`] / [`lifecycle`] - configuration, startup and shutdown
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! CATALOG_SYNC_MANIFEST_URL=https://example.com/stock.json RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod asset_cache;
pub mod browse;
pub mod clients;
pub mod config;
pub mod export;
pub mod framework;
pub mod lifecycle;
pub mod manifest_sync;
pub mod merge;
pub mod model;
pub mod store_actor;
