//! # Catalog Merge
//!
//! Turns a freshly fetched remote manifest into the local catalog.
//!
//! ## Structure
//!
//! - [`engine`] - [`CatalogMergeEngine`], the sync driver
//! - [`source`] - [`ManifestSource`] and its HTTP implementation
//! - [`permission`] - [`MediaPermission`] host hook
//! - [`progress`] - [`ProgressTracker`], [`SyncEvent`] and [`SyncOutcome`]
//! - [`error`] - [`SyncError`] and [`FetchError`]

pub mod engine;
pub mod error;
pub mod permission;
pub mod progress;
pub mod source;

pub use engine::*;
pub use error::*;
pub use permission::*;
pub use progress::*;
pub use source::*;
