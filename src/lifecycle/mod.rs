//! Startup, wiring and shutdown of the catalog system.

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use self::tracing::setup_tracing;
