//! # Store Actor
//!
//! The single writer for the local catalog, cart and sync state.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorState`](crate::framework::ActorState) implementation for [`LocalState`]
//! - [`actions`] - [`StoreCommand`] and [`StoreReply`]
//! - [`persistence`] - [`StateStorage`] backends and the persisted blob shape
//! - [`error`] - [`StoreError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use catalog_sync::store_actor::{self, LocalState, MemoryStorage, PersistenceContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = PersistenceContext::new(Arc::new(MemoryStorage::new()), "sbe-storage");
//!     let state = LocalState::restore(&ctx).await?;
//!
//!     let (actor, client) = store_actor::new(32, state);
//!     tokio::spawn(actor.run(ctx));
//!
//!     client.toggle_group_expanded("Acme").await?;
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod persistence;

pub use actions::*;
pub use entity::*;
pub use error::*;
pub use persistence::*;

use crate::clients::StoreClient;
use crate::framework::StateActor;

/// Creates a new Store actor seeded with `initial` and its client.
pub fn new(buffer_size: usize, initial: LocalState) -> (StateActor<LocalState>, StoreClient) {
    let (actor, generic_client) = StateActor::new(buffer_size, initial);
    (actor, StoreClient::new(generic_client))
}
