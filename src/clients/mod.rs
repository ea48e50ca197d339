//! Type-safe wrappers around [`StateClient`](crate::framework::StateClient).

pub mod actor_client;
pub mod store_client;

pub use actor_client::*;
pub use store_client::*;
