//! Pure data structures shared by the store, the merge engine and the UI.

pub mod cart;
pub mod catalog;
pub mod sync_state;

pub use cart::*;
pub use catalog::*;
pub use sync_state::*;
