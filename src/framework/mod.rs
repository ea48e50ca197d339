//! Generic single-writer actor framework.
//!
//! This module provides the building blocks for owning a piece of state inside one
//! Tokio task and mutating it only through typed commands.
//!
//! # Main Components
//!
//! - [`ActorState`] - Trait that actor-owned state types implement
//! - [`StateActor`] - Generic actor that owns the state
//! - [`StateClient`] - Type-safe, cloneable client handle
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
