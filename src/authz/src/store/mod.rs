//! Grant and visibility stores
//!
//! The engine only sees the [`GrantResolver`](crate::grant::GrantResolver)
//! and [`VisibilitySource`](crate::visibility::VisibilitySource) traits.
//! The in-memory tree here backs tests, benches and embedded use.

pub mod memory;

pub use memory::InMemoryTree;
