//! Materialized item paths
//!
//! Every item carries the ids of its ancestors, root first, in an
//! ltree-style string. Parsing a stored path yields the ancestor chain
//! that grant and visibility lookups walk.
//!
//! # Examples
//!
//! ```
//! use folio_authz::path::ItemPath;
//! use folio_authz::types::ItemId;
//!
//! let root = ItemId::new();
//! let leaf = ItemId::new();
//! let path = ItemPath::root(root).child(leaf);
//!
//! let parsed = ItemPath::parse(path.as_str()).unwrap();
//! assert_eq!(parsed.ancestors(), &[root, leaf]);
//! ```

mod types;

#[cfg(test)]
mod tests;

pub use types::{ItemPath, PathError, PathResult, SEPARATOR};
