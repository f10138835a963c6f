//! # Folio Authorization Engine
//!
//! Hierarchical permission and visibility resolution for the item tree.
//!
//! ## Model
//!
//! - **Grants** are inherited closest-wins: the grant on the deepest node of
//!   an item's ancestor chain decides, even if it is less permissive than one
//!   higher up.
//! - **Visibility markers** (`Public`, `Hidden`) are unioned over the whole
//!   chain. `Hidden` anywhere requires a write grant for any access;
//!   `Public` lets accounts without a grant read.
//! - **Batches** report per-item success and failure; one refusal never
//!   hides another item's success.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use folio_authz::{
//!     Account, EngineConfig, Grant, InMemoryTree, Item, PermissionEngine, PermissionLevel,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tree = Arc::new(InMemoryTree::new());
//!     let folder = Item::root();
//!     let doc = folder.child();
//!     tree.insert_item(&folder).await?;
//!     tree.insert_item(&doc).await?;
//!
//!     let alice = Account::member();
//!     tree.add_grant(Grant::new(alice.id, folder.id, PermissionLevel::Write)).await?;
//!
//!     let engine = PermissionEngine::new(EngineConfig::default(), tree.clone(), tree)?;
//!
//!     let grant = engine.decide(&alice, &doc, PermissionLevel::Write).await?;
//!     assert_eq!(grant.map(|g| g.item_id), Some(folder.id));
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grant;
pub mod path;
pub mod permission;
pub mod store;
pub mod types;
pub mod visibility;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{evaluate, BatchOutcome, PermissionEngine};
pub use error::{AuthzError, DecisionError, Result};
pub use grant::{BatchResult, GrantResolver};
pub use path::{ItemPath, PathError};
pub use permission::PermissionLevel;
pub use store::InMemoryTree;
pub use types::{Account, AccountId, AccountKind, Grant, Item, ItemId};
pub use visibility::{Visibility, VisibilityMarker, VisibilitySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
