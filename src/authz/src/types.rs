//! Core identity and grant types

use crate::error::DecisionError;
use crate::path::ItemPath;
use crate::permission::PermissionLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Unique item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Kind of account making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Member,
    Guest,
}

/// Account asking for access. Only the id matters for grant lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub kind: AccountKind,
}

impl Account {
    /// Create a member account with a fresh id
    pub fn member() -> Self {
        Self { id: AccountId::new(), kind: AccountKind::Member }
    }

    /// Create a guest account with a fresh id
    pub fn guest() -> Self {
        Self { id: AccountId::new(), kind: AccountKind::Guest }
    }
}

/// A node in the item tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    /// Materialized path from the root down to this item
    pub path: ItemPath,
}

impl Item {
    /// Create a root item
    pub fn root() -> Self {
        let id = ItemId::new();
        Self { id, path: ItemPath::root(id) }
    }

    /// Create a child of this item
    pub fn child(&self) -> Self {
        let id = ItemId::new();
        Self { id, path: self.path.child(id) }
    }

    /// Parent id, if this is not a root
    pub fn parent_id(&self) -> Option<ItemId> {
        self.path.parent().map(|p| p.leaf())
    }
}

/// Explicit permission held by an account on an item (a membership)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: Uuid,
    pub account_id: AccountId,
    pub item_id: ItemId,

    /// Stored permission value, parsed on demand
    pub permission: String,
}

impl Grant {
    pub fn new(account_id: AccountId, item_id: ItemId, level: PermissionLevel) -> Self {
        Self::with_raw_permission(account_id, item_id, level.as_str())
    }

    /// Build a grant from an unvalidated stored permission value
    pub fn with_raw_permission(
        account_id: AccountId,
        item_id: ItemId,
        permission: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            item_id,
            permission: permission.into(),
        }
    }

    /// Parse the stored permission into the lattice
    pub fn level(&self) -> Result<PermissionLevel, DecisionError> {
        self.permission
            .parse()
            .map_err(|_| DecisionError::UnknownPermission {
                item_id: self.item_id,
                value: self.permission.clone(),
            })
    }
}
