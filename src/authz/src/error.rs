//! Error types for the permission engine

use crate::path::PathError;
use crate::permission::PermissionLevel;
use crate::types::{AccountId, ItemId};
use thiserror::Error;

/// Outcome of a refused or faulted authorization decision.
///
/// The first three kinds mean "request understood, access refused". The
/// fourth is a data-integrity fault and must never be read as a denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// No grant exists on the item chain, or a read failed the hidden gate
    #[error("Member cannot access item {item_id}")]
    MemberCannotAccess { item_id: ItemId },

    /// Write was requested and the grant is below write
    #[error("Member cannot write item {item_id}")]
    MemberCannotWriteItem { item_id: ItemId },

    /// Admin was requested and the grant is below admin
    #[error("Member cannot administer item {item_id}")]
    MemberCannotAdminItem { item_id: ItemId },

    /// The resolved grant carries a permission outside the lattice
    #[error("Unknown permission '{value}' on grant for item {item_id}")]
    UnknownPermission { item_id: ItemId, value: String },
}

impl DecisionError {
    /// Level-specific refusal for a grant that exists but falls short
    pub fn for_level(requested: PermissionLevel, item_id: ItemId) -> Self {
        match requested {
            PermissionLevel::Read => Self::MemberCannotAccess { item_id },
            PermissionLevel::Write => Self::MemberCannotWriteItem { item_id },
            PermissionLevel::Admin => Self::MemberCannotAdminItem { item_id },
        }
    }

    /// Whether this is one of the three access refusals
    pub fn is_denial(&self) -> bool {
        !matches!(self, Self::UnknownPermission { .. })
    }

    /// Item the decision was made for
    pub fn item_id(&self) -> ItemId {
        match self {
            Self::MemberCannotAccess { item_id }
            | Self::MemberCannotWriteItem { item_id }
            | Self::MemberCannotAdminItem { item_id }
            | Self::UnknownPermission { item_id, .. } => *item_id,
        }
    }
}

/// Permission engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Access refused or grant data corrupt
    #[error(transparent)]
    Decision(#[from] DecisionError),

    /// Item is unknown to the tree store
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// A second grant for the same account and item
    #[error("Grant already exists for account {account_id} on item {item_id}")]
    DuplicateGrant { account_id: AccountId, item_id: ItemId },

    /// Malformed materialized path
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backing store failure
    #[error("Store error: {0}")]
    Store(String),
}

impl AuthzError {
    /// Item the error refers to, if any
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Decision(e) => Some(e.item_id()),
            Self::ItemNotFound(id) => Some(*id),
            Self::DuplicateGrant { item_id, .. } => Some(*item_id),
            Self::InvalidPath(_) | Self::Config(_) | Self::Store(_) => None,
        }
    }

    /// The decision error, if this is one
    pub fn as_decision(&self) -> Option<&DecisionError> {
        match self {
            Self::Decision(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for permission engine operations
pub type Result<T> = std::result::Result<T, AuthzError>;
