//! Closest-grant resolution contract

use crate::error::{AuthzError, Result};
use crate::types::{Account, Grant, Item, ItemId};
use async_trait::async_trait;
use std::collections::HashMap;

/// Per-item results of a bulk operation
///
/// Every item lands in exactly one of `data` or `errors`.
#[derive(Debug)]
pub struct BatchResult<T> {
    pub data: HashMap<ItemId, T>,
    pub errors: Vec<AuthzError>,
}

impl<T> BatchResult<T> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Whether the batch holds neither successes nor failures
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.errors.is_empty()
    }

    /// Number of entries across `data` and `errors`
    pub fn len(&self) -> usize {
        self.data.len() + self.errors.len()
    }

    /// Whether `item_id` was recorded as a failure
    pub fn failed(&self, item_id: &ItemId) -> bool {
        self.errors.iter().any(|e| e.item_id().as_ref() == Some(item_id))
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the grant that governs an account's access to an item
///
/// Grants are inherited closest-wins: among the grants the account holds on
/// the item or any ancestor, the one on the deepest node applies, even when
/// a grant higher up is more permissive.
#[async_trait]
pub trait GrantResolver: Send + Sync {
    /// Closest grant on `item` or its ancestors, `None` if there is none
    async fn closest(&self, account: &Account, item: &Item) -> Result<Option<Grant>>;

    /// Bulk variant
    ///
    /// Each distinct item either has an entry in `data` or is covered by one
    /// error in `errors`. An error should name its item; a backend error that
    /// names none covers every item missing from `data`.
    async fn closest_many(&self, account: &Account, items: &[Item]) -> BatchResult<Option<Grant>>;
}
