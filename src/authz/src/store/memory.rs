//! In-memory item tree with grants and visibility markers

use crate::error::{AuthzError, Result};
use crate::grant::{BatchResult, GrantResolver};
use crate::path::ItemPath;
use crate::types::{Account, AccountId, Grant, Item, ItemId};
use crate::visibility::{VisibilityMarker, VisibilitySource};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory tree store
///
/// Items are stored by id with their encoded path, as a database row would
/// hold them. Lookups trust the stored path, not the path on the `Item`
/// handed in by the caller.
pub struct InMemoryTree {
    items: Arc<RwLock<HashMap<ItemId, String>>>,
    grants: Arc<RwLock<HashMap<(AccountId, ItemId), Grant>>>,
    markers: Arc<RwLock<HashMap<ItemId, HashSet<VisibilityMarker>>>>,
}

impl InMemoryTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            grants: Arc::new(RwLock::new(HashMap::new())),
            markers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register an item. Its parent must already be present.
    pub async fn insert_item(&self, item: &Item) -> Result<()> {
        let mut items = self.items.write().await;

        if let Some(parent_id) = item.parent_id() {
            if !items.contains_key(&parent_id) {
                return Err(AuthzError::ItemNotFound(parent_id));
            }
        }

        items.insert(item.id, item.path.as_str().to_string());
        Ok(())
    }

    /// Store a grant
    ///
    /// At most one grant may exist per account and item, so closest-wins
    /// resolution never needs a tie-break.
    pub async fn add_grant(&self, grant: Grant) -> Result<()> {
        grant.level()?;
        self.import_grant(grant).await
    }

    /// Store a grant without validating its permission value
    ///
    /// Used when loading rows that were written by another system.
    pub async fn import_grant(&self, grant: Grant) -> Result<()> {
        if !self.items.read().await.contains_key(&grant.item_id) {
            return Err(AuthzError::ItemNotFound(grant.item_id));
        }

        let mut grants = self.grants.write().await;
        let key = (grant.account_id, grant.item_id);
        if grants.contains_key(&key) {
            return Err(AuthzError::DuplicateGrant {
                account_id: grant.account_id,
                item_id: grant.item_id,
            });
        }

        grants.insert(key, grant);
        Ok(())
    }

    /// Remove the grant an account holds directly on an item
    pub async fn revoke_grant(&self, account_id: AccountId, item_id: ItemId) -> Option<Grant> {
        self.grants.write().await.remove(&(account_id, item_id))
    }

    /// Attach a visibility marker to an item
    pub async fn add_marker(&self, item_id: ItemId, marker: VisibilityMarker) -> Result<()> {
        if !self.items.read().await.contains_key(&item_id) {
            return Err(AuthzError::ItemNotFound(item_id));
        }

        self.markers
            .write()
            .await
            .entry(item_id)
            .or_default()
            .insert(marker);
        Ok(())
    }

    /// Detach a visibility marker, returning whether it was present
    pub async fn remove_marker(&self, item_id: ItemId, marker: VisibilityMarker) -> bool {
        let mut markers = self.markers.write().await;
        match markers.get_mut(&item_id) {
            Some(set) => {
                let removed = set.remove(&marker);
                if set.is_empty() {
                    markers.remove(&item_id);
                }
                removed
            }
            None => false,
        }
    }

    fn chain_of(&self, items: &HashMap<ItemId, String>, item_id: ItemId) -> Result<Vec<ItemId>> {
        let raw = items.get(&item_id).ok_or(AuthzError::ItemNotFound(item_id))?;
        Ok(ItemPath::parse(raw)?.ancestors().to_vec())
    }

    fn closest_in(
        grants: &HashMap<(AccountId, ItemId), Grant>,
        account_id: AccountId,
        chain: &[ItemId],
    ) -> Option<Grant> {
        chain
            .iter()
            .rev()
            .find_map(|id| grants.get(&(account_id, *id)))
            .cloned()
    }

    fn union_in(
        markers: &HashMap<ItemId, HashSet<VisibilityMarker>>,
        chain: &[ItemId],
    ) -> HashSet<VisibilityMarker> {
        chain
            .iter()
            .filter_map(|id| markers.get(id))
            .flatten()
            .copied()
            .collect()
    }
}

impl Default for InMemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GrantResolver for InMemoryTree {
    async fn closest(&self, account: &Account, item: &Item) -> Result<Option<Grant>> {
        let chain = self.chain_of(&*self.items.read().await, item.id)?;
        let grant = Self::closest_in(&*self.grants.read().await, account.id, &chain);

        debug!(
            account = %account.id,
            item = %item.id,
            depth = chain.len(),
            found = grant.is_some(),
            "Resolved closest grant"
        );

        Ok(grant)
    }

    async fn closest_many(&self, account: &Account, items: &[Item]) -> BatchResult<Option<Grant>> {
        let stored = self.items.read().await;
        let grants = self.grants.read().await;
        let mut result = BatchResult::new();
        let mut seen = HashSet::with_capacity(items.len());

        for item in items.iter().filter(|item| seen.insert(item.id)) {
            match self.chain_of(&stored, item.id) {
                Ok(chain) => {
                    result
                        .data
                        .insert(item.id, Self::closest_in(&grants, account.id, &chain));
                }
                Err(e) => result.errors.push(e),
            }
        }

        result
    }
}

#[async_trait]
impl VisibilitySource for InMemoryTree {
    async fn for_item(&self, item: &Item) -> Result<HashSet<VisibilityMarker>> {
        let chain = self.chain_of(&*self.items.read().await, item.id)?;
        Ok(Self::union_in(&*self.markers.read().await, &chain))
    }

    async fn for_items(&self, items: &[Item]) -> HashMap<ItemId, HashSet<VisibilityMarker>> {
        let stored = self.items.read().await;
        let markers = self.markers.read().await;

        items
            .iter()
            .filter_map(|item| {
                let chain = self.chain_of(&stored, item.id).ok()?;
                Some((item.id, Self::union_in(&markers, &chain)))
            })
            .collect()
    }
}
