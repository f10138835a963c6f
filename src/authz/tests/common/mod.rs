//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use folio_authz::{
    Account, AuthzError, BatchResult, EngineConfig, Grant, GrantResolver, InMemoryTree, Item,
    ItemId, PermissionEngine, Result, VisibilityMarker, VisibilitySource,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Engine over a fresh in-memory tree
pub fn engine_with_tree(config: EngineConfig) -> (PermissionEngine, Arc<InMemoryTree>) {
    let tree = Arc::new(InMemoryTree::new());
    let engine = PermissionEngine::new(config, tree.clone(), tree.clone()).unwrap();
    (engine, tree)
}

/// Test double answering from fixed per-item tables
///
/// Items absent from both tables are reported as not found. Items marked
/// as store failures make the batch grant lookup report a backend error
/// that names no item.
#[derive(Default)]
pub struct FixedResolver {
    pub grants: HashMap<ItemId, Option<Grant>>,
    pub markers: HashMap<ItemId, HashSet<VisibilityMarker>>,
    pub store_failures: HashSet<ItemId>,
    pub calls: AtomicUsize,
}

impl FixedResolver {
    pub fn with_item(
        mut self,
        item: &Item,
        grant: Option<Grant>,
        markers: &[VisibilityMarker],
    ) -> Self {
        self.grants.insert(item.id, grant);
        self.markers.insert(item.id, markers.iter().copied().collect());
        self
    }

    pub fn with_store_failure(mut self, item: &Item) -> Self {
        self.store_failures.insert(item.id);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrantResolver for FixedResolver {
    async fn closest(&self, _account: &Account, item: &Item) -> Result<Option<Grant>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.grants
            .get(&item.id)
            .cloned()
            .ok_or(AuthzError::ItemNotFound(item.id))
    }

    async fn closest_many(&self, _account: &Account, items: &[Item]) -> BatchResult<Option<Grant>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut result = BatchResult::new();
        for item in items {
            if self.store_failures.contains(&item.id) {
                result
                    .errors
                    .push(AuthzError::Store(format!("row for {} unreadable", item.id)));
                continue;
            }
            match self.grants.get(&item.id) {
                Some(grant) => {
                    result.data.insert(item.id, grant.clone());
                }
                None => result.errors.push(AuthzError::ItemNotFound(item.id)),
            }
        }
        result
    }
}

#[async_trait]
impl VisibilitySource for FixedResolver {
    async fn for_item(&self, item: &Item) -> Result<HashSet<VisibilityMarker>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.markers
            .get(&item.id)
            .cloned()
            .ok_or(AuthzError::ItemNotFound(item.id))
    }

    async fn for_items(&self, items: &[Item]) -> HashMap<ItemId, HashSet<VisibilityMarker>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        items
            .iter()
            .filter_map(|item| Some((item.id, self.markers.get(&item.id)?.clone())))
            .collect()
    }
}

/// Engine over a fixed resolver, returning the resolver for call counting
pub fn engine_with_fixed(
    resolver: FixedResolver,
    config: EngineConfig,
) -> (PermissionEngine, Arc<FixedResolver>) {
    let resolver = Arc::new(resolver);
    let engine = PermissionEngine::new(config, resolver.clone(), resolver.clone()).unwrap();
    (engine, resolver)
}
