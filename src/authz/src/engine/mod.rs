//! Permission engine
//!
//! Answers "may this account act on this item at this level?" for one item
//! or for a batch, from the closest grant and the aggregated visibility.
//!
//! ```text
//! decide / decide_many
//!     ├── GrantResolver::closest(_many)   ┐ fetched concurrently
//!     ├── VisibilitySource::for_item(s)   ┘
//!     └── evaluate (pure, per item) ──→ grant | DecisionError
//! ```

pub mod decision;
pub mod metrics;

pub use decision::{evaluate, BatchOutcome};
pub use metrics::{DecisionCounts, EngineMetrics, MetricsCollector};

use crate::config::EngineConfig;
use crate::error::{AuthzError, Result};
use crate::grant::{BatchResult, GrantResolver};
use crate::permission::PermissionLevel;
use crate::types::{Account, Grant, Item, ItemId};
use crate::visibility::{Visibility, VisibilitySource};

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Prefetched inputs for one item of a batch
struct PendingItem {
    item_id: ItemId,
    /// `None` when the grant resolver returned nothing for the item
    grant: Option<Option<Grant>>,
    /// `None` when the visibility source returned nothing for the item
    visibility: Option<Visibility>,
}

impl PendingItem {
    fn evaluate(self, requested: PermissionLevel) -> (ItemId, Result<Option<Grant>>) {
        let result = match (self.grant, self.visibility) {
            (Some(grant), Some(visibility)) => {
                evaluate(self.item_id, grant, visibility, requested).map_err(AuthzError::from)
            }
            _ => Err(AuthzError::ItemNotFound(self.item_id)),
        };
        (self.item_id, result)
    }
}

/// Hierarchical permission and visibility engine
///
/// Holds no mutable state of its own; share it behind an `Arc` and call it
/// from any number of tasks.
pub struct PermissionEngine {
    grants: Arc<dyn GrantResolver>,
    visibility: Arc<dyn VisibilitySource>,
    metrics: Option<Arc<MetricsCollector>>,
    config: EngineConfig,
}

impl PermissionEngine {
    /// Create an engine over the given collaborators
    pub fn new(
        config: EngineConfig,
        grants: Arc<dyn GrantResolver>,
        visibility: Arc<dyn VisibilitySource>,
    ) -> Result<Self> {
        config.validate()?;

        let metrics = config
            .enable_metrics
            .then(|| Arc::new(MetricsCollector::new()));

        info!(
            metrics = config.enable_metrics,
            parallel_batch_threshold = config.parallel_batch_threshold,
            "PermissionEngine initialized"
        );

        Ok(Self {
            grants,
            visibility,
            metrics,
            config,
        })
    }

    /// Decide a single item
    ///
    /// Returns the grant that justifies access, or `None` when the item is
    /// readable through public visibility alone. Resolver failures are
    /// returned unchanged.
    pub async fn decide(
        &self,
        account: &Account,
        item: &Item,
        requested: PermissionLevel,
    ) -> Result<Option<Grant>> {
        let start = Instant::now();

        let result = self.decide_inner(account, item, requested).await;

        match &result {
            Ok(grant) => debug!(
                account = %account.id,
                item = %item.id,
                %requested,
                explicit = grant.is_some(),
                "Access granted"
            ),
            Err(AuthzError::Decision(e)) if !e.is_denial() => error!(
                account = %account.id,
                item = %item.id,
                error = %e,
                "Corrupt grant data"
            ),
            Err(e) => debug!(
                account = %account.id,
                item = %item.id,
                %requested,
                error = %e,
                "Access refused"
            ),
        }

        if let Some(metrics) = &self.metrics {
            metrics
                .record_decision(DecisionCounts::from_result(&result), start.elapsed())
                .await;
        }

        result
    }

    async fn decide_inner(
        &self,
        account: &Account,
        item: &Item,
        requested: PermissionLevel,
    ) -> Result<Option<Grant>> {
        let (grant, markers) = tokio::try_join!(
            self.grants.closest(account, item),
            self.visibility.for_item(item),
        )?;

        let visibility = Visibility::aggregate(&markers);
        Ok(evaluate(item.id, grant, visibility, requested)?)
    }

    /// Decide many items at one requested level
    ///
    /// Never fails as a whole. Granted items land in `data`; every refusal or
    /// lookup failure is one entry in `errors`. Resolver failures come first,
    /// in resolver order, then per-item outcomes in input order. Repeated ids
    /// are decided once.
    ///
    /// Batches of at least `parallel_batch_threshold` items are evaluated on
    /// the rayon pool from a blocking task, so the caller's worker is not
    /// held while they run.
    pub async fn decide_many(
        &self,
        account: &Account,
        items: &[Item],
        requested: PermissionLevel,
    ) -> BatchOutcome {
        if items.is_empty() {
            return BatchOutcome::new();
        }

        let start = Instant::now();

        let mut seen = HashSet::with_capacity(items.len());
        let unique: Vec<Item> = items
            .iter()
            .filter(|item| seen.insert(item.id))
            .cloned()
            .collect();

        let (grants, markers) = tokio::join!(
            self.grants.closest_many(account, &unique),
            self.visibility.for_items(&unique),
        );

        let BatchResult { data: mut grant_data, errors } = grants;

        // Items absent from the resolver's data are already reported in its
        // errors, either by id or by an error that names no item.
        let reported: HashSet<ItemId> = errors.iter().filter_map(AuthzError::item_id).collect();
        let unkeyed_failure = errors.iter().any(|e| e.item_id().is_none());

        let pending: Vec<PendingItem> = unique
            .iter()
            .filter_map(|item| {
                let grant = grant_data.remove(&item.id);
                if grant.is_none() && (unkeyed_failure || reported.contains(&item.id)) {
                    return None;
                }
                Some(PendingItem {
                    item_id: item.id,
                    grant,
                    visibility: markers.get(&item.id).map(Visibility::aggregate),
                })
            })
            .collect();

        let parallel = pending.len() >= self.config.parallel_batch_threshold;
        let results: Vec<(ItemId, Result<Option<Grant>>)> = if parallel {
            tokio::task::spawn_blocking(move || {
                pending
                    .into_par_iter()
                    .map(|p| p.evaluate(requested))
                    .collect::<Vec<_>>()
            })
            .await
            .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))
        } else {
            pending.into_iter().map(|p| p.evaluate(requested)).collect()
        };

        let mut outcome = BatchOutcome {
            data: HashMap::with_capacity(results.len()),
            errors,
        };

        for (item_id, result) in results {
            match result {
                Ok(grant) => {
                    outcome.data.insert(item_id, grant);
                }
                Err(e) => {
                    if let AuthzError::Decision(d) = &e {
                        if !d.is_denial() {
                            error!(account = %account.id, item = %item_id, error = %d, "Corrupt grant data");
                        }
                    }
                    outcome.errors.push(e);
                }
            }
        }

        info!(
            account = %account.id,
            %requested,
            items = unique.len(),
            granted = outcome.data.len(),
            refused = outcome.errors.len(),
            parallel,
            "Batch decision complete"
        );

        if let Some(metrics) = &self.metrics {
            metrics
                .record_batch(DecisionCounts::from_batch(&outcome), start.elapsed())
                .await;
        }

        outcome
    }

    /// Items from `items` the account may access at `requested`, in input
    /// order without repeats
    pub async fn accessible_items(
        &self,
        account: &Account,
        items: &[Item],
        requested: PermissionLevel,
    ) -> Vec<Item> {
        let outcome = self.decide_many(account, items, requested).await;
        let mut seen = HashSet::with_capacity(outcome.data.len());

        items
            .iter()
            .filter(|item| outcome.data.contains_key(&item.id) && seen.insert(item.id))
            .cloned()
            .collect()
    }

    /// Get engine metrics
    pub async fn get_metrics(&self) -> Option<EngineMetrics> {
        match &self.metrics {
            Some(metrics) => Some(metrics.get_metrics().await),
            None => None,
        }
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
