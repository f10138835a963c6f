//! Visibility markers and their aggregation over an ancestor chain
//!
//! Markers are collected as a union over the whole chain, not resolved
//! closest-wins: a `Hidden` marker anywhere above an item hides it even when
//! a nearer ancestor is `Public`.

use crate::error::Result;
use crate::permission::PermissionLevel;
use crate::types::{Item, ItemId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Tag attached to an item, affecting it and all its descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityMarker {
    Public,
    Hidden,
}

/// Aggregated visibility of one item. Both flags may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    pub is_public: bool,
    pub is_hidden: bool,
}

impl Visibility {
    /// Fold the marker kinds found on an item-or-ancestor chain
    pub fn aggregate<'a, I>(markers: I) -> Self
    where
        I: IntoIterator<Item = &'a VisibilityMarker>,
    {
        markers.into_iter().fold(Self::default(), |mut acc, marker| {
            match marker {
                VisibilityMarker::Public => acc.is_public = true,
                VisibilityMarker::Hidden => acc.is_hidden = true,
            }
            acc
        })
    }

    /// Lowest grant level that allows any access at all
    pub fn minimum_level_for_any_access(&self) -> PermissionLevel {
        if self.is_hidden {
            PermissionLevel::Write
        } else {
            PermissionLevel::Read
        }
    }

    /// Whether an account without a grant may read
    pub fn grants_implicit_read(&self) -> bool {
        self.is_public && !self.is_hidden
    }
}

/// Source of visibility markers for items and their ancestors
///
/// Implementations must return the union of marker kinds found on every
/// node of the chain.
#[async_trait]
pub trait VisibilitySource: Send + Sync {
    /// Marker kinds on `item` or any of its ancestors
    async fn for_item(&self, item: &Item) -> Result<HashSet<VisibilityMarker>>;

    /// Bulk variant. Items the source cannot resolve are left out of the map.
    async fn for_items(&self, items: &[Item]) -> HashMap<ItemId, HashSet<VisibilityMarker>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers() {
        let visibility = Visibility::aggregate(&HashSet::<VisibilityMarker>::new());
        assert_eq!(visibility, Visibility::default());
        assert_eq!(visibility.minimum_level_for_any_access(), PermissionLevel::Read);
        assert!(!visibility.grants_implicit_read());
    }

    #[test]
    fn test_public_only() {
        let visibility = Visibility::aggregate(&[VisibilityMarker::Public]);
        assert!(visibility.is_public);
        assert!(!visibility.is_hidden);
        assert!(visibility.grants_implicit_read());
        assert_eq!(visibility.minimum_level_for_any_access(), PermissionLevel::Read);
    }

    #[test]
    fn test_hidden_wins_over_public() {
        let markers = [VisibilityMarker::Public, VisibilityMarker::Hidden];
        let visibility = Visibility::aggregate(&markers);
        assert!(visibility.is_public);
        assert!(visibility.is_hidden);
        assert!(!visibility.grants_implicit_read());
        assert_eq!(visibility.minimum_level_for_any_access(), PermissionLevel::Write);
    }

    #[test]
    fn test_duplicate_markers() {
        let markers = vec![VisibilityMarker::Hidden, VisibilityMarker::Hidden];
        let visibility = Visibility::aggregate(&markers);
        assert!(visibility.is_hidden);
        assert!(!visibility.is_public);
    }
}
