//! Test suite for the path module
//!
//! Tests cover:
//! - Encoding and parsing
//! - Ancestor relationships
//! - Serde form

use super::*;
use crate::types::ItemId;
use std::str::FromStr;

fn three_level_path() -> (ItemId, ItemId, ItemId, ItemPath) {
    let (a, b, c) = (ItemId::new(), ItemId::new(), ItemId::new());
    let path = ItemPath::root(a).child(b).child(c);
    (a, b, c, path)
}

// ============================================================================
// ItemPath Tests
// ============================================================================

#[test]
fn test_encoded_form_roundtrips() {
    let (a, b, c, path) = three_level_path();

    let parsed = ItemPath::from_str(path.as_str()).unwrap();
    assert_eq!(parsed, path);
    assert_eq!(parsed.ancestors(), &[a, b, c]);
    assert_eq!(path.as_str().matches(SEPARATOR).count(), 2);
}

#[test]
fn test_accepts_unhyphenated_segments() {
    let id = ItemId::new();
    let simple = id.0.simple().to_string();
    let path = ItemPath::parse(&simple).unwrap();
    assert_eq!(path.leaf(), id);
}

#[test]
fn test_ancestor_relationships() {
    let (a, b, _, leaf) = three_level_path();
    let root = ItemPath::root(a);
    let middle = root.child(b);

    assert!(root.is_ancestor_of(&leaf));
    assert!(middle.is_ancestor_of(&leaf));
    assert!(leaf.is_descendant_of(&root));
    assert!(!leaf.is_ancestor_of(&root));
    assert!(!leaf.is_ancestor_of(&leaf));
}

#[test]
fn test_sibling_is_not_ancestor() {
    let root = ItemPath::root(ItemId::new());
    let left = root.child(ItemId::new());
    let right = root.child(ItemId::new());
    assert!(!left.is_ancestor_of(&right.child(ItemId::new())));
}

#[test]
fn test_serde_as_string() {
    let (_, _, _, path) = three_level_path();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, format!("\"{}\"", path.as_str()));

    let back: ItemPath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);

    assert!(serde_json::from_str::<ItemPath>("\"\"").is_err());
}
