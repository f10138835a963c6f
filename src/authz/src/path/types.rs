//! Item path type definitions and validation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ItemId;

/// Separator between path segments
pub const SEPARATOR: char = '.';

/// Result type for path operations
pub type PathResult<T> = Result<T, PathError>;

/// Errors that can occur while parsing a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Empty path string provided
    Empty,
    /// A segment between two separators is empty
    EmptySegment,
    /// A segment does not decode to an item id
    InvalidSegment(String),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Path cannot be empty"),
            Self::EmptySegment => write!(f, "Path segment cannot be empty"),
            Self::InvalidSegment(seg) => write!(f, "Invalid path segment: '{}'", seg),
        }
    }
}

impl std::error::Error for PathError {}

/// Materialized path of an item
///
/// Segments are the ids of the item's ancestors, root first, with the item
/// itself last. Ids are written with `_` in place of `-` so the string stays
/// a valid ltree label sequence:
///
/// `0b7e..._41c2....3f9a..._77d0...`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemPath {
    /// Encoded path string
    raw: String,
    /// Decoded ancestor ids, root first
    segments: Vec<ItemId>,
}

impl ItemPath {
    /// Path of a root item
    pub fn root(id: ItemId) -> Self {
        Self {
            raw: encode_segment(id),
            segments: vec![id],
        }
    }

    /// Path of a direct child of this item
    pub fn child(&self, id: ItemId) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id);

        Self {
            raw: format!("{}{}{}", self.raw, SEPARATOR, encode_segment(id)),
            segments,
        }
    }

    /// Parses an encoded path string
    pub fn parse(s: &str) -> PathResult<Self> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }

        let segments = s
            .split(SEPARATOR)
            .map(decode_segment)
            .collect::<PathResult<Vec<_>>>()?;

        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }

    /// Id of the item this path points at
    pub fn leaf(&self) -> ItemId {
        // Construction guarantees at least one segment
        self.segments[self.segments.len() - 1]
    }

    /// Ancestor ids, root first, ending with the item itself
    pub fn ancestors(&self) -> &[ItemId] {
        &self.segments
    }

    /// Number of segments (a root has depth 1)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the encoded path string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parent path if it exists
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }

        let cut = self.raw.rfind(SEPARATOR)?;
        Some(Self {
            raw: self.raw[..cut].to_string(),
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether this path is a strict ancestor of `other`
    pub fn is_ancestor_of(&self, other: &ItemPath) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }

    /// Whether this path is a strict descendant of `other`
    pub fn is_descendant_of(&self, other: &ItemPath) -> bool {
        other.is_ancestor_of(self)
    }
}

fn encode_segment(id: ItemId) -> String {
    id.0.hyphenated().to_string().replace('-', "_")
}

fn decode_segment(segment: &str) -> PathResult<ItemId> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }

    if !segment.chars().all(|c| c.is_ascii_hexdigit() || c == '_') {
        return Err(PathError::InvalidSegment(segment.to_string()));
    }

    Uuid::parse_str(&segment.replace('_', "-"))
        .map(ItemId)
        .map_err(|_| PathError::InvalidSegment(segment.to_string()))
}

impl FromStr for ItemPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemPath {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ItemPath> for String {
    fn from(path: ItemPath) -> Self {
        path.raw
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
