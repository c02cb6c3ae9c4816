//! Identity types for stored records

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of a `Category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

/// Primary key of a `Post`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl CategoryId {
    /// Returns the raw integer value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl PostId {
    /// Returns the raw integer value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two tables of the store.
///
/// The discriminant doubles as the on-disk entity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Category = 1,
    Post = 2,
}

impl EntityKind {
    /// On-disk tag byte
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Parses an on-disk tag byte
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(EntityKind::Category),
            2 => Some(EntityKind::Post),
            _ => None,
        }
    }

    /// Returns the table name
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Post => "post",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
