//! Identifier newtypes with smart constructors.
//!
//! Both identifiers validate non-empty strings at construction time.
//! Numeric ids in JSON input are converted to their decimal string form by the parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an item id is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("item id must not be empty")]
pub struct InvalidItemId;

/// Error returned when a group id is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("group id must not be empty")]
pub struct InvalidGroupId;

/// Unique identifier of a timeline item.
///
/// Ordered so that derived geometry maps iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Smart constructor: rejects empty ids.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidItemId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidItemId)
        } else {
            Ok(Self(raw))
        }
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = InvalidItemId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a group (row).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    /// Smart constructor: rejects empty ids.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidGroupId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidGroupId)
        } else {
            Ok(Self(raw))
        }
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupId {
    type Error = InvalidGroupId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<GroupId> for String {
    fn from(id: GroupId) -> Self {
        id.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
