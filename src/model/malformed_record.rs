//! Records that could not be parsed.
//!
//! The parser keeps going past a bad record and reports it here instead.

use crate::model::error::ParseError;
use serde::Serialize;

/// Which collection a malformed record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A group record.
    Group,
    /// An item record.
    Item,
}

/// A group or item record that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    kind: RecordKind,
    index: usize,
    error: ParseError,
}

impl MalformedRecord {
    /// Create a new malformed record.
    ///
    /// # Arguments
    ///
    /// * `kind` - Collection the record came from
    /// * `index` - Zero-based position in that collection
    /// * `error` - Why it was rejected
    pub fn new(kind: RecordKind, index: usize, error: ParseError) -> Self {
        Self { kind, index, error }
    }

    /// Collection the record came from.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Position in its collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The parse failure.
    pub fn error(&self) -> &ParseError {
        &self.error
    }

    /// Human-readable error message.
    pub fn error_message(&self) -> String {
        self.error.to_string()
    }
}
