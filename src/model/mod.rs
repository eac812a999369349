//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod group;
pub mod identifiers;
pub mod item;
pub mod keys;
pub mod malformed_record;

/// Absolute time in milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// A span of time in milliseconds.
pub type DurationMillis = i64;

// Re-export for convenience
pub use error::{InvalidTimeRange, ParseError, TimelineError, ValidatorError};
pub use group::{Group, GroupOrders};
pub use identifiers::{GroupId, InvalidGroupId, InvalidItemId, ItemId};
pub use item::{Item, ItemCapabilities, ResizeCapability, ResizeEdge};
pub use keys::Keys;
pub use malformed_record::{MalformedRecord, RecordKind};
