//! Error types for the timeline engine.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`TimelineError`] - Top-level engine error
//!   - [`InvalidTimeRange`] - A range whose start is not before its end
//!   - [`ValidatorError`] - Failure reported by a caller-supplied move/resize validator
//! - [`ParseError`] - Malformed item or group records in JSON input
//!
//! # Error Recovery Strategy
//!
//! Construction errors are fatal: an engine without a time range cannot lay anything out.
//! Parse errors are **non-fatal**: the malformed record is reported and skipped, and the
//! rest of the document is still laid out. Validator errors abort the current pointer
//! event but leave the engine usable.

use crate::model::EpochMillis;
use std::error::Error as StdError;
use thiserror::Error;

/// Top-level engine error.
///
/// Returned from engine construction and from interaction operations that consult the
/// caller's validator.
///
/// # Examples
///
/// ```
/// use timeline_engine::model::error::{InvalidTimeRange, TimelineError};
///
/// let err: TimelineError = InvalidTimeRange { start: 10, end: 5 }.into();
/// assert!(err.to_string().contains("10"));
/// ```
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Neither a visible range nor a default range was supplied.
    ///
    /// **When this occurs**: At construction. The engine needs a starting window to
    /// compute a canvas.
    ///
    /// **Recovery**: None. Supply `visible_time_start`/`visible_time_end` or
    /// `default_time_start`/`default_time_end`.
    #[error("no visible time range: supply a visible range or a default range")]
    MissingTimeRange,

    /// A supplied range was empty or inverted.
    #[error(transparent)]
    InvalidTimeRange(#[from] InvalidTimeRange),

    /// `min_zoom` exceeds `max_zoom`, or one of them is not positive.
    ///
    /// **When this occurs**: At construction or on a configuration change.
    #[error("invalid zoom limits: min_zoom {min} must be positive and not exceed max_zoom {max}")]
    InvalidZoomLimits {
        /// Configured minimum visible span, in ms.
        min: i64,
        /// Configured maximum visible span, in ms.
        max: i64,
    },

    /// A geometry option is out of range.
    ///
    /// **When this occurs**: At construction, for a non-positive `line_height`, an
    /// `item_height_ratio` outside `(0, 1]`, or a negative `min_resize_width` or
    /// `click_tolerance`. NaN is always rejected.
    #[error("invalid {option}: {value}")]
    InvalidOption {
        /// Configuration field name.
        option: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The caller's move/resize validator failed.
    ///
    /// **Recovery**: The pointer event that triggered validation is abandoned. On a
    /// release the interaction has already returned to idle; on a move the interaction
    /// stays active and the next move retries validation.
    #[error("move/resize validator failed: {0}")]
    Validator(#[from] ValidatorError),
}

/// A time range whose start is not strictly before its end.
///
/// # Examples
///
/// ```
/// use timeline_engine::model::error::InvalidTimeRange;
///
/// let err = InvalidTimeRange { start: 7, end: 7 };
/// assert_eq!(err.to_string(), "invalid time range: start 7 must be before end 7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid time range: start {start} must be before end {end}")]
pub struct InvalidTimeRange {
    /// Rejected start, ms since epoch.
    pub start: EpochMillis,
    /// Rejected end, ms since epoch.
    pub end: EpochMillis,
}

/// Failure raised by a caller-supplied validator.
///
/// Wraps the caller's own error so it can be recovered with [`ValidatorError::into_inner`]
/// or inspected through `source()`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ValidatorError(Box<dyn StdError + Send + Sync + 'static>);

impl ValidatorError {
    /// Wrap any error type.
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self(source.into())
    }

    /// Unwrap the caller's original error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

/// Errors encountered when reading item or group records from JSON.
///
/// Non-fatal per record: the parser turns them into
/// [`MalformedRecord`](crate::model::MalformedRecord)s and keeps going. Only a document
/// that is not a JSON object, or whose `groups`/`items` are not arrays, fails as a whole.
///
/// `record` is the zero-based index of the record in its array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The document or a record is not valid JSON of the expected shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use timeline_engine::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     record: 3,
    ///     message: "expected an object".to_string(),
    /// };
    /// assert!(err.to_string().contains("record 3"));
    /// ```
    #[error("Invalid JSON at record {record}: {message}")]
    InvalidJson {
        /// Index of the offending record.
        record: usize,
        /// Parser message.
        message: String,
    },

    /// A record lacks a required property.
    ///
    /// `field` is the configured property name from [`Keys`](crate::model::Keys), so a
    /// remapped key is reported under the caller's own name.
    #[error("Missing required field '{field}' at record {record}")]
    MissingField {
        /// Index of the offending record.
        record: usize,
        /// Name of the missing property.
        field: String,
    },

    /// A time property is neither an integer of milliseconds nor an RFC 3339 string.
    #[error("Invalid timestamp '{raw}' in field '{field}' at record {record}")]
    InvalidTimestamp {
        /// Index of the offending record.
        record: usize,
        /// Name of the time property.
        field: String,
        /// The rejected value, as written.
        raw: String,
    },

    /// An id or group reference is empty or not a string/number.
    #[error("Invalid identifier '{raw}' in field '{field}' at record {record}")]
    InvalidIdentifier {
        /// Index of the offending record.
        record: usize,
        /// Name of the id property.
        field: String,
        /// The rejected value, as written.
        raw: String,
    },
}
