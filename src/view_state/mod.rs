//! View-state layer - Geometry, canvas windowing and zoom
//!
//! Pure functions that turn items, groups and a time window into pixel
//! geometry. Nothing here holds state between calls; `state::timeline`
//! composes these per event.
//!
//! # Module Structure
//!
//! - `types`: Core types (VisibleRange, CanvasWindow, Dimension, TimeBounds)
//! - `coordinates`: Time ↔ pixel mapping
//! - `canvas`: Canvas recentering and bounds clamping
//! - `stacking`: Lane assignment and the per-item Dimension map
//! - `zoom`: Anchor-preserving zoom with min/max limits
//! - `time_units`: Header units and calendar-aligned intervals
//! - `markers`: Today, custom and cursor marker placement

pub mod canvas;
pub mod coordinates;
pub mod markers;
pub mod stacking;
pub mod time_units;
pub mod types;
pub mod zoom;
