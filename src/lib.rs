//! Timeline Engine
//!
//! Time-axis layout for timeline widgets: maps time to pixels, keeps a
//! canvas window around the viewport, stacks items into lanes per group,
//! zooms around an anchor and runs the drag/resize interaction.
//!
//! The core is pure. [`state::TimelineState`] owns the time window and the
//! current [`view_state::stacking::Layout`] and returns
//! [`state::TimelineEvent`]s instead of calling back into renderers.

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod state;
pub mod view_state;
