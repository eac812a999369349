//! Canvas window management.
//!
//! The canvas is laid out once for a span three times the visible range so that
//! small pans only move the viewport. It is recentered when the visible range
//! leaves it, or when the caller forces a recompute.

use crate::view_state::stacking::Layout;
use crate::view_state::types::{CanvasWindow, TimeBounds, VisibleRange};

/// Result of [`compute_canvas_window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasUpdate {
    /// The accepted visible range.
    pub visible: VisibleRange,
    /// The canvas to render into.
    pub canvas: CanvasWindow,
    /// Whether the canvas moved and items must be re-stacked.
    pub recentered: bool,
}

/// Result of [`calculate_scroll_canvas`]: the window plus a fresh layout when
/// the canvas was recentered.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasOutcome {
    /// The accepted visible range.
    pub visible: VisibleRange,
    /// The canvas to render into.
    pub canvas: CanvasWindow,
    /// New geometry. `None` means the previous layout is still valid.
    pub layout: Option<Layout>,
}

/// Decide whether `proposed` fits the current canvas or the canvas must move.
///
/// Keeps the canvas when the proposed range lies inside it and `force_update`
/// is false. Otherwise centers a new canvas on the proposed range.
pub fn compute_canvas_window(
    proposed: VisibleRange,
    current: &CanvasWindow,
    force_update: bool,
) -> CanvasUpdate {
    if !force_update && current.contains_range(&proposed) {
        return CanvasUpdate {
            visible: proposed,
            canvas: *current,
            recentered: false,
        };
    }

    let canvas = CanvasWindow::from_visible(&proposed, current.width);
    tracing::debug!(
        canvas_start = canvas.canvas_time_start,
        canvas_end = canvas.canvas_time_end,
        force_update,
        "canvas recentered"
    );
    CanvasUpdate {
        visible: proposed,
        canvas,
        recentered: true,
    }
}

/// Shift `range` back inside `bounds`, keeping its zoom.
///
/// A range wider than the bounds becomes exactly `[min, max]`.
pub fn clamp_to_bounds(range: VisibleRange, bounds: Option<TimeBounds>) -> VisibleRange {
    let Some(bounds) = bounds else {
        return range;
    };

    let below = range.start() < bounds.min;
    let above = range.end() > bounds.max;
    match (below, above) {
        (true, true) => VisibleRange::from_start(bounds.min, bounds.max.saturating_sub(bounds.min)),
        (true, false) => {
            tracing::trace!(start = range.start(), min = bounds.min, "visible range clamped to lower bound");
            let shifted = range.shifted_to(bounds.min);
            if shifted.end() > bounds.max {
                VisibleRange::from_start(bounds.min, bounds.max.saturating_sub(bounds.min))
            } else {
                shifted
            }
        }
        (false, true) => {
            tracing::trace!(end = range.end(), max = bounds.max, "visible range clamped to upper bound");
            let shifted = range.shifted_to(bounds.max.saturating_sub(range.zoom()));
            if shifted.start() < bounds.min {
                VisibleRange::from_start(bounds.min, bounds.max.saturating_sub(bounds.min))
            } else {
                shifted
            }
        }
        (false, false) => range,
    }
}

/// [`compute_canvas_window`] followed by a re-stack when the canvas moved.
pub fn calculate_scroll_canvas(
    proposed: VisibleRange,
    current: &CanvasWindow,
    force_update: bool,
    stack: impl FnOnce(&CanvasWindow) -> Layout,
) -> CanvasOutcome {
    let update = compute_canvas_window(proposed, current, force_update);
    let layout = update.recentered.then(|| stack(&update.canvas));
    CanvasOutcome {
        visible: update.visible,
        canvas: update.canvas,
        layout,
    }
}
