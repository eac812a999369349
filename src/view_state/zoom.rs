//! Zoom controller: anchor-preserving rescaling with min/max clamping.

use crate::model::{DurationMillis, TimelineError};
use crate::view_state::types::VisibleRange;
use serde::{Deserialize, Serialize};

/// One hour.
pub const DEFAULT_MIN_ZOOM: DurationMillis = 60 * 60 * 1000;

/// Five average years (5 × 365.24 days).
pub const DEFAULT_MAX_ZOOM: DurationMillis = 157_783_680_000;

/// Wheel delta that, at speed 1, changes the zoom by 100%.
const WHEEL_DELTA_PER_UNIT_SCALE: f64 = 500.0;

/// Permitted visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomLimits {
    min_zoom: DurationMillis,
    max_zoom: DurationMillis,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    /// Smart constructor: requires `0 < min_zoom <= max_zoom`.
    pub fn new(min_zoom: DurationMillis, max_zoom: DurationMillis) -> Result<Self, TimelineError> {
        if min_zoom <= 0 || min_zoom > max_zoom {
            return Err(TimelineError::InvalidZoomLimits {
                min: min_zoom,
                max: max_zoom,
            });
        }
        Ok(Self { min_zoom, max_zoom })
    }

    /// Smallest visible span.
    pub fn min_zoom(&self) -> DurationMillis {
        self.min_zoom
    }

    /// Largest visible span.
    pub fn max_zoom(&self) -> DurationMillis {
        self.max_zoom
    }

    /// Clamp a span into the limits.
    pub fn clamp(&self, zoom: DurationMillis) -> DurationMillis {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

/// Rescale `range` by `scale`, keeping the time under `anchor_ratio` fixed.
///
/// `anchor_ratio` is the anchor's position across the viewport: 0 keeps the start,
/// 1 keeps the end, 0.5 zooms around the center. It is clamped to `[0, 1]`.
/// A non-finite scale leaves the zoom unchanged.
pub fn change_zoom(
    range: VisibleRange,
    scale: f64,
    anchor_ratio: f64,
    limits: &ZoomLimits,
) -> VisibleRange {
    let zoom = range.zoom();
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let anchor = if anchor_ratio.is_finite() {
        anchor_ratio.clamp(0.0, 1.0)
    } else {
        0.5
    };

    let requested = (zoom as f64 * scale).round() as i64;
    let new_zoom = limits.clamp(requested);
    if new_zoom != requested {
        tracing::trace!(requested, new_zoom, "zoom clamped");
    }

    let new_start = range
        .start()
        .saturating_add(((zoom - new_zoom) as f64 * anchor).round() as i64);
    VisibleRange::from_start(new_start, new_zoom)
}

/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelModifiers {
    /// Control key.
    pub ctrl: bool,
    /// Meta / command key.
    pub meta: bool,
    /// Alt / option key.
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
}

impl WheelModifiers {
    /// Zoom speed for these modifiers, or `None` when the wheel should not zoom.
    ///
    /// Ctrl zooms fastest (10), then meta (3), then alt (1).
    pub fn zoom_speed(&self) -> Option<f64> {
        if self.ctrl {
            Some(10.0)
        } else if self.meta {
            Some(3.0)
        } else if self.alt {
            Some(1.0)
        } else {
            None
        }
    }
}

/// Zoom scale for a wheel event: `1 + speed × delta_y / 500`.
pub fn wheel_zoom_scale(delta_y: f64, speed: f64) -> f64 {
    1.0 + speed * delta_y / WHEEL_DELTA_PER_UNIT_SCALE
}

/// Zoom scale for a pinch: previous finger distance over current distance.
///
/// Spreading the fingers gives a scale below 1 (zoom in).
pub fn pinch_zoom_scale(previous_distance: f64, current_distance: f64) -> f64 {
    if current_distance <= 0.0 || !current_distance.is_finite() {
        return 1.0;
    }
    previous_distance / current_distance
}
