//! Core view-state types: time windows and pixel rectangles.

use crate::model::error::InvalidTimeRange;
use crate::view_state::coordinates;
use serde::{Deserialize, Serialize};

pub use crate::model::{DurationMillis, EpochMillis};

/// The time span currently shown in the viewport.
///
/// Invariant: `start < end`, enforced by [`VisibleRange::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleRange {
    /// First visible instant.
    #[serde(rename = "visible_time_start")]
    start: EpochMillis,
    /// End of the visible span (exclusive).
    #[serde(rename = "visible_time_end")]
    end: EpochMillis,
}

impl VisibleRange {
    /// Smart constructor that validates `start < end`.
    pub fn try_new(start: EpochMillis, end: EpochMillis) -> Result<Self, InvalidTimeRange> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(InvalidTimeRange { start, end })
        }
    }

    /// Construct from a start and a positive zoom width.
    ///
    /// A non-positive zoom is raised to 1 ms.
    pub fn from_start(start: EpochMillis, zoom: DurationMillis) -> Self {
        Self {
            start,
            end: start.saturating_add(zoom.max(1)),
        }
    }

    /// First visible instant.
    pub fn start(&self) -> EpochMillis {
        self.start
    }

    /// End of the visible span (exclusive).
    pub fn end(&self) -> EpochMillis {
        self.end
    }

    /// Width of the span in ms. Always positive.
    pub fn zoom(&self) -> DurationMillis {
        self.end.saturating_sub(self.start)
    }

    /// Same zoom, new start.
    pub fn shifted_to(&self, start: EpochMillis) -> Self {
        Self::from_start(start, self.zoom())
    }
}

/// Absolute limits the visible range may not leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    /// Earliest permitted visible start.
    pub min: EpochMillis,
    /// Latest permitted visible end.
    pub max: EpochMillis,
}

impl TimeBounds {
    /// Smart constructor that validates `min < max`.
    pub fn new(min: EpochMillis, max: EpochMillis) -> Result<Self, InvalidTimeRange> {
        if min < max {
            Ok(Self { min, max })
        } else {
            Err(InvalidTimeRange {
                start: min,
                end: max,
            })
        }
    }
}

/// The rendered time range: three viewport widths centered on the visible range.
///
/// Invariant: `canvas_time_start < canvas_time_end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasWindow {
    /// Time at canvas pixel 0.
    pub canvas_time_start: EpochMillis,
    /// Time at the right edge of the canvas.
    pub canvas_time_end: EpochMillis,
    /// Viewport width in px; the canvas is three times wider.
    pub width: f64,
}

impl CanvasWindow {
    /// Canvas centered on `visible`, one zoom width of margin on each side.
    pub fn from_visible(visible: &VisibleRange, width: f64) -> Self {
        let (canvas_time_start, canvas_time_end) =
            coordinates::canvas_boundaries_from_visible(visible.start(), visible.end());
        Self {
            canvas_time_start,
            canvas_time_end,
            width,
        }
    }

    /// Canvas width in px.
    pub fn canvas_width(&self) -> f64 {
        coordinates::canvas_width(self.width)
    }

    /// Horizontal canvas offset of `time`.
    pub fn time_to_x(&self, time: EpochMillis) -> f64 {
        coordinates::time_to_x(
            self.canvas_time_start,
            self.canvas_time_end,
            self.canvas_width(),
            time,
        )
    }

    /// Time at canvas offset `x`.
    pub fn x_to_time(&self, x: f64) -> EpochMillis {
        coordinates::x_to_time(
            self.canvas_time_start,
            self.canvas_time_end,
            self.canvas_width(),
            x,
        )
    }

    /// Milliseconds per canvas pixel.
    pub fn time_per_pixel(&self) -> f64 {
        coordinates::time_per_pixel(
            self.canvas_time_start,
            self.canvas_time_end,
            self.canvas_width(),
        )
    }

    /// Whether `range` lies entirely inside the canvas.
    pub fn contains_range(&self, range: &VisibleRange) -> bool {
        range.start() >= self.canvas_time_start && range.end() <= self.canvas_time_end
    }

    /// Whether `time` lies inside the canvas (both edges inclusive).
    pub fn contains_time(&self, time: EpochMillis) -> bool {
        time >= self.canvas_time_start && time <= self.canvas_time_end
    }
}

/// Pixel rectangle of an item, relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    /// Canvas x of the left edge.
    pub left: f64,
    /// Canvas y of the top edge.
    pub top: f64,
    /// Width in px, at least 1.
    pub width: f64,
    /// Height in px.
    pub height: f64,
}
