//! Vertical marker lines: today, a fixed date, or the pointer position.

use crate::model::EpochMillis;
use crate::view_state::types::CanvasWindow;
use serde::{Deserialize, Serialize};

/// A marker to place on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Marker {
    /// The current time.
    Today,
    /// A fixed instant.
    Custom {
        /// Marked instant.
        date: EpochMillis,
    },
    /// Follows the pointer while it is over the canvas.
    Cursor {
        /// Pointer x on the canvas.
        offset_x: f64,
    },
}

/// Where a marker lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    /// Instant the marker stands for.
    pub date: EpochMillis,
    /// Canvas x of the line.
    pub left: f64,
}

/// Place `marker` on `canvas`. Markers outside the canvas resolve to `None`.
pub fn resolve_marker(marker: Marker, canvas: &CanvasWindow, now: EpochMillis) -> Option<MarkerPosition> {
    let position = match marker {
        Marker::Today => MarkerPosition {
            date: now,
            left: canvas.time_to_x(now),
        },
        Marker::Custom { date } => MarkerPosition {
            date,
            left: canvas.time_to_x(date),
        },
        Marker::Cursor { offset_x } => MarkerPosition {
            date: canvas.x_to_time(offset_x),
            left: offset_x,
        },
    };
    canvas.contains_time(position.date).then_some(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasWindow {
        CanvasWindow {
            canvas_time_start: 1_000,
            canvas_time_end: 4_000,
            width: 100.0,
        }
    }

    #[test]
    fn today_marker_uses_now() {
        let pos = resolve_marker(Marker::Today, &canvas(), 2_000).unwrap();
        assert_eq!(pos, MarkerPosition { date: 2_000, left: 100.0 });
    }

    #[test]
    fn custom_marker_outside_canvas_is_hidden() {
        assert_eq!(resolve_marker(Marker::Custom { date: 500 }, &canvas(), 0), None);
        assert_eq!(resolve_marker(Marker::Custom { date: 4_001 }, &canvas(), 0), None);
    }

    #[test]
    fn cursor_marker_maps_offset_to_time() {
        let pos = resolve_marker(Marker::Cursor { offset_x: 150.0 }, &canvas(), 0).unwrap();
        assert_eq!(pos.date, 2_500);
        assert_eq!(pos.left, 150.0);
    }

    #[test]
    fn marker_deserializes_from_tagged_json() {
        let marker: Marker = serde_json::from_str(r#"{"kind":"custom","date":42}"#).unwrap();
        assert_eq!(marker, Marker::Custom { date: 42 });
    }
}
