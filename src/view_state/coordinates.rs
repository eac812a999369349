//! Time ↔ pixel conversion within a canvas window.
//!
//! Pure and stateless. Times are integer milliseconds, pixels are `f64`.
//! [`x_to_time`] rounds to the nearest millisecond so that
//! `x_to_time(time_to_x(t)) == t` for any `t` a canvas can realistically span.
//! Differences are taken in `i128` so that times anywhere in `i64` map without
//! overflow.

use crate::model::EpochMillis;

/// The canvas is this many viewport widths wide.
pub const CANVAS_WIDTH_FACTOR: f64 = 3.0;

/// Horizontal offset of `time` on a canvas spanning `[canvas_start, canvas_end]`
/// over `canvas_width` pixels.
pub fn time_to_x(
    canvas_start: EpochMillis,
    canvas_end: EpochMillis,
    canvas_width: f64,
    time: EpochMillis,
) -> f64 {
    let span = span(canvas_start, canvas_end);
    if span <= 0.0 {
        return 0.0;
    }
    (i128::from(time) - i128::from(canvas_start)) as f64 / span * canvas_width
}

/// Inverse of [`time_to_x`].
pub fn x_to_time(
    canvas_start: EpochMillis,
    canvas_end: EpochMillis,
    canvas_width: f64,
    x: f64,
) -> EpochMillis {
    if canvas_width <= 0.0 || !x.is_finite() {
        return canvas_start;
    }
    let span = span(canvas_start, canvas_end);
    canvas_start.saturating_add((x / canvas_width * span).round() as i64)
}

/// Milliseconds represented by one canvas pixel.
pub fn time_per_pixel(canvas_start: EpochMillis, canvas_end: EpochMillis, canvas_width: f64) -> f64 {
    if canvas_width <= 0.0 {
        return 0.0;
    }
    span(canvas_start, canvas_end) / canvas_width
}

/// Canvas pixel width for a viewport width.
pub fn canvas_width(viewport_width: f64) -> f64 {
    viewport_width * CANVAS_WIDTH_FACTOR
}

/// Canvas bounds for a visible range: one zoom width of margin on each side.
pub fn canvas_boundaries_from_visible(
    visible_start: EpochMillis,
    visible_end: EpochMillis,
) -> (EpochMillis, EpochMillis) {
    let zoom = visible_end.saturating_sub(visible_start);
    (
        visible_start.saturating_sub(zoom),
        visible_end.saturating_add(zoom),
    )
}

fn span(canvas_start: EpochMillis, canvas_end: EpochMillis) -> f64 {
    (i128::from(canvas_end) - i128::from(canvas_start)) as f64
}
