//! Pan and zoom gestures.
//!
//! [`PanTracker`] turns raw wheel, mouse and touch input into
//! [`ScrollAction`]s. It holds only gesture bookkeeping (last pointer
//! position, finger distance); the time window lives in `TimelineState`,
//! which applies the actions.

use crate::view_state::zoom::{pinch_zoom_scale, wheel_zoom_scale, WheelModifiers};

/// A touch point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    /// Horizontal position relative to the scroll area.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl TouchPoint {
    /// Create a touch point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the caller should do in response to a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAction {
    /// Set the horizontal scroll offset (canvas px).
    ScrollTo(f64),
    /// Zoom by `scale` around `anchor_ratio` of the viewport width.
    Zoom {
        /// Multiplier for the zoom width.
        scale: f64,
        /// Anchor position across the viewport, 0..=1.
        anchor_ratio: f64,
    },
    /// Scroll the page vertically to this offset.
    VerticalScroll(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SingleTouch {
    start: TouchPoint,
    last: TouchPoint,
    page_y_offset: f64,
}

/// Gesture state for panning and pinch zooming.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanTracker {
    mouse_last_x: Option<f64>,
    last_touch_distance: Option<f64>,
    single_touch: Option<SingleTouch>,
}

impl PanTracker {
    /// No gesture in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mouse drag pan is in progress.
    pub fn is_mouse_panning(&self) -> bool {
        self.mouse_last_x.is_some()
    }

    /// Wheel input. Ctrl, meta or alt zoom around `pointer_x`; shift scrolls
    /// horizontally. Plain wheel events are left to the caller.
    pub fn wheel(
        &self,
        delta_x: f64,
        delta_y: f64,
        modifiers: WheelModifiers,
        pointer_x: f64,
        scroll_left: f64,
        width: f64,
    ) -> Option<ScrollAction> {
        if let Some(speed) = modifiers.zoom_speed() {
            return Some(ScrollAction::Zoom {
                scale: wheel_zoom_scale(delta_y, speed),
                anchor_ratio: ratio(pointer_x, width),
            });
        }
        if modifiers.shift {
            let delta = if delta_y != 0.0 { delta_y } else { delta_x };
            return Some(ScrollAction::ScrollTo(scroll_left + delta));
        }
        None
    }

    /// Mouse button pressed. Only the primary button starts a pan.
    pub fn mouse_down(&mut self, primary: bool, page_x: f64) {
        if primary {
            self.mouse_last_x = Some(page_x);
        }
    }

    /// Mouse moved. Pans unless an item interaction owns the pointer.
    pub fn mouse_move(&mut self, page_x: f64, scroll_left: f64, interacting_with_item: bool) -> Option<ScrollAction> {
        let last_x = self.mouse_last_x?;
        if interacting_with_item {
            return None;
        }
        self.mouse_last_x = Some(page_x);
        Some(ScrollAction::ScrollTo(scroll_left + last_x - page_x))
    }

    /// Mouse released or left the area.
    pub fn mouse_up(&mut self) {
        self.mouse_last_x = None;
    }

    /// Fingers touched down. Two fingers start a pinch, one starts a pan.
    pub fn touch_start(&mut self, touches: &[TouchPoint], page_y_offset: f64) {
        match touches {
            [first, second] => {
                self.last_touch_distance = Some((first.x - second.x).abs());
                self.single_touch = None;
            }
            [only] => {
                self.last_touch_distance = None;
                self.single_touch = Some(SingleTouch {
                    start: *only,
                    last: *only,
                    page_y_offset,
                });
            }
            _ => {}
        }
    }

    /// Fingers moved.
    ///
    /// A pinch zooms around the finger midpoint. A single finger pans
    /// horizontally and scrolls the page vertically; each axis only moves when
    /// its total travel is more than a third of the other's.
    pub fn touch_move(
        &mut self,
        touches: &[TouchPoint],
        scroll_left: f64,
        width: f64,
        interacting_with_item: bool,
    ) -> Vec<ScrollAction> {
        if interacting_with_item {
            return Vec::new();
        }

        match (touches, self.last_touch_distance, self.single_touch.as_mut()) {
            ([first, second], Some(last_distance), _) => {
                let distance = (first.x - second.x).abs();
                if distance == 0.0 || last_distance == 0.0 {
                    return Vec::new();
                }
                let midpoint = (first.x + second.x) / 2.0;
                self.last_touch_distance = Some(distance);
                vec![ScrollAction::Zoom {
                    scale: pinch_zoom_scale(last_distance, distance),
                    anchor_ratio: ratio(midpoint, width),
                }]
            }
            ([only], _, Some(touch)) => {
                let delta_x = only.x - touch.last.x;
                let delta_x0 = only.x - touch.start.x;
                let delta_y0 = only.y - touch.start.y;
                touch.last = *only;

                let move_x = delta_x0.abs() * 3.0 > delta_y0.abs();
                let move_y = delta_y0.abs() * 3.0 > delta_x0.abs();

                let mut actions = Vec::new();
                if delta_x != 0.0 && move_x {
                    actions.push(ScrollAction::ScrollTo(scroll_left - delta_x));
                }
                if move_y {
                    actions.push(ScrollAction::VerticalScroll(touch.page_y_offset - delta_y0));
                }
                actions
            }
            _ => Vec::new(),
        }
    }

    /// All fingers lifted.
    pub fn touch_end(&mut self) {
        self.last_touch_distance = None;
        self.single_touch = None;
    }
}

fn ratio(x: f64, width: f64) -> f64 {
    if width > 0.0 {
        x / width
    } else {
        0.5
    }
}

#[cfg(test)]
#[path = "scroll_handler_tests.rs"]
mod tests;
