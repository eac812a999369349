//! Configuration module.
//!
//! [`TimelineConfig`] holds every engine option with its default. The
//! [`loader`] submodule resolves it from a TOML file, environment variables
//! and CLI flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config, resolve,
    ConfigError, ConfigFile, ResolvedConfig,
};

use crate::model::{DurationMillis, ItemCapabilities, Keys, ResizeCapability, TimelineError};
use crate::state::snap::SnapConfig;
use crate::view_state::stacking::StackOptions;
use crate::view_state::time_units::TimeSteps;
use crate::view_state::types::TimeBounds;
use crate::view_state::zoom::{ZoomLimits, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine options.
///
/// Deserializes from a TOML table where every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineConfig {
    /// Snap interval in ms for drags, resizes and click times. 0 disables snapping.
    pub drag_snap: DurationMillis,
    /// Smallest visible span in ms.
    pub min_zoom: DurationMillis,
    /// Largest visible span in ms.
    pub max_zoom: DurationMillis,
    /// Lane height in px.
    pub line_height: f64,
    /// Item height as a fraction of `line_height`.
    pub item_height_ratio: f64,
    /// Place overlapping items in separate lanes.
    pub stack_items: bool,
    /// Default for items without their own `can_move`.
    pub can_move: bool,
    /// Default for items without their own `can_resize`.
    pub can_resize: ResizeCapability,
    /// Default for items without their own `can_change_group`.
    pub can_change_group: bool,
    /// Default for items without their own `can_select`.
    pub can_select: bool,
    /// Items rendered narrower than this cannot be resized.
    pub min_resize_width: f64,
    /// Pointer travel in px between press and release that still counts as a click.
    pub click_tolerance: f64,
    /// Touch taps always emit item clicks instead of selecting.
    pub item_touch_sends_click: bool,
    /// Header step per unit.
    pub time_steps: TimeSteps,
    /// Absolute limits for the visible range.
    pub time_bounds: Option<TimeBounds>,
    /// Fixed UTC offset for snapping and headers. Unset means the system zone.
    pub snap_utc_offset_minutes: Option<i32>,
    /// Minimum spacing of applied scroll updates.
    pub scroll_throttle_ms: u64,
    /// Quiet period before a viewport resize is applied.
    pub resize_debounce_ms: u64,
    /// Field names for JSON input.
    pub keys: Keys,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            drag_snap: 15 * 60 * 1000,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            line_height: 30.0,
            item_height_ratio: 0.65,
            stack_items: false,
            can_move: true,
            can_resize: ResizeCapability::Right,
            can_change_group: true,
            can_select: true,
            min_resize_width: 20.0,
            click_tolerance: 3.0,
            item_touch_sends_click: false,
            time_steps: TimeSteps::default(),
            time_bounds: None,
            snap_utc_offset_minutes: None,
            scroll_throttle_ms: 100,
            resize_debounce_ms: 100,
            keys: Keys::default(),
        }
    }
}

impl TimelineConfig {
    /// Check the geometry options and zoom limits, returning the limits.
    ///
    /// # Errors
    ///
    /// - `InvalidOption` for a non-positive `line_height`, an `item_height_ratio`
    ///   outside `(0, 1]`, or a negative `min_resize_width` or `click_tolerance`
    /// - `InvalidZoomLimits` when `min_zoom` is not positive or exceeds `max_zoom`
    pub fn validate(&self) -> Result<ZoomLimits, TimelineError> {
        let checks = [
            ("line_height", self.line_height, self.line_height > 0.0),
            (
                "item_height_ratio",
                self.item_height_ratio,
                self.item_height_ratio > 0.0 && self.item_height_ratio <= 1.0,
            ),
            ("min_resize_width", self.min_resize_width, self.min_resize_width >= 0.0),
            ("click_tolerance", self.click_tolerance, self.click_tolerance >= 0.0),
        ];
        // NaN fails every comparison above.
        if let Some((option, value, _)) = checks.into_iter().find(|(_, value, ok)| !ok || !value.is_finite()) {
            return Err(TimelineError::InvalidOption { option, value });
        }
        ZoomLimits::new(self.min_zoom, self.max_zoom)
    }

    /// Snap settings for interactions.
    pub fn snap_config(&self) -> SnapConfig {
        SnapConfig {
            interval: self.drag_snap,
            utc_offset_minutes: self.snap_utc_offset_minutes,
        }
    }

    /// Geometry options for the stacker.
    pub fn stack_options(&self) -> StackOptions {
        StackOptions {
            stack_items: self.stack_items,
            line_height: self.line_height,
            item_height_ratio: self.item_height_ratio,
        }
    }

    /// Capability defaults for items without their own flags.
    pub fn capabilities(&self) -> ItemCapabilities {
        ItemCapabilities {
            can_move: self.can_move,
            can_resize: self.can_resize,
            can_change_group: self.can_change_group,
            can_select: self.can_select,
        }
    }

    /// Scroll throttle interval.
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// Viewport resize debounce delay.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
