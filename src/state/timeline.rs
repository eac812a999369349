//! The timeline state holder.
//!
//! [`TimelineState`] owns the visible range, the canvas window and the current
//! [`Layout`], and applies the pure view-state functions per event. Every
//! operation returns the [`TimelineEvent`]s it caused; nothing is called back.
//!
//! # Recompute policy
//!
//! - Item or group changes force a canvas recenter and a full re-stack.
//! - A zoom change recenters, since the canvas is always three zoom widths.
//! - A pan inside the canvas only moves the visible range.
//! - Drag and resize moves re-stack with the provisional override.

use crate::config::TimelineConfig;
use crate::model::{EpochMillis, Group, GroupOrders, Item, ItemId, TimelineError};
use crate::state::events::{TimelineContext, TimelineEvent};
use crate::state::interaction::{
    InteractionContext, InteractionMachine, InteractionState, MoveResizeValidator,
    PointerPosition,
};
use crate::state::rate_limit::{Debounce, Throttle};
use crate::state::scroll_handler::ScrollAction;
use crate::state::selection::{ClickGuard, ClickKind, Selection};
use crate::view_state::canvas::{calculate_scroll_canvas, clamp_to_bounds};
use crate::view_state::markers::{resolve_marker, Marker, MarkerPosition};
use crate::view_state::stacking::{stack, Layout};
use crate::view_state::time_units::{self, HeaderInterval, TimeUnit};
use crate::view_state::types::{CanvasWindow, VisibleRange};
use crate::view_state::zoom::{self, ZoomLimits};
use std::fmt;
use std::time::Instant;

/// Viewport width assumed until the caller reports the real one.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1000.0;

/// Builder for [`TimelineState`].
///
/// A visible range wins over a default range; one of them is required.
pub struct TimelineStateBuilder {
    config: TimelineConfig,
    groups: Vec<Group>,
    items: Vec<Item>,
    visible: Option<(EpochMillis, EpochMillis)>,
    default_range: Option<(EpochMillis, EpochMillis)>,
    width: f64,
    validator: Option<Box<dyn MoveResizeValidator>>,
    selected: Option<Vec<ItemId>>,
}

impl Default for TimelineStateBuilder {
    fn default() -> Self {
        Self {
            config: TimelineConfig::default(),
            groups: Vec::new(),
            items: Vec::new(),
            visible: None,
            default_range: None,
            width: DEFAULT_VIEWPORT_WIDTH,
            validator: None,
            selected: None,
        }
    }
}

impl TimelineStateBuilder {
    /// Engine options.
    pub fn config(mut self, config: TimelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Groups in display order.
    pub fn groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    /// Items to lay out.
    pub fn items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Initial visible range.
    pub fn visible_range(mut self, start: EpochMillis, end: EpochMillis) -> Self {
        self.visible = Some((start, end));
        self
    }

    /// Range used when no visible range is given.
    pub fn default_range(mut self, start: EpochMillis, end: EpochMillis) -> Self {
        self.default_range = Some((start, end));
        self
    }

    /// Viewport width in px.
    pub fn viewport_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Move/resize validator.
    pub fn validator(mut self, validator: impl MoveResizeValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Caller-controlled selection.
    pub fn selected(mut self, selected: Vec<ItemId>) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Validate options and compute the initial layout.
    ///
    /// # Errors
    ///
    /// - `MissingTimeRange` when neither range was given
    /// - `InvalidTimeRange` when the chosen range is empty or inverted
    /// - `InvalidOption` when a geometry option is out of range
    /// - `InvalidZoomLimits` when the zoom limits are inconsistent
    pub fn build(self) -> Result<TimelineState, TimelineError> {
        let limits = self.config.validate()?;
        let (start, end) = self
            .visible
            .or(self.default_range)
            .ok_or(TimelineError::MissingTimeRange)?;
        let visible = clamp_to_bounds(VisibleRange::try_new(start, end)?, self.config.time_bounds);
        let width = sanitize_width(self.width).unwrap_or(DEFAULT_VIEWPORT_WIDTH);
        let canvas = CanvasWindow::from_visible(&visible, width);

        let mut selection = Selection::new();
        selection.set_controlled(self.selected);

        let layout = stack(
            &self.items,
            &self.groups,
            &canvas,
            &self.config.stack_options(),
            None,
        );
        tracing::debug!(
            items = self.items.len(),
            groups = self.groups.len(),
            visible_start = visible.start(),
            visible_end = visible.end(),
            "timeline initialized"
        );

        Ok(TimelineState {
            scroll_throttle: Throttle::new(self.config.scroll_throttle()),
            resize_debounce: Debounce::new(self.config.resize_debounce()),
            config: self.config,
            limits,
            groups: self.groups,
            items: self.items,
            visible,
            canvas,
            layout,
            selection,
            interaction: InteractionMachine::new(),
            click_guard: ClickGuard::default(),
            validator: self.validator,
        })
    }
}

fn sanitize_width(width: f64) -> Option<f64> {
    (width.is_finite() && width > 0.0).then_some(width)
}

/// Explicit owner of all timeline state.
pub struct TimelineState {
    config: TimelineConfig,
    limits: ZoomLimits,
    groups: Vec<Group>,
    items: Vec<Item>,
    visible: VisibleRange,
    canvas: CanvasWindow,
    layout: Layout,
    selection: Selection,
    interaction: InteractionMachine,
    click_guard: ClickGuard,
    validator: Option<Box<dyn MoveResizeValidator>>,
    scroll_throttle: Throttle<f64>,
    resize_debounce: Debounce<f64>,
}

impl fmt::Debug for TimelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineState")
            .field("visible", &self.visible)
            .field("canvas", &self.canvas)
            .field("groups", &self.groups.len())
            .field("items", &self.items.len())
            .field("interaction", self.interaction.state())
            .field("has_validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl TimelineState {
    /// Start building a state holder.
    pub fn builder() -> TimelineStateBuilder {
        TimelineStateBuilder::default()
    }

    // ===== Accessors =====

    /// Engine options.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Current visible range.
    pub fn visible_range(&self) -> VisibleRange {
        self.visible
    }

    /// Current canvas window.
    pub fn canvas(&self) -> &CanvasWindow {
        &self.canvas
    }

    /// Current geometry.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Items as supplied.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Selection state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current interaction.
    pub fn interaction(&self) -> &InteractionState {
        self.interaction.state()
    }

    /// Viewport width in px.
    pub fn width(&self) -> f64 {
        self.canvas.width
    }

    /// Window snapshot for notifications.
    pub fn context(&self) -> TimelineContext {
        TimelineContext {
            visible_time_start: self.visible.start(),
            visible_time_end: self.visible.end(),
            canvas_time_start: self.canvas.canvas_time_start,
            canvas_time_end: self.canvas.canvas_time_end,
            timeline_width: self.canvas.width,
        }
    }

    // ===== Data =====

    /// Replace the items. Recenters the canvas and re-stacks.
    pub fn set_items(&mut self, items: Vec<Item>) -> Vec<TimelineEvent> {
        self.items = items;
        self.update_visible(self.visible, true)
    }

    /// Replace the groups. Recenters the canvas and re-stacks.
    pub fn set_groups(&mut self, groups: Vec<Group>) -> Vec<TimelineEvent> {
        self.groups = groups;
        self.update_visible(self.visible, true)
    }

    /// Take (`Some`) or release (`None`) control of the selection.
    pub fn set_selected(&mut self, selected: Option<Vec<ItemId>>) {
        self.selection.set_controlled(selected);
    }

    // ===== Time window =====

    /// Move the visible range.
    ///
    /// # Errors
    ///
    /// `InvalidTimeRange` when `start >= end`.
    pub fn set_visible_range(
        &mut self,
        start: EpochMillis,
        end: EpochMillis,
    ) -> Result<Vec<TimelineEvent>, TimelineError> {
        let range = VisibleRange::try_new(start, end)?;
        Ok(self.update_visible(range, false))
    }

    /// Rescale the visible range around `anchor_ratio` of the viewport.
    pub fn change_zoom(&mut self, scale: f64, anchor_ratio: f64) -> Vec<TimelineEvent> {
        let proposed = zoom::change_zoom(self.visible, scale, anchor_ratio, &self.limits);
        self.update_visible(proposed, false)
    }

    /// Zoom for a modified wheel event at viewport x `pointer_x`.
    pub fn wheel_zoom(&mut self, speed: f64, pointer_x: f64, delta_y: f64) -> Vec<TimelineEvent> {
        let scale = zoom::wheel_zoom_scale(delta_y, speed);
        self.change_zoom(scale, pointer_x / self.canvas.width)
    }

    /// Jump to `[from, to)`. Ignored when the span is below the minimum zoom;
    /// spans above the maximum are shortened.
    pub fn show_period(&mut self, from: EpochMillis, to: EpochMillis) -> Vec<TimelineEvent> {
        let span = to.saturating_sub(from);
        if span < self.limits.min_zoom() {
            tracing::debug!(from, to, min_zoom = self.limits.min_zoom(), "show_period below min zoom ignored");
            return Vec::new();
        }
        let range = VisibleRange::from_start(from, self.limits.clamp(span));
        self.update_visible(range, false)
    }

    /// Horizontal scroll offset of the visible range within the canvas, in px.
    pub fn scroll_left(&self) -> f64 {
        let zoom = self.visible.zoom() as f64;
        self.visible.start().saturating_sub(self.canvas.canvas_time_start) as f64 / zoom * self.canvas.width
    }

    /// Scroll to canvas offset `scroll_x`, throttled.
    pub fn on_scroll(&mut self, now: Instant, scroll_x: f64) -> Vec<TimelineEvent> {
        match self.scroll_throttle.push(now, scroll_x) {
            Some(scroll_x) => self.apply_scroll(scroll_x),
            None => Vec::new(),
        }
    }

    /// Release throttled scrolls and debounced resizes that are due.
    pub fn poll(&mut self, now: Instant) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        if let Some(scroll_x) = self.scroll_throttle.poll(now) {
            events.extend(self.apply_scroll(scroll_x));
        }
        if let Some(width) = self.resize_debounce.poll(now) {
            self.set_viewport_width(width);
        }
        events
    }

    /// Report a new viewport width; applied by [`TimelineState::poll`] once resizing settles.
    pub fn request_viewport_resize(&mut self, now: Instant, width: f64) {
        self.resize_debounce.push(now, width);
    }

    /// Apply a pending viewport resize now instead of waiting for the quiet period.
    pub fn flush_viewport_resize(&mut self) {
        if let Some(width) = self.resize_debounce.flush() {
            self.set_viewport_width(width);
        }
    }

    /// Whether a throttled scroll or debounced resize still waits for [`TimelineState::poll`].
    pub fn has_pending_updates(&self) -> bool {
        self.scroll_throttle.has_pending() || self.resize_debounce.has_pending()
    }

    /// Apply a new viewport width immediately and re-stack with the current canvas.
    pub fn set_viewport_width(&mut self, width: f64) {
        let Some(width) = sanitize_width(width) else {
            tracing::debug!(width, "ignoring invalid viewport width");
            return;
        };
        self.canvas.width = width;
        self.restack();
    }

    /// Apply a gesture result from the pan tracker.
    pub fn apply_scroll_action(&mut self, now: Instant, action: ScrollAction) -> Vec<TimelineEvent> {
        match action {
            ScrollAction::ScrollTo(scroll_x) => self.on_scroll(now, scroll_x),
            ScrollAction::Zoom {
                scale,
                anchor_ratio,
            } => self.change_zoom(scale, anchor_ratio),
            ScrollAction::VerticalScroll(_) => Vec::new(),
        }
    }

    fn apply_scroll(&mut self, scroll_x: f64) -> Vec<TimelineEvent> {
        let zoom = self.visible.zoom();
        let offset = (zoom as f64 * scroll_x / self.canvas.width).round() as i64;
        let start = self.canvas.canvas_time_start.saturating_add(offset);
        if start == self.visible.start() {
            return Vec::new();
        }
        self.update_visible(VisibleRange::from_start(start, zoom), false)
    }

    fn update_visible(&mut self, proposed: VisibleRange, force: bool) -> Vec<TimelineEvent> {
        let proposed = clamp_to_bounds(proposed, self.config.time_bounds);
        let zoom_changed = proposed.zoom() != self.visible.zoom();
        let previous_canvas_start = self.canvas.canvas_time_start;

        let options = self.config.stack_options();
        let preview = self.interaction.stacking_override();
        let (items, groups) = (&self.items, &self.groups);
        let outcome = calculate_scroll_canvas(proposed, &self.canvas, force || zoom_changed, |canvas| {
            stack(items, groups, canvas, &options, preview.as_ref())
        });

        self.visible = outcome.visible;
        self.canvas = outcome.canvas;
        if let Some(layout) = outcome.layout {
            self.layout = layout;
        }

        let mut events = Vec::new();
        if zoom_changed {
            events.push(TimelineEvent::Zoom {
                context: self.context(),
                unit: self.min_unit(),
            });
        }
        if self.canvas.canvas_time_start != previous_canvas_start {
            events.push(TimelineEvent::BoundsChange {
                canvas_time_start: self.canvas.canvas_time_start,
                canvas_time_end: self.canvas.canvas_time_end,
            });
        }
        events
    }

    fn restack(&mut self) {
        self.layout = stack(
            &self.items,
            &self.groups,
            &self.canvas,
            &self.config.stack_options(),
            self.interaction.stacking_override().as_ref(),
        );
    }

    // ===== Clicks =====

    /// Pointer pressed on the canvas at x (used to tell clicks from pans).
    pub fn canvas_pointer_down(&mut self, x: f64) {
        self.click_guard.pointer_down(x);
    }

    /// Pointer released on the canvas at x.
    pub fn canvas_pointer_up(&mut self, x: f64) {
        self.click_guard.pointer_up(x, self.config.click_tolerance);
    }

    fn canvas_time(&self, offset_x: f64) -> EpochMillis {
        self.config.snap_config().floor(self.canvas.x_to_time(offset_x))
    }

    fn row_event(
        &self,
        row_index: usize,
        offset_x: f64,
        make: impl FnOnce(crate::model::GroupId, EpochMillis) -> TimelineEvent,
    ) -> Option<TimelineEvent> {
        let Some(group) = self.groups.get(row_index) else {
            tracing::debug!(row_index, "canvas event outside known rows");
            return None;
        };
        Some(make(group.id.clone(), self.canvas_time(offset_x)))
    }

    /// Click on empty canvas in row `row_index` at canvas x `offset_x`.
    ///
    /// Clears the engine selection first. Suppressed when the pointer moved
    /// further than the click tolerance since it was pressed.
    pub fn canvas_click(&mut self, row_index: usize, offset_x: f64) -> Vec<TimelineEvent> {
        if !self.click_guard.take_click() {
            tracing::trace!("canvas click suppressed after pan");
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.selection.clear().is_some() {
            events.push(TimelineEvent::ItemDeselect);
        }
        events.extend(self.row_event(row_index, offset_x, |group_id, time| {
            TimelineEvent::CanvasClick { group_id, time }
        }));
        events
    }

    /// Double click on empty canvas.
    pub fn canvas_double_click(&self, row_index: usize, offset_x: f64) -> Option<TimelineEvent> {
        self.row_event(row_index, offset_x, |group_id, time| {
            TimelineEvent::CanvasDoubleClick { group_id, time }
        })
    }

    /// Context menu on empty canvas.
    pub fn canvas_context_menu(&self, row_index: usize, offset_x: f64) -> Option<TimelineEvent> {
        self.row_event(row_index, offset_x, |group_id, time| {
            TimelineEvent::CanvasContextMenu { group_id, time }
        })
    }

    /// Snapped time at viewport x, for item events.
    fn item_event_time(&self, viewport_x: f64) -> EpochMillis {
        let zoom = self.visible.zoom() as f64;
        let time = self
            .visible
            .start()
            .saturating_add((viewport_x / self.canvas.width * zoom).round() as i64);
        self.config.snap_config().floor(time)
    }

    fn find_item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Tap on an item at viewport x.
    ///
    /// A tap on a selected item (or any touch, with `item_touch_sends_click`)
    /// emits `ItemClick`; otherwise the item becomes selected. Items that
    /// cannot be selected ignore taps.
    pub fn item_tap(&mut self, id: &ItemId, kind: ClickKind, viewport_x: f64) -> Vec<TimelineEvent> {
        let Some(item) = self.find_item(id) else {
            return Vec::new();
        };
        if !item.capabilities(&self.config.capabilities()).can_select {
            return Vec::new();
        }

        let time = self.item_event_time(viewport_x);
        let sends_click = self.config.item_touch_sends_click && kind == ClickKind::Touch;
        if self.selection.is_selected(id) || sends_click {
            return vec![TimelineEvent::ItemClick {
                item_id: id.clone(),
                time,
            }];
        }

        self.selection.select(id.clone());
        vec![TimelineEvent::ItemSelect {
            item_id: id.clone(),
            time,
        }]
    }

    /// Double click on an item.
    pub fn item_double_click(&self, id: &ItemId, viewport_x: f64) -> Option<TimelineEvent> {
        self.find_item(id).map(|item| TimelineEvent::ItemDoubleClick {
            item_id: item.id.clone(),
            time: self.item_event_time(viewport_x),
        })
    }

    /// Context menu on an item.
    pub fn item_context_menu(&self, id: &ItemId, viewport_x: f64) -> Option<TimelineEvent> {
        self.find_item(id).map(|item| TimelineEvent::ItemContextMenu {
            item_id: item.id.clone(),
            time: self.item_event_time(viewport_x),
        })
    }

    // ===== Drag and resize =====

    /// Start dragging a selected, movable item. Returns whether a drag started.
    pub fn begin_drag(&mut self, id: &ItemId, pointer: PointerPosition) -> bool {
        let Some(item) = self.items.iter().find(|item| item.id == *id) else {
            return false;
        };
        let Some(group_order) = GroupOrders::new(&self.groups).get(&item.group) else {
            return false;
        };
        let capabilities = item.capabilities(&self.config.capabilities());
        let selected = self.selection.is_selected(id);
        self.interaction
            .begin_drag(item, group_order, selected, &capabilities, pointer, &self.canvas)
    }

    /// Update the active drag.
    ///
    /// # Errors
    ///
    /// Validator failures; the drag stays active.
    pub fn drag_move(&mut self, pointer: PointerPosition) -> Result<Vec<TimelineEvent>, TimelineError> {
        let snap = self.config.snap_config();
        let ctx = InteractionContext {
            canvas: &self.canvas,
            group_tops: &self.layout.group_tops,
            snap: &snap,
            validator: self.validator.as_deref(),
        };
        let Some(update) = self.interaction.drag_move(pointer, &ctx)? else {
            return Ok(Vec::new());
        };
        self.restack();
        Ok(vec![TimelineEvent::ItemDrag {
            item_id: update.item_id,
            time: update.time,
            new_group_order: update.group_order,
        }])
    }

    /// Finish the active drag.
    ///
    /// # Errors
    ///
    /// Validator failures; the drag is over either way.
    pub fn end_drag(&mut self, pointer: PointerPosition) -> Result<Vec<TimelineEvent>, TimelineError> {
        let snap = self.config.snap_config();
        let ctx = InteractionContext {
            canvas: &self.canvas,
            group_tops: &self.layout.group_tops,
            snap: &snap,
            validator: self.validator.as_deref(),
        };
        let result = self.interaction.end_drag(pointer, &ctx);
        self.restack();
        Ok(result?
            .map(|update| TimelineEvent::ItemMove {
                item_id: update.item_id,
                time: update.time,
                new_group_order: update.group_order,
            })
            .into_iter()
            .collect())
    }

    /// Start resizing a selected, resizable item that is rendered wide enough.
    /// Returns whether a resize started.
    pub fn begin_resize(&mut self, id: &ItemId, pointer: PointerPosition) -> bool {
        let Some(item) = self.items.iter().find(|item| item.id == *id) else {
            return false;
        };
        let Some(dimension) = self.layout.dimension(id) else {
            return false;
        };
        let capabilities = item.capabilities(&self.config.capabilities());
        let selected = self.selection.is_selected(id);
        self.interaction.begin_resize(
            item,
            selected,
            &capabilities,
            dimension.dimension.width,
            self.config.min_resize_width,
            pointer,
        )
    }

    /// Update the active resize.
    ///
    /// # Errors
    ///
    /// Validator failures; the resize stays active.
    pub fn resize_move(
        &mut self,
        pointer: PointerPosition,
        rect_delta_left: f64,
    ) -> Result<Vec<TimelineEvent>, TimelineError> {
        let snap = self.config.snap_config();
        let ctx = InteractionContext {
            canvas: &self.canvas,
            group_tops: &self.layout.group_tops,
            snap: &snap,
            validator: self.validator.as_deref(),
        };
        let Some(update) = self.interaction.resize_move(pointer, rect_delta_left, &ctx)? else {
            return Ok(Vec::new());
        };
        self.restack();
        Ok(vec![TimelineEvent::ItemResizing {
            item_id: update.item_id,
            time: update.time,
            edge: update.edge,
        }])
    }

    /// Finish the active resize.
    ///
    /// # Errors
    ///
    /// Validator failures; the resize is over either way.
    pub fn end_resize(&mut self, pointer: PointerPosition) -> Result<Vec<TimelineEvent>, TimelineError> {
        let snap = self.config.snap_config();
        let ctx = InteractionContext {
            canvas: &self.canvas,
            group_tops: &self.layout.group_tops,
            snap: &snap,
            validator: self.validator.as_deref(),
        };
        let result = self.interaction.end_resize(pointer, &ctx);
        self.restack();
        Ok(result?
            .map(|update| TimelineEvent::ItemResize {
                item_id: update.item_id,
                time: update.time,
                edge: update.edge,
                delta: update.delta,
            })
            .into_iter()
            .collect())
    }

    /// Abandon the active drag or resize without committing.
    pub fn cancel_interaction(&mut self) -> bool {
        let cancelled = self.interaction.cancel();
        if cancelled {
            self.restack();
        }
        cancelled
    }

    // ===== Queries =====

    /// Time at canvas x.
    pub fn time_from_x(&self, x: f64) -> EpochMillis {
        self.canvas.x_to_time(x)
    }

    /// Canvas x of `time`.
    pub fn x_from_time(&self, time: EpochMillis) -> f64 {
        self.canvas.time_to_x(time)
    }

    /// Smallest readable header unit at the current zoom.
    pub fn min_unit(&self) -> TimeUnit {
        time_units::min_unit(self.visible.zoom(), self.canvas.width, &self.config.time_steps)
    }

    /// Header cells of `unit` across the canvas.
    pub fn header_intervals(&self, unit: TimeUnit) -> Vec<HeaderInterval> {
        let offset = time_units::utc_offset_at(
            self.config.snap_utc_offset_minutes,
            self.canvas.canvas_time_start,
        );
        time_units::header_intervals(&self.canvas, unit, &self.config.time_steps, offset)
    }

    /// Position of a marker, if it is on the canvas.
    pub fn marker(&self, marker: Marker, now: EpochMillis) -> Option<MarkerPosition> {
        resolve_marker(marker, &self.canvas, now)
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
