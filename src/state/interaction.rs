//! Drag/resize interaction state machine.
//!
//! Turns pointer positions into snapped provisional times and group deltas.
//! Transitions are `Idle → Dragging → Idle` and `Idle → Resizing → Idle`; at
//! most one interaction is active. The machine never mutates items: callers
//! read [`InteractionMachine::stacking_override`] to preview the edit and
//! receive a commit from the `end_*` operations.
//!
//! Pointer positions are canvas offsets in px.

use crate::model::{
    EpochMillis, Item, ItemCapabilities, ItemId, ResizeCapability, ResizeEdge, TimelineError,
    ValidatorError,
};
use crate::state::snap::SnapConfig;
use crate::view_state::stacking::InteractionOverride;
use crate::view_state::types::CanvasWindow;
use serde::{Deserialize, Serialize};

/// What the validator is asked to approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    /// A new start time for a dragged item.
    Move,
    /// A new edge time for a resized item.
    Resize,
}

/// Caller hook that may replace a proposed time.
///
/// Returning `proposed_time` unchanged means no constraint. Errors propagate to
/// the caller as [`TimelineError::Validator`].
pub trait MoveResizeValidator {
    /// Approve or replace `proposed_time` for `item`. `edge` is set for resizes.
    fn validate(
        &self,
        action: ValidationAction,
        item: &Item,
        proposed_time: EpochMillis,
        edge: Option<ResizeEdge>,
    ) -> Result<EpochMillis, ValidatorError>;
}

impl<F> MoveResizeValidator for F
where
    F: Fn(ValidationAction, &Item, EpochMillis, Option<ResizeEdge>) -> Result<EpochMillis, ValidatorError>,
{
    fn validate(
        &self,
        action: ValidationAction,
        item: &Item,
        proposed_time: EpochMillis,
        edge: Option<ResizeEdge>,
    ) -> Result<EpochMillis, ValidatorError> {
        self(action, item, proposed_time, edge)
    }
}

/// Geometry and hooks needed to evaluate a pointer event.
#[derive(Clone, Copy)]
pub struct InteractionContext<'a> {
    /// Current canvas window.
    pub canvas: &'a CanvasWindow,
    /// Group tops from the current layout, by group order.
    pub group_tops: &'a [f64],
    /// Snap settings.
    pub snap: &'a SnapConfig,
    /// Optional caller validator.
    pub validator: Option<&'a dyn MoveResizeValidator>,
}

impl InteractionContext<'_> {
    fn validate(
        &self,
        action: ValidationAction,
        item: &Item,
        proposed: EpochMillis,
        edge: Option<ResizeEdge>,
    ) -> Result<EpochMillis, TimelineError> {
        match self.validator {
            Some(validator) => Ok(validator.validate(action, item, proposed, edge)?),
            None => Ok(proposed),
        }
    }
}

/// Pointer position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    /// Canvas x in px.
    pub x: f64,
    /// Canvas y in px.
    pub y: f64,
}

impl PointerPosition {
    /// Create a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    item: Item,
    start_offset: i64,
    pre_drag_group_order: usize,
    can_change_group: bool,
    provisional_time: EpochMillis,
    group_delta: isize,
}

impl DragState {
    /// The dragged item, as it was before the drag.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Item start minus the pointer time at drag start.
    pub fn start_offset(&self) -> i64 {
        self.start_offset
    }

    /// Provisional start time.
    pub fn provisional_time(&self) -> EpochMillis {
        self.provisional_time
    }

    /// Rows moved relative to the item's own group.
    pub fn group_delta(&self) -> isize {
        self.group_delta
    }

    fn group_order(&self) -> usize {
        self.pre_drag_group_order.saturating_add_signed(self.group_delta)
    }
}

/// An active resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    item: Item,
    capability: ResizeCapability,
    start_x: f64,
    edge: Option<ResizeEdge>,
    provisional_time: Option<EpochMillis>,
}

impl ResizeState {
    /// The resized item, as it was before the resize.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Edge being moved. `None` until the first move.
    pub fn edge(&self) -> Option<ResizeEdge> {
        self.edge
    }

    /// Provisional time of the moving edge. `None` until the first move.
    pub fn provisional_time(&self) -> Option<EpochMillis> {
        self.provisional_time
    }
}

/// Current interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No interaction.
    #[default]
    Idle,
    /// An item is being dragged.
    Dragging(DragState),
    /// An item edge is being dragged.
    Resizing(ResizeState),
}

/// Provisional or committed drag result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragUpdate {
    /// Dragged item.
    pub item_id: ItemId,
    /// New start time.
    pub time: EpochMillis,
    /// Target group order.
    pub group_order: usize,
    /// Rows moved relative to the original group.
    pub group_delta: isize,
}

/// Provisional or committed resize result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeUpdate {
    /// Resized item.
    pub item_id: ItemId,
    /// New time of the moving edge.
    pub time: EpochMillis,
    /// Edge that moved.
    pub edge: ResizeEdge,
    /// Realized change of the edge time.
    pub delta: i64,
}

/// The drag/resize state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionMachine {
    state: InteractionState,
}

impl InteractionMachine {
    /// An idle machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether a drag or resize is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    /// Start dragging `item`. No-op (returns false) when the item is not
    /// selected, cannot move, or another interaction is active.
    pub fn begin_drag(
        &mut self,
        item: &Item,
        group_order: usize,
        selected: bool,
        capabilities: &ItemCapabilities,
        pointer: PointerPosition,
        canvas: &CanvasWindow,
    ) -> bool {
        if self.is_active() {
            tracing::debug!(item = %item.id, "drag ignored, interaction already active");
            return false;
        }
        if !selected || !capabilities.can_move {
            tracing::trace!(item = %item.id, selected, "drag not permitted");
            return false;
        }

        let pointer_time = canvas.x_to_time(pointer.x);
        self.state = InteractionState::Dragging(DragState {
            item: item.clone(),
            start_offset: item.start_time.saturating_sub(pointer_time),
            pre_drag_group_order: group_order,
            can_change_group: capabilities.can_change_group,
            provisional_time: item.start_time,
            group_delta: 0,
        });
        tracing::debug!(item = %item.id, group_order, "drag started");
        true
    }

    /// Update the drag for a pointer move.
    ///
    /// Returns `Ok(None)` when no drag is active. On a validator error the drag
    /// stays active with its previous provisional state.
    pub fn drag_move(
        &mut self,
        pointer: PointerPosition,
        ctx: &InteractionContext<'_>,
    ) -> Result<Option<DragUpdate>, TimelineError> {
        let InteractionState::Dragging(drag) = &mut self.state else {
            return Ok(None);
        };
        let update = drag_update(drag, pointer, ctx)?;
        drag.provisional_time = update.time;
        drag.group_delta = update.group_delta;
        Ok(Some(update))
    }

    /// Finish the drag and return the move to commit.
    ///
    /// The machine is idle afterwards, even on error. Returns `Ok(None)` when no
    /// drag was active or the item would end up where it started.
    pub fn end_drag(
        &mut self,
        pointer: PointerPosition,
        ctx: &InteractionContext<'_>,
    ) -> Result<Option<DragUpdate>, TimelineError> {
        let InteractionState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        let update = drag_update(&drag, pointer, ctx)?;
        if update.time == drag.item.start_time && update.group_delta == 0 {
            tracing::debug!(item = %update.item_id, "zero-delta drag discarded");
            return Ok(None);
        }
        tracing::info!(
            item = %update.item_id,
            time = update.time,
            group_order = update.group_order,
            "item moved"
        );
        Ok(Some(update))
    }

    /// Start resizing `item`. No-op (returns false) when the item is not
    /// selected, cannot be resized, is rendered narrower than
    /// `min_resize_width`, or another interaction is active.
    pub fn begin_resize(
        &mut self,
        item: &Item,
        selected: bool,
        capabilities: &ItemCapabilities,
        rendered_width: f64,
        min_resize_width: f64,
        pointer: PointerPosition,
    ) -> bool {
        if self.is_active() {
            tracing::debug!(item = %item.id, "resize ignored, interaction already active");
            return false;
        }
        if !selected || !capabilities.can_resize.is_enabled() || rendered_width < min_resize_width {
            tracing::trace!(item = %item.id, selected, rendered_width, "resize not permitted");
            return false;
        }

        self.state = InteractionState::Resizing(ResizeState {
            item: item.clone(),
            capability: capabilities.can_resize,
            start_x: pointer.x,
            edge: None,
            provisional_time: None,
        });
        tracing::debug!(item = %item.id, "resize started");
        true
    }

    /// Update the resize for a pointer move.
    ///
    /// `rect_delta_left` is the change of the item rectangle's left edge
    /// reported with the first move; non-zero means the left edge is moving.
    pub fn resize_move(
        &mut self,
        pointer: PointerPosition,
        rect_delta_left: f64,
        ctx: &InteractionContext<'_>,
    ) -> Result<Option<ResizeUpdate>, TimelineError> {
        let InteractionState::Resizing(resize) = &mut self.state else {
            return Ok(None);
        };
        let edge = resize
            .edge
            .unwrap_or_else(|| choose_edge(resize.capability, rect_delta_left));
        resize.edge = Some(edge);

        let update = resize_update(resize, edge, pointer, ctx)?;
        resize.provisional_time = Some(update.time);
        Ok(Some(update))
    }

    /// Finish the resize and return the change to commit.
    ///
    /// The machine is idle afterwards, even on error. Returns `Ok(None)` when no
    /// resize was active or the realized delta is zero.
    pub fn end_resize(
        &mut self,
        pointer: PointerPosition,
        ctx: &InteractionContext<'_>,
    ) -> Result<Option<ResizeUpdate>, TimelineError> {
        let InteractionState::Resizing(resize) = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        let edge = resize
            .edge
            .unwrap_or_else(|| choose_edge(resize.capability, 0.0));
        let update = resize_update(&resize, edge, pointer, ctx)?;
        if update.delta == 0 {
            tracing::debug!(item = %update.item_id, "zero-delta resize discarded");
            return Ok(None);
        }
        tracing::info!(
            item = %update.item_id,
            time = update.time,
            edge = ?update.edge,
            "item resized"
        );
        Ok(Some(update))
    }

    /// Drop any active interaction without committing. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            tracing::debug!("interaction cancelled");
        }
        self.state = InteractionState::Idle;
        was_active
    }

    /// Provisional values for the stacker, if an interaction is active.
    pub fn stacking_override(&self) -> Option<InteractionOverride> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::Dragging(drag) => Some(InteractionOverride {
                item_id: drag.item.id.clone(),
                start_time: drag.provisional_time,
                end_time: drag.provisional_time.saturating_add(drag.item.duration()),
                group_order: Some(drag.group_order()),
            }),
            InteractionState::Resizing(resize) => {
                let (start_time, end_time) = match (resize.edge, resize.provisional_time) {
                    (Some(ResizeEdge::Left), Some(time)) => (time, resize.item.end_time),
                    (Some(ResizeEdge::Right), Some(time)) => (resize.item.start_time, time),
                    _ => (resize.item.start_time, resize.item.end_time),
                };
                Some(InteractionOverride {
                    item_id: resize.item.id.clone(),
                    start_time,
                    end_time,
                    group_order: None,
                })
            }
        }
    }
}

/// Pick the moving edge, falling back to the other edge when the preferred one
/// is not permitted.
fn choose_edge(capability: ResizeCapability, rect_delta_left: f64) -> ResizeEdge {
    let preferred = if rect_delta_left != 0.0 {
        ResizeEdge::Left
    } else {
        ResizeEdge::Right
    };
    if capability.allows(preferred) {
        preferred
    } else {
        preferred.opposite()
    }
}

fn drag_update(
    drag: &DragState,
    pointer: PointerPosition,
    ctx: &InteractionContext<'_>,
) -> Result<DragUpdate, TimelineError> {
    let pointer_time = ctx.canvas.x_to_time(pointer.x);
    let proposed = ctx.snap.snap(pointer_time.saturating_add(drag.start_offset));

    let group_delta = if drag.can_change_group {
        let rows_above = ctx.group_tops.partition_point(|top| *top <= pointer.y);
        match rows_above.checked_sub(1) {
            Some(target) => target as isize - drag.pre_drag_group_order as isize,
            None => 0,
        }
    } else {
        0
    };

    let time = ctx.validate(ValidationAction::Move, &drag.item, proposed, None)?;
    let group_order = drag.pre_drag_group_order.saturating_add_signed(group_delta);
    Ok(DragUpdate {
        item_id: drag.item.id.clone(),
        time,
        group_order,
        group_delta,
    })
}

fn resize_update(
    resize: &ResizeState,
    edge: ResizeEdge,
    pointer: PointerPosition,
    ctx: &InteractionContext<'_>,
) -> Result<ResizeUpdate, TimelineError> {
    let item = &resize.item;
    let duration = item.duration();
    let min_duration = ctx.snap.min_duration();

    let raw_delta = ((pointer.x - resize.start_x) * ctx.canvas.time_per_pixel()).round() as i64;
    let mut delta = ctx.snap.floor(raw_delta);
    match edge {
        ResizeEdge::Left if duration.saturating_sub(delta) < min_duration => {
            delta = duration - min_duration
        }
        ResizeEdge::Right if duration.saturating_add(delta) < min_duration => {
            delta = min_duration - duration
        }
        _ => {}
    }

    let original = match edge {
        ResizeEdge::Left => item.start_time,
        ResizeEdge::Right => item.start_time.saturating_add(duration),
    };
    let proposed = original.saturating_add(delta);
    let time = ctx.validate(ValidationAction::Resize, item, proposed, Some(edge))?;
    Ok(ResizeUpdate {
        item_id: item.id.clone(),
        time,
        edge,
        delta: time.saturating_sub(original),
    })
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;
