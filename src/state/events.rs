//! Notifications produced by the state holder.
//!
//! The engine never calls back into renderers or application code. Every
//! operation on `TimelineState` returns the events it caused, in order.

use crate::model::{EpochMillis, GroupId, ItemId, ResizeEdge};
use crate::view_state::time_units::TimeUnit;
use serde::Serialize;

/// Snapshot of the time window, attached to zoom notifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineContext {
    /// Visible range start.
    pub visible_time_start: EpochMillis,
    /// Visible range end.
    pub visible_time_end: EpochMillis,
    /// Canvas start.
    pub canvas_time_start: EpochMillis,
    /// Canvas end.
    pub canvas_time_end: EpochMillis,
    /// Viewport width in px.
    pub timeline_width: f64,
}

/// Something the caller may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    /// Empty canvas clicked.
    CanvasClick {
        /// Row that was clicked.
        group_id: GroupId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// Empty canvas double-clicked.
    CanvasDoubleClick {
        /// Row that was clicked.
        group_id: GroupId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// Context menu requested on the empty canvas.
    CanvasContextMenu {
        /// Row under the pointer.
        group_id: GroupId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// An already selected item was clicked.
    ItemClick {
        /// Clicked item.
        item_id: ItemId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// An item became selected.
    ItemSelect {
        /// Selected item.
        item_id: ItemId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// The selection was cleared.
    ItemDeselect,
    /// An item was double-clicked.
    ItemDoubleClick {
        /// Clicked item.
        item_id: ItemId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// Context menu requested on an item.
    ItemContextMenu {
        /// Item under the pointer.
        item_id: ItemId,
        /// Snapped time under the pointer.
        time: EpochMillis,
    },
    /// Provisional drag position.
    ItemDrag {
        /// Dragged item.
        item_id: ItemId,
        /// Provisional start time.
        time: EpochMillis,
        /// Provisional group order.
        new_group_order: usize,
    },
    /// A drag was committed.
    ItemMove {
        /// Moved item.
        item_id: ItemId,
        /// New start time.
        time: EpochMillis,
        /// New group order.
        new_group_order: usize,
    },
    /// Provisional resize position.
    ItemResizing {
        /// Resized item.
        item_id: ItemId,
        /// Provisional edge time.
        time: EpochMillis,
        /// Moving edge.
        edge: ResizeEdge,
    },
    /// A resize was committed.
    ItemResize {
        /// Resized item.
        item_id: ItemId,
        /// New edge time.
        time: EpochMillis,
        /// Edge that moved.
        edge: ResizeEdge,
        /// Change of the edge time.
        delta: i64,
    },
    /// The visible zoom width changed.
    Zoom {
        /// Window after the change.
        context: TimelineContext,
        /// Smallest readable header unit at the new zoom.
        unit: TimeUnit,
    },
    /// The canvas moved; data outside `[canvas_time_start, canvas_time_end)` is not needed.
    BoundsChange {
        /// New canvas start.
        canvas_time_start: EpochMillis,
        /// New canvas end.
        canvas_time_end: EpochMillis,
    },
}
