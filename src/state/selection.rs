//! Item selection.
//!
//! Uncontrolled by default: the engine tracks one selected item. A caller can
//! take control by supplying its own selected list, which then wins for
//! [`Selection::is_selected`].

use crate::model::ItemId;

/// How an item was tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Mouse click.
    Click,
    /// Touch tap.
    Touch,
}

/// Selected-item tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ItemId>,
    controlled: Option<Vec<ItemId>>,
}

impl Selection {
    /// Nothing selected, uncontrolled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` counts as selected.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        match &self.controlled {
            Some(list) => list.contains(id),
            None => self.selected.as_ref() == Some(id),
        }
    }

    /// The item selected by the engine itself.
    pub fn selected_item(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    /// The caller-controlled list, if any.
    pub fn controlled(&self) -> Option<&[ItemId]> {
        self.controlled.as_deref()
    }

    /// Hand selection to the caller (`Some`) or back to the engine (`None`).
    pub fn set_controlled(&mut self, selected: Option<Vec<ItemId>>) {
        self.controlled = selected;
    }

    /// Select `id`, replacing any previous engine selection.
    pub fn select(&mut self, id: ItemId) {
        self.selected = Some(id);
    }

    /// Clear the engine selection, returning what was selected.
    pub fn clear(&mut self) -> Option<ItemId> {
        self.selected.take()
    }
}

/// Suppresses a click when the pointer travelled further than the tolerance
/// between press and release, so a pan does not end in a canvas click.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickGuard {
    origin_x: Option<f64>,
    cancelled: bool,
}

impl ClickGuard {
    /// Pointer pressed at `x`.
    pub fn pointer_down(&mut self, x: f64) {
        self.origin_x = Some(x);
        self.cancelled = false;
    }

    /// Pointer released at `x`.
    pub fn pointer_up(&mut self, x: f64, tolerance: f64) {
        if let Some(origin) = self.origin_x.take() {
            self.cancelled = (origin - x).abs() > tolerance;
        }
    }

    /// Whether the click that follows the release should fire. Resets the guard.
    pub fn take_click(&mut self) -> bool {
        !std::mem::take(&mut self.cancelled)
    }
}
