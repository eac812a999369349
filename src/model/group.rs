//! Groups (rows) and their display order.

use super::identifiers::GroupId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A row of the timeline.
///
/// A group's order is its position in the input sequence, not any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique id.
    pub id: GroupId,
    /// Display title, passed through to renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Group {
    /// Create a group without a title.
    pub fn new(id: GroupId) -> Self {
        Self { id, title: None }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Lookup from group id to zero-based row order.
///
/// When ids repeat, the first occurrence keeps its order and later
/// duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct GroupOrders<'a> {
    orders: HashMap<&'a GroupId, usize>,
}

impl<'a> GroupOrders<'a> {
    /// Index groups by id.
    pub fn new(groups: &'a [Group]) -> Self {
        let mut orders = HashMap::with_capacity(groups.len());
        for (order, group) in groups.iter().enumerate() {
            if orders.contains_key(&group.id) {
                tracing::debug!(group = %group.id, order, "duplicate group id ignored");
                continue;
            }
            orders.insert(&group.id, order);
        }
        Self { orders }
    }

    /// Row order of a group, if known.
    pub fn get(&self, id: &GroupId) -> Option<usize> {
        self.orders.get(id).copied()
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no groups are known.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
