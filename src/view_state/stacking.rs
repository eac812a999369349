//! Item stacking: lane assignment and pixel geometry.
//!
//! [`stack`] is a pure function of its inputs. The resulting [`Layout`] is
//! replaced wholesale on every recompute, never patched.
//!
//! # Algorithm
//!
//! 1. Drop items outside the canvas and items whose group is unknown.
//! 2. Apply the provisional override for the item under drag or resize.
//! 3. Per group, sort by start (stable) and place each item in the lowest lane
//!    whose last end is not after the item's start.
//! 4. Group heights are `max(1, lanes) × line_height`; tops are their prefix sums.

use crate::model::{EpochMillis, Group, GroupOrders, Item, ItemId};
use crate::view_state::types::{CanvasWindow, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Geometry options for [`stack`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackOptions {
    /// Place overlapping items in separate lanes. When false every item is in lane 0.
    pub stack_items: bool,
    /// Height of one lane in px.
    pub line_height: f64,
    /// Item height as a fraction of `line_height`.
    pub item_height_ratio: f64,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            stack_items: false,
            line_height: 30.0,
            item_height_ratio: 0.65,
        }
    }
}

/// Provisional values for the single item under an active drag or resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionOverride {
    /// Item being edited.
    pub item_id: ItemId,
    /// Provisional start.
    pub start_time: EpochMillis,
    /// Provisional end.
    pub end_time: EpochMillis,
    /// Provisional group order. `None` keeps the item's own group.
    pub group_order: Option<usize>,
}

/// Derived geometry for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemDimension {
    /// Pixel rectangle on the canvas.
    #[serde(flatten)]
    pub dimension: Dimension,
    /// Lane within the group.
    pub lane: usize,
    /// Row order of the group the item is drawn in.
    pub group_order: usize,
    /// Start used for the geometry (provisional during an interaction).
    pub start_time: EpochMillis,
    /// End used for the geometry (provisional during an interaction).
    pub end_time: EpochMillis,
}

/// Output of [`stack`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Geometry of every item that intersects the canvas.
    pub dimension_items: BTreeMap<ItemId, ItemDimension>,
    /// Total height of all groups in px.
    pub height: f64,
    /// Height of each group, indexed by group order.
    pub group_heights: Vec<f64>,
    /// Top of each group, indexed by group order.
    pub group_tops: Vec<f64>,
}

impl Layout {
    /// Geometry of one item, if it is on the canvas.
    pub fn dimension(&self, id: &ItemId) -> Option<&ItemDimension> {
        self.dimension_items.get(id)
    }

    /// Group order of the row containing canvas y `top`, if any.
    pub fn group_at(&self, top: f64) -> Option<usize> {
        if top < 0.0 || top >= self.height {
            return None;
        }
        let rows_above = self.group_tops.partition_point(|row_top| *row_top <= top);
        rows_above.checked_sub(1)
    }
}

struct Candidate<'a> {
    id: &'a ItemId,
    start: EpochMillis,
    end: EpochMillis,
}

/// Whether `[start, end)` intersects the canvas. Zero-width items count as the point `start`.
fn intersects_canvas(start: EpochMillis, end: EpochMillis, canvas: &CanvasWindow) -> bool {
    if start >= canvas.canvas_time_end {
        return false;
    }
    if end > start {
        end > canvas.canvas_time_start
    } else {
        start >= canvas.canvas_time_start
    }
}

/// Assign lanes and compute item geometry, group heights and total height.
pub fn stack(
    items: &[Item],
    groups: &[Group],
    canvas: &CanvasWindow,
    options: &StackOptions,
    interaction: Option<&InteractionOverride>,
) -> Layout {
    let orders = GroupOrders::new(groups);
    let mut buckets: Vec<Vec<Candidate<'_>>> = (0..groups.len()).map(|_| Vec::new()).collect();

    for item in items {
        let edited = interaction.filter(|o| o.item_id == item.id);
        let (start, end) = match edited {
            Some(o) => (o.start_time, o.end_time.max(o.start_time)),
            None => (item.start_time, item.effective_end()),
        };

        let order = match edited.and_then(|o| o.group_order) {
            Some(order) if order < groups.len() => Some(order),
            _ => orders.get(&item.group),
        };
        let Some(order) = order else {
            tracing::debug!(item = %item.id, group = %item.group, "item references unknown group, skipped");
            continue;
        };

        if !intersects_canvas(start, end, canvas) {
            continue;
        }

        buckets[order].push(Candidate {
            id: &item.id,
            start,
            end,
        });
    }

    let line_height = options.line_height;
    let item_height = line_height * options.item_height_ratio;

    let mut placed: Vec<Vec<(usize, Candidate<'_>)>> = Vec::with_capacity(buckets.len());
    let mut group_heights = Vec::with_capacity(buckets.len());
    for mut bucket in buckets {
        bucket.sort_by_key(|c| c.start);

        let mut lane_ends: Vec<EpochMillis> = Vec::new();
        let mut lanes = Vec::with_capacity(bucket.len());
        for candidate in bucket {
            let lane = if options.stack_items {
                match lane_ends.iter().position(|&lane_end| lane_end <= candidate.start) {
                    Some(free) => {
                        lane_ends[free] = candidate.end;
                        free
                    }
                    None => {
                        lane_ends.push(candidate.end);
                        lane_ends.len() - 1
                    }
                }
            } else {
                0
            };
            lanes.push((lane, candidate));
        }

        let lane_count = lanes.iter().map(|(lane, _)| lane + 1).max().unwrap_or(1);
        group_heights.push(line_height.max(lane_count as f64 * line_height));
        placed.push(lanes);
    }

    let mut group_tops = Vec::with_capacity(group_heights.len());
    let mut height = 0.0;
    for group_height in &group_heights {
        group_tops.push(height);
        height += group_height;
    }

    let mut dimension_items = BTreeMap::new();
    for (group_order, lanes) in placed.into_iter().enumerate() {
        let group_top = group_tops[group_order];
        for (lane, candidate) in lanes {
            let left = canvas.time_to_x(candidate.start);
            let right = canvas.time_to_x(candidate.end);
            dimension_items.insert(
                candidate.id.clone(),
                ItemDimension {
                    dimension: Dimension {
                        left,
                        top: group_top + lane as f64 * line_height,
                        width: (right - left).max(1.0),
                        height: item_height,
                    },
                    lane,
                    group_order,
                    start_time: candidate.start,
                    end_time: candidate.end,
                },
            );
        }
    }

    tracing::trace!(
        items = dimension_items.len(),
        groups = group_heights.len(),
        height,
        "stacked"
    );

    Layout {
        dimension_items,
        height,
        group_heights,
        group_tops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupId;

    fn group(id: &str) -> Group {
        Group::new(GroupId::new(id).unwrap())
    }

    fn item(id: &str, group: &str, start: EpochMillis, end: EpochMillis) -> Item {
        Item::new(
            ItemId::new(id).unwrap(),
            GroupId::new(group).unwrap(),
            start,
            end,
        )
    }

    fn canvas() -> CanvasWindow {
        CanvasWindow {
            canvas_time_start: 0,
            canvas_time_end: 1_000,
            width: 100.0,
        }
    }

    fn stacked() -> StackOptions {
        StackOptions {
            stack_items: true,
            ..StackOptions::default()
        }
    }

    fn lane(layout: &Layout, id: &str) -> usize {
        layout.dimension(&ItemId::new(id).unwrap()).unwrap().lane
    }

    mod lanes {
        use super::*;

        #[test]
        fn overlapping_items_get_separate_lanes() {
            let items = vec![
                item("a", "g", 0, 100),
                item("b", "g", 50, 150),
                item("c", "g", 200, 300),
            ];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert_eq!(lane(&layout, "a"), 0);
            assert_eq!(lane(&layout, "b"), 1);
            assert_eq!(lane(&layout, "c"), 0);
        }

        #[test]
        fn touching_items_share_a_lane() {
            let items = vec![item("a", "g", 0, 100), item("b", "g", 100, 200)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert_eq!(lane(&layout, "b"), 0);
        }

        #[test]
        fn input_order_does_not_matter() {
            let items = vec![item("b", "g", 50, 150), item("a", "g", 0, 100)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert_eq!(lane(&layout, "a"), 0);
            assert_eq!(lane(&layout, "b"), 1);
        }

        #[test]
        fn equal_starts_keep_input_order() {
            let items = vec![item("second", "g", 0, 100), item("first", "g", 0, 100)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert_eq!(lane(&layout, "second"), 0);
            assert_eq!(lane(&layout, "first"), 1);
        }

        #[test]
        fn without_stacking_everything_is_lane_zero() {
            let items = vec![item("a", "g", 0, 100), item("b", "g", 50, 150)];
            let layout = stack(
                &items,
                &[group("g")],
                &canvas(),
                &StackOptions::default(),
                None,
            );
            assert_eq!(lane(&layout, "a"), 0);
            assert_eq!(lane(&layout, "b"), 0);
            assert_eq!(layout.group_heights, vec![30.0]);
        }

        #[test]
        fn groups_stack_independently() {
            let items = vec![item("a", "g1", 0, 100), item("b", "g2", 50, 150)];
            let layout = stack(
                &items,
                &[group("g1"), group("g2")],
                &canvas(),
                &stacked(),
                None,
            );
            assert_eq!(lane(&layout, "b"), 0);
        }
    }

    mod heights {
        use super::*;

        #[test]
        fn empty_groups_get_one_row() {
            let layout = stack(
                &[],
                &[group("a"), group("b")],
                &canvas(),
                &stacked(),
                None,
            );
            assert_eq!(layout.group_heights, vec![30.0, 30.0]);
            assert_eq!(layout.group_tops, vec![0.0, 30.0]);
            assert_eq!(layout.height, 60.0);
        }

        #[test]
        fn group_height_grows_with_lanes() {
            let items = vec![item("a", "g1", 0, 100), item("b", "g1", 50, 150)];
            let layout = stack(
                &items,
                &[group("g1"), group("g2")],
                &canvas(),
                &stacked(),
                None,
            );
            assert_eq!(layout.group_heights, vec![60.0, 30.0]);
            assert_eq!(layout.group_tops, vec![0.0, 60.0]);
            assert_eq!(layout.height, 90.0);
        }

        #[test]
        fn item_top_includes_group_top_and_lane() {
            let items = vec![
                item("a", "g1", 0, 100),
                item("b", "g2", 0, 100),
                item("c", "g2", 50, 150),
            ];
            let layout = stack(
                &items,
                &[group("g1"), group("g2")],
                &canvas(),
                &stacked(),
                None,
            );
            let c = layout.dimension(&ItemId::new("c").unwrap()).unwrap();
            assert_eq!(c.dimension.top, 60.0);
            assert_eq!(c.dimension.height, 30.0 * 0.65);
        }

        #[test]
        fn group_at_finds_row_under_y() {
            let layout = stack(
                &[],
                &[group("a"), group("b")],
                &canvas(),
                &stacked(),
                None,
            );
            assert_eq!(layout.group_at(0.0), Some(0));
            assert_eq!(layout.group_at(29.9), Some(0));
            assert_eq!(layout.group_at(30.0), Some(1));
            assert_eq!(layout.group_at(60.0), None);
            assert_eq!(layout.group_at(-1.0), None);
        }
    }

    mod geometry {
        use super::*;

        #[test]
        fn left_and_width_follow_canvas_mapping() {
            let items = vec![item("a", "g", 100, 200)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            let dim = layout.dimension(&ItemId::new("a").unwrap()).unwrap().dimension;
            assert_eq!(dim.left, 30.0);
            assert_eq!(dim.width, 30.0);
        }

        #[test]
        fn zero_width_items_render_one_pixel() {
            let items = vec![item("a", "g", 100, 100)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            let dim = layout.dimension(&ItemId::new("a").unwrap()).unwrap().dimension;
            assert_eq!(dim.width, 1.0);
        }

        #[test]
        fn item_spanning_all_of_i64_covers_the_canvas() {
            let items = vec![item("a", "g", i64::MIN + 10, i64::MAX - 10)];
            let canvas = CanvasWindow {
                canvas_time_start: 1_000_000,
                canvas_time_end: 2_000_000,
                width: 100.0,
            };
            let layout = stack(&items, &[group("g")], &canvas, &stacked(), None);
            let dim = layout.dimension(&ItemId::new("a").unwrap()).unwrap().dimension;
            assert!(dim.left < 0.0);
            assert!(dim.left + dim.width > canvas.canvas_width());
        }
    }

    mod filtering {
        use super::*;

        #[test]
        fn items_outside_canvas_get_no_dimension() {
            let items = vec![
                item("before", "g", -500, 0),
                item("after", "g", 1_000, 1_500),
                item("inside", "g", -500, 1),
            ];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert_eq!(layout.dimension_items.len(), 1);
            assert!(layout
                .dimension_items
                .contains_key(&ItemId::new("inside").unwrap()));
        }

        #[test]
        fn zero_width_item_at_canvas_start_is_visible() {
            let items = vec![item("a", "g", 0, 0)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert_eq!(layout.dimension_items.len(), 1);
        }

        #[test]
        fn unknown_group_items_are_dropped() {
            let items = vec![item("a", "missing", 0, 100)];
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), None);
            assert!(layout.dimension_items.is_empty());
            assert_eq!(layout.height, 30.0);
        }
    }

    mod interaction_override {
        use super::*;

        #[test]
        fn override_replaces_times_and_group() {
            let items = vec![item("a", "g1", 0, 100)];
            let edit = InteractionOverride {
                item_id: ItemId::new("a").unwrap(),
                start_time: 200,
                end_time: 300,
                group_order: Some(1),
            };
            let layout = stack(
                &items,
                &[group("g1"), group("g2")],
                &canvas(),
                &stacked(),
                Some(&edit),
            );
            let dim = layout.dimension(&ItemId::new("a").unwrap()).unwrap();
            assert_eq!(dim.start_time, 200);
            assert_eq!(dim.group_order, 1);
            assert_eq!(dim.dimension.top, 30.0);
        }

        #[test]
        fn override_can_create_overlap() {
            let items = vec![item("a", "g", 0, 100), item("b", "g", 500, 600)];
            let edit = InteractionOverride {
                item_id: ItemId::new("b").unwrap(),
                start_time: 50,
                end_time: 150,
                group_order: None,
            };
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), Some(&edit));
            assert_eq!(lane(&layout, "b"), 1);
        }

        #[test]
        fn out_of_range_group_order_keeps_own_group() {
            let items = vec![item("a", "g", 0, 100)];
            let edit = InteractionOverride {
                item_id: ItemId::new("a").unwrap(),
                start_time: 0,
                end_time: 100,
                group_order: Some(7),
            };
            let layout = stack(&items, &[group("g")], &canvas(), &stacked(), Some(&edit));
            assert_eq!(
                layout.dimension(&ItemId::new("a").unwrap()).unwrap().group_order,
                0
            );
        }
    }

    #[test]
    fn stacking_is_idempotent() {
        let items = vec![
            item("a", "g", 0, 100),
            item("b", "g", 50, 150),
            item("c", "g", 60, 70),
        ];
        let groups = [group("g")];
        let first = stack(&items, &groups, &canvas(), &stacked(), None);
        let second = stack(&items, &groups, &canvas(), &stacked(), None);
        assert_eq!(first, second);
    }
}
