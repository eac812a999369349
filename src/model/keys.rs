//! Field-name mapping for declarative item and group records.

use serde::{Deserialize, Serialize};

/// Property names used to read ids, groups and times from JSON records.
///
/// Lets callers keep their own record shape, e.g. `{"key": .., "row": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Keys {
    /// Group id property.
    pub group_id_key: String,
    /// Group title property.
    pub group_title_key: String,
    /// Item id property.
    pub item_id_key: String,
    /// Item title property.
    pub item_title_key: String,
    /// Item group property.
    pub item_group_key: String,
    /// Item start time property.
    pub item_time_start_key: String,
    /// Item end time property.
    pub item_time_end_key: String,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            group_id_key: "id".to_string(),
            group_title_key: "title".to_string(),
            item_id_key: "id".to_string(),
            item_title_key: "title".to_string(),
            item_group_key: "group".to_string(),
            item_time_start_key: "start_time".to_string(),
            item_time_end_key: "end_time".to_string(),
        }
    }
}
