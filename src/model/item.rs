//! Timeline items and their interaction capabilities.

use super::identifiers::{GroupId, ItemId};
use super::{DurationMillis, EpochMillis};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which horizontal edge of an item is being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    /// The start edge.
    Left,
    /// The end edge.
    Right,
}

impl ResizeEdge {
    /// The opposite edge.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Which edges of an item may be resized.
///
/// Accepts `false`, `true` (right edge), `"left"`, `"right"` or `"both"` when
/// deserialized, matching the declarative item format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeCapability {
    /// Resizing disabled.
    None,
    /// Only the start edge.
    Left,
    /// Only the end edge.
    #[default]
    Right,
    /// Either edge.
    Both,
}

impl ResizeCapability {
    /// Whether the start edge may be dragged.
    pub fn allows_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    /// Whether the end edge may be dragged.
    pub fn allows_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }

    /// Whether the given edge may be dragged.
    pub fn allows(self, edge: ResizeEdge) -> bool {
        match edge {
            ResizeEdge::Left => self.allows_left(),
            ResizeEdge::Right => self.allows_right(),
        }
    }

    /// Whether any edge may be dragged.
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }

    /// Parse the string form (`"left"`, `"right"`, `"both"`, `"true"`, `"false"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "left" => Some(Self::Left),
            "right" | "true" => Some(Self::Right),
            "both" => Some(Self::Both),
            "false" | "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl From<bool> for ResizeCapability {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Right
        } else {
            Self::None
        }
    }
}

impl Serialize for ResizeCapability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_bool(false),
            Self::Left => serializer.serialize_str("left"),
            Self::Right => serializer.serialize_str("right"),
            Self::Both => serializer.serialize_str("both"),
        }
    }
}

impl<'de> Deserialize<'de> for ResizeCapability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Edge(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(enabled) => Ok(Self::from(enabled)),
            Raw::Edge(raw) => Self::parse(&raw).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid resize capability '{raw}', expected left, right, both, true or false"
                ))
            }),
        }
    }
}

/// Resolved interaction capabilities for one item.
///
/// Also used as the engine-wide defaults that per-item flags override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCapabilities {
    /// Item may be dragged in time.
    pub can_move: bool,
    /// Which edges may be resized.
    pub can_resize: ResizeCapability,
    /// Item may be dragged to another group.
    pub can_change_group: bool,
    /// Item may be selected by a click or tap.
    pub can_select: bool,
}

impl Default for ItemCapabilities {
    fn default() -> Self {
        Self {
            can_move: true,
            can_resize: ResizeCapability::Right,
            can_change_group: true,
            can_select: true,
        }
    }
}

/// A time-bounded item assigned to a group.
///
/// The engine never mutates items; it derives geometry keyed by [`Item::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique id.
    pub id: ItemId,
    /// Owning group.
    pub group: GroupId,
    /// Inclusive start, ms since epoch.
    pub start_time: EpochMillis,
    /// Exclusive end, ms since epoch.
    pub end_time: EpochMillis,
    /// Display title, passed through to renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Extra style class, passed through to renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Per-item override of the move capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_move: Option<bool>,
    /// Per-item override of the resize capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_resize: Option<ResizeCapability>,
    /// Per-item override of the change-group capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_change_group: Option<bool>,
    /// Per-item override of the select capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_select: Option<bool>,
}

impl Item {
    /// Create an item with no per-item capability overrides.
    pub fn new(id: ItemId, group: GroupId, start_time: EpochMillis, end_time: EpochMillis) -> Self {
        Self {
            id,
            group,
            start_time,
            end_time,
            title: None,
            class_name: None,
            can_move: None,
            can_resize: None,
            can_change_group: None,
            can_select: None,
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Override capabilities for this item only.
    pub fn with_capabilities(mut self, capabilities: ItemCapabilities) -> Self {
        self.can_move = Some(capabilities.can_move);
        self.can_resize = Some(capabilities.can_resize);
        self.can_change_group = Some(capabilities.can_change_group);
        self.can_select = Some(capabilities.can_select);
        self
    }

    /// Duration in ms. Zero for degenerate items, never negative.
    pub fn duration(&self) -> DurationMillis {
        self.end_time.saturating_sub(self.start_time).max(0)
    }

    /// Effective end, never before the start.
    pub fn effective_end(&self) -> EpochMillis {
        self.end_time.max(self.start_time)
    }

    /// Resolve capabilities: per-item flags win over `defaults`.
    pub fn capabilities(&self, defaults: &ItemCapabilities) -> ItemCapabilities {
        ItemCapabilities {
            can_move: self.can_move.unwrap_or(defaults.can_move),
            can_resize: self.can_resize.unwrap_or(defaults.can_resize),
            can_change_group: self.can_change_group.unwrap_or(defaults.can_change_group),
            can_select: self.can_select.unwrap_or(defaults.can_select),
        }
    }
}
