//! Timeline state machine.
//!
//! Interaction bookkeeping and the state holder that composes the pure
//! view-state functions per event. Testable without any renderer.

pub mod events;
pub mod interaction;
pub mod rate_limit;
pub mod scroll_handler;
pub mod selection;
pub mod snap;
pub mod timeline;

// Re-export for convenience
pub use events::{TimelineContext, TimelineEvent};
pub use interaction::{InteractionMachine, InteractionState, MoveResizeValidator, PointerPosition, ValidationAction};
pub use scroll_handler::{PanTracker, ScrollAction, TouchPoint};
pub use selection::{ClickKind, Selection};
pub use snap::SnapConfig;
pub use timeline::{TimelineState, TimelineStateBuilder};
