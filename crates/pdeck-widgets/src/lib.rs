#![forbid(unsafe_code)]

//! Widgets for the proof view.
//!
//! - [`hypothesis::HypothesisRow`] and [`goal::GoalRow`] draw one entity
//!   each, with the drag/drop affordance of the current hover state.
//! - [`menu::ContextMenu`] is the per-entity suggestion menu.
//! - [`button::Button`] is the exit control of a finished session.
//! - [`dnd`] is the drag-and-drop capability layer: [`dnd::DragSource`],
//!   [`dnd::DropTarget`] and the [`dnd::DndManager`] that tracks one drag.

pub mod button;
pub mod dnd;
pub mod goal;
pub mod hypothesis;
pub mod menu;

use pdeck_core::geometry::Rect;
use pdeck_render::frame::Frame;

/// A renderable component.
///
/// Widgets draw into the frame's buffer within `area` and register the
/// cells they want pointer events for in its hit grid.
pub trait Widget {
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// How an entity row shows its part in the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affordance {
    /// Not involved in a drag.
    #[default]
    Idle,
    /// The hypothesis being dragged.
    Source,
    /// Hovered, and the last accept test succeeded.
    Accepting,
    /// Hovered, and the last accept test failed.
    Rejecting,
}

impl Affordance {
    /// Two-cell gutter drawn in front of the row.
    #[must_use]
    pub const fn gutter(self) -> &'static str {
        match self {
            Self::Idle => "  ",
            Self::Source => "▸ ",
            Self::Accepting => "✓ ",
            Self::Rejecting => "✗ ",
        }
    }

    #[must_use]
    pub fn flags(self) -> pdeck_render::cell::CellFlags {
        use pdeck_render::cell::CellFlags;
        match self {
            Self::Idle => CellFlags::empty(),
            Self::Source => CellFlags::BOLD,
            Self::Accepting => CellFlags::REVERSE,
            Self::Rejecting => CellFlags::DIM,
        }
    }
}
