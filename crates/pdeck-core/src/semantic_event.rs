#![forbid(unsafe_code)]

//! High-level pointer intentions derived from raw input.
//!
//! [`SemanticEvent`] is what the proof view reacts to: a double click means
//! "run the default suggestion", a right click means "open the menu", a drag
//! sequence means "apply this hypothesis somewhere".
//!
//! # Invariants
//! 1. Every drag sequence is well-formed: `DragStart` → zero or more
//!    `DragMove` → exactly one of `DragEnd` or `DragCancel`.
//! 2. A press/release pair produces either a click-family event or a drag
//!    termination, never both.

use crate::event::MouseButton;
use crate::geometry::Position;

/// High-level pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticEvent {
    /// Press and release at the same spot.
    Click { pos: Position, button: MouseButton },

    /// Second left click within the multi-click window.
    DoubleClick { pos: Position },

    /// Right click: request for a contextual menu at `pos`.
    ContextMenu { pos: Position },

    /// Pointer moved past the drag threshold with a button held.
    DragStart { pos: Position, button: MouseButton },

    /// Hover tick during a drag.
    DragMove {
        start: Position,
        current: Position,
        /// Movement since the previous tick (dx, dy).
        delta: (i16, i16),
    },

    /// Button released after a drag.
    DragEnd { start: Position, end: Position },

    /// Drag abandoned (Escape, focus loss).
    DragCancel,
}

impl SemanticEvent {
    /// Whether this event belongs to a drag sequence.
    #[must_use]
    pub const fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. } | Self::DragMove { .. } | Self::DragEnd { .. } | Self::DragCancel
        )
    }

    /// The position most relevant to this event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Click { pos, .. }
            | Self::DoubleClick { pos }
            | Self::ContextMenu { pos }
            | Self::DragStart { pos, .. } => Some(*pos),
            Self::DragMove { current, .. } => Some(*current),
            Self::DragEnd { end, .. } => Some(*end),
            Self::DragCancel => None,
        }
    }
}
