#![forbid(unsafe_code)]

//! Drag-and-drop as a capability, independent of how gestures are read.
//!
//! Anything draggable implements [`DragSource`]; anything that can receive
//! a drop implements [`DropTarget`]. A [`DndManager`] tracks the single drag
//! in flight: which payload it carries, which target the pointer is over,
//! and what that target's accept test said on the latest hover tick.
//!
//! # Invariants
//! 1. The accept test runs on every hover tick, never cached across ticks.
//! 2. `on_drop` runs only for the hovered target whose latest accept test
//!    returned `true`.
//! 3. Whatever ends a drag (drop, rejection, cancel) leaves the manager
//!    idle; an abandoned drag never reaches a target.

use tracing::{debug, trace};

/// What a drag carries: the name of the hypothesis being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub source: String,
}

impl DragPayload {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Something a drag can start from.
pub trait DragSource {
    /// The payload to carry, or `None` if this item cannot be dragged now.
    fn drag_payload(&self) -> Option<DragPayload>;
}

/// Something a drag can end on.
pub trait DropTarget {
    /// Identity used to tell targets apart between hover ticks.
    type Key: Clone + PartialEq + std::fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Accept test, re-evaluated on every hover tick.
    fn can_accept(&self, payload: &DragPayload) -> bool;

    /// Called once when an accepted payload is released here.
    fn on_drop(&self, payload: &DragPayload);
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome<K> {
    /// Released on `K`, whose accept test passed; `on_drop` ran.
    Dropped(K),
    /// Released on `K`, whose accept test failed. Nothing ran.
    Rejected(K),
    /// Released outside any target.
    Missed,
    /// No drag was in flight.
    Idle,
}

#[derive(Debug, Clone)]
struct Hover<K> {
    key: K,
    accepted: bool,
}

#[derive(Debug, Clone)]
struct ActiveDrag<K> {
    payload: DragPayload,
    hover: Option<Hover<K>>,
}

/// Tracks at most one drag.
#[derive(Debug, Clone)]
pub struct DndManager<K> {
    active: Option<ActiveDrag<K>>,
}

impl<K> Default for DndManager<K> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> DndManager<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging from `source`. Replaces any drag in flight.
    ///
    /// Returns `false` if the source has nothing to carry.
    pub fn begin<S: DragSource + ?Sized>(&mut self, source: &S) -> bool {
        let Some(payload) = source.drag_payload() else {
            return false;
        };
        debug!(source = %payload.source, "drag started");
        self.active = Some(ActiveDrag {
            payload,
            hover: None,
        });
        true
    }

    /// One hover tick over `target` (or over nothing).
    ///
    /// Returns the fresh accept result, or `None` when not dragging or not
    /// over a target.
    pub fn hover<T>(&mut self, target: Option<&T>) -> Option<bool>
    where
        T: DropTarget<Key = K> + ?Sized,
    {
        let drag = self.active.as_mut()?;
        let Some(target) = target else {
            drag.hover = None;
            return None;
        };
        let accepted = target.can_accept(&drag.payload);
        trace!(target = ?target.key(), accepted, "hover tick");
        drag.hover = Some(Hover {
            key: target.key(),
            accepted,
        });
        Some(accepted)
    }

    /// Release over `target` and end the drag.
    ///
    /// If the release lands on a target the pointer was not last hovering,
    /// that target gets one hover tick first so a check always precedes the
    /// drop.
    pub fn release<T>(&mut self, target: Option<&T>) -> DropOutcome<K>
    where
        T: DropTarget<Key = K> + ?Sized,
    {
        if self.active.is_none() {
            return DropOutcome::Idle;
        }
        let Some(target) = target else {
            self.active = None;
            debug!("drag released outside any target");
            return DropOutcome::Missed;
        };
        let key = target.key();
        let fresh = self
            .hovered()
            .is_none_or(|(hovered, _)| *hovered != key);
        if fresh {
            self.hover(Some(target));
        }
        let Some(drag) = self.active.take() else {
            return DropOutcome::Idle;
        };
        let accepted = drag.hover.as_ref().is_some_and(|h| h.key == key && h.accepted);
        if accepted {
            debug!(target = ?key, source = %drag.payload.source, "drop accepted");
            target.on_drop(&drag.payload);
            DropOutcome::Dropped(key)
        } else {
            debug!(target = ?key, source = %drag.payload.source, "drop rejected");
            DropOutcome::Rejected(key)
        }
    }

    /// Abandon the drag. Returns whether one was in flight.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active.take().is_some();
        if was_active {
            debug!("drag cancelled");
        }
        was_active
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn payload(&self) -> Option<&DragPayload> {
        self.active.as_ref().map(|d| &d.payload)
    }

    /// The hovered target and its latest accept result.
    #[must_use]
    pub fn hovered(&self) -> Option<(&K, bool)> {
        self.active
            .as_ref()
            .and_then(|d| d.hover.as_ref())
            .map(|h| (&h.key, h.accepted))
    }
}
