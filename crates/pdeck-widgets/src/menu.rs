#![forbid(unsafe_code)]

//! Per-entity suggestion menu.
//!
//! A [`ContextMenu`] is created when a menu opens, from the suggestions the
//! engine returns at that moment, and dropped when it closes; nothing
//! survives between two openings. An empty suggestion set yields a menu
//! that draws an empty box and can run nothing.
//!
//! Placement follows the pointer: below and to the right of the anchor,
//! flipped above when the rows would not fit, and shifted left to stay in
//! the viewport.

use pdeck_core::engine::Suggestion;
use pdeck_core::geometry::{Position, Rect};
use pdeck_core::tactic::Entity;
use pdeck_render::cell::CellFlags;
use pdeck_render::display_width;
use pdeck_render::frame::{Frame, HitId, HitRegion};

/// Transient state of one open menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    entity: Entity,
    anchor: Position,
    items: Vec<Suggestion>,
    selected: usize,
}

impl ContextMenu {
    /// Open on `entity` at `anchor`. The default suggestion, if any, starts
    /// selected.
    pub fn open(entity: Entity, anchor: Position, items: Vec<Suggestion>) -> Self {
        let selected = items.iter().position(|s| s.is_default).unwrap_or(0);
        Self {
            entity,
            anchor,
            items,
            selected,
        }
    }

    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    /// A menu with nothing to run.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Suggestion> {
        self.items.get(self.selected)
    }

    pub fn item(&self, index: usize) -> Option<&Suggestion> {
        self.items.get(index)
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    fn label(item: &Suggestion, marker: &str) -> String {
        if item.is_default {
            format!("{marker} {}", item.fragment)
        } else {
            format!("  {}", item.fragment)
        }
    }

    fn content_width(&self, marker: &str) -> u16 {
        let widest = self
            .items
            .iter()
            .map(|item| display_width(&Self::label(item, marker)))
            .max()
            .unwrap_or(0);
        (widest.max(4) as u16).saturating_add(2)
    }

    /// Where the menu lands inside `viewport`, border included.
    ///
    /// Returns `None` when the viewport cannot fit even an empty box.
    #[must_use]
    pub fn area(&self, viewport: Rect, marker: &str) -> Option<Rect> {
        if viewport.width < 3 || viewport.height < 2 {
            return None;
        }
        let width = self.content_width(marker).min(viewport.width);
        let wanted = (self.items.len() as u16).saturating_add(2);

        let below_top = self.anchor.y.saturating_add(1);
        let below = viewport.bottom().saturating_sub(below_top);
        let above = self.anchor.y.saturating_sub(viewport.y);
        let (y, height) = if below >= wanted || below >= above {
            (below_top, wanted.min(below))
        } else {
            let height = wanted.min(above);
            (self.anchor.y - height, height)
        };
        if height < 2 {
            return None;
        }

        Some(Rect::new(clamp_x(self.anchor.x, width, viewport), y, width, height))
    }

    /// Draw into `frame` and register the box as `id`: the whole area as
    /// [`HitRegion::Content`], each visible row as [`HitRegion::MenuItem`]
    /// with its index as data.
    pub fn render(&self, frame: &mut Frame, id: HitId, marker: &str) {
        let Some(area) = self.area(frame.bounds(), marker) else {
            return;
        };
        frame.buffer.clear_rect(area);
        draw_border(frame, area);
        frame.register_hit(area, id, HitRegion::Content, 0);

        let inner_width = area.width.saturating_sub(2);
        let visible = area.height.saturating_sub(2) as usize;
        for (i, item) in self.items.iter().take(visible).enumerate() {
            let y = area.y + 1 + i as u16;
            let flags = if i == self.selected {
                CellFlags::REVERSE
            } else {
                CellFlags::empty()
            };
            let row = Rect::new(area.x + 1, y, inner_width, 1);
            frame
                .buffer
                .set_string(row.x, y, &Self::label(item, marker), flags, inner_width);
            frame.buffer.add_flags(row, flags);
            frame.register_hit(row, id, HitRegion::MenuItem, i as u64);
        }
    }
}

fn clamp_x(x: u16, width: u16, viewport: Rect) -> u16 {
    let max_x = viewport.right().saturating_sub(width);
    x.clamp(viewport.x, max_x.max(viewport.x))
}

fn draw_border(frame: &mut Frame, area: Rect) {
    let buf = &mut frame.buffer;
    let right = area.right().saturating_sub(1);
    let bottom = area.bottom().saturating_sub(1);
    for x in area.x..area.right() {
        let (top, bot) = if x == area.x {
            ("┌", "└")
        } else if x == right {
            ("┐", "┘")
        } else {
            ("─", "─")
        };
        buf.set_string(x, area.y, top, CellFlags::empty(), 1);
        buf.set_string(x, bottom, bot, CellFlags::empty(), 1);
    }
    for y in area.y + 1..bottom {
        buf.set_string(area.x, y, "│", CellFlags::empty(), 1);
        buf.set_string(right, y, "│", CellFlags::empty(), 1);
    }
}
