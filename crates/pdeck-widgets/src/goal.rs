#![forbid(unsafe_code)]

//! Goal rows and the separators between them.
//!
//! The view draws the goal stack reversed, so the current goal is the last
//! row. A [`GoalSeparator`] precedes each goal and numbers it in display
//! order, `(i/n)`.

use pdeck_core::geometry::Rect;
use pdeck_render::cell::CellFlags;
use pdeck_render::display_width;
use pdeck_render::frame::{Frame, HitData, HitId, HitRegion};

use crate::{Affordance, Widget};

#[derive(Debug, Clone)]
pub struct GoalRow<'a> {
    ty: &'a str,
    current: bool,
    affordance: Affordance,
    hit: Option<(HitId, HitData)>,
}

impl<'a> GoalRow<'a> {
    pub fn new(ty: &'a str) -> Self {
        Self {
            ty,
            current: false,
            affordance: Affordance::Idle,
            hit: None,
        }
    }

    /// Mark as the goal tactics apply to.
    #[must_use]
    pub fn current(mut self, current: bool) -> Self {
        self.current = current;
        self
    }

    #[must_use]
    pub fn affordance(mut self, affordance: Affordance) -> Self {
        self.affordance = affordance;
        self
    }

    #[must_use]
    pub fn hit(mut self, id: HitId, data: HitData) -> Self {
        self.hit = Some((id, data));
        self
    }
}

impl Widget for GoalRow<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let Some(row) = area.row(0) else {
            return;
        };
        let mut flags = self.affordance.flags();
        if self.current {
            flags |= CellFlags::BOLD;
        }
        let gutter = frame
            .buffer
            .set_string(row.x, row.y, self.affordance.gutter(), flags, row.width);
        frame.buffer.set_string(
            row.x + gutter,
            row.y,
            self.ty,
            flags,
            row.width.saturating_sub(gutter),
        );
        if let Some((id, data)) = self.hit {
            frame.register_hit(row, id, HitRegion::Content, data);
        }
    }
}

/// `──────(i/n)` rule spanning the row.
#[derive(Debug, Clone, Copy)]
pub struct GoalSeparator {
    pub index: usize,
    pub total: usize,
}

impl Widget for GoalSeparator {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let Some(row) = area.row(0) else {
            return;
        };
        let label = format!("({}/{})", self.index, self.total);
        let rule_len = (row.width as usize).saturating_sub(display_width(&label));
        let line = format!("{}{label}", "─".repeat(rule_len));
        frame
            .buffer
            .set_string(row.x, row.y, &line, CellFlags::DIM, row.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_fills_row() {
        let mut frame = Frame::new(10, 1);
        GoalSeparator { index: 1, total: 2 }.render(Rect::new(0, 0, 10, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "─────(1/2)");
    }

    #[test]
    fn current_goal_is_bold_and_registered() {
        let mut frame = Frame::with_hit_grid(12, 1);
        GoalRow::new("A -> B")
            .current(true)
            .hit(HitId::new(2), 0)
            .render(Rect::new(0, 0, 12, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "  A -> B");
        assert!(frame.buffer.get(2, 0).unwrap().flags.contains(CellFlags::BOLD));
        assert_eq!(frame.hit_test(0, 0), Some((HitId::new(2), HitRegion::Content, 0)));
    }

    #[test]
    fn unregistered_goal_has_no_hits() {
        let mut frame = Frame::with_hit_grid(12, 1);
        GoalRow::new("C").render(Rect::new(0, 0, 12, 1), &mut frame);
        assert_eq!(frame.hit_test(2, 0), None);
    }
}
