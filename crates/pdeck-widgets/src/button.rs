#![forbid(unsafe_code)]

//! `[ label ]` control.

use pdeck_core::geometry::Rect;
use pdeck_render::cell::CellFlags;
use pdeck_render::frame::{Frame, HitId, HitRegion};

use crate::Widget;

#[derive(Debug, Clone)]
pub struct Button<'a> {
    label: &'a str,
    id: HitId,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str, id: HitId) -> Self {
        Self { label, id }
    }

    /// Width the button occupies.
    #[must_use]
    pub fn width(&self) -> u16 {
        pdeck_render::display_width(self.label).saturating_add(4) as u16
    }
}

impl Widget for Button<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let Some(row) = area.row(0) else {
            return;
        };
        let text = format!("[ {} ]", self.label);
        let written = frame
            .buffer
            .set_string(row.x, row.y, &text, CellFlags::BOLD, row.width);
        frame.register_hit(
            Rect::new(row.x, row.y, written, 1),
            self.id,
            HitRegion::Button,
            0,
        );
    }
}
