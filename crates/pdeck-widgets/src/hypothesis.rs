#![forbid(unsafe_code)]

//! One hypothesis row: `name: type`.
//!
//! A hypothesis is both a drag source (carrying its name) and a drop target
//! for other hypotheses; the row itself only draws. The capability impls
//! live with the view, which knows how to ask the engine.

use pdeck_core::geometry::Rect;
use pdeck_core::state::Hypothesis;
use pdeck_render::frame::{Frame, HitData, HitId, HitRegion};

use crate::{Affordance, Widget};

#[derive(Debug, Clone)]
pub struct HypothesisRow<'a> {
    hyp: &'a Hypothesis,
    affordance: Affordance,
    hit: Option<(HitId, HitData)>,
}

impl<'a> HypothesisRow<'a> {
    pub fn new(hyp: &'a Hypothesis) -> Self {
        Self {
            hyp,
            affordance: Affordance::Idle,
            hit: None,
        }
    }

    #[must_use]
    pub fn affordance(mut self, affordance: Affordance) -> Self {
        self.affordance = affordance;
        self
    }

    /// Register the row under `id` with `data`.
    #[must_use]
    pub fn hit(mut self, id: HitId, data: HitData) -> Self {
        self.hit = Some((id, data));
        self
    }

    /// Text drawn after the gutter.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.hyp.name, self.hyp.ty)
    }
}

impl Widget for HypothesisRow<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let Some(row) = area.row(0) else {
            return;
        };
        let flags = self.affordance.flags();
        let gutter = frame
            .buffer
            .set_string(row.x, row.y, self.affordance.gutter(), flags, row.width);
        frame.buffer.set_string(
            row.x + gutter,
            row.y,
            &self.label(),
            flags,
            row.width.saturating_sub(gutter),
        );
        if let Some((id, data)) = self.hit {
            frame.register_hit(row, id, HitRegion::Content, data);
        }
    }
}
