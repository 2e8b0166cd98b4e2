//! Property-based invariant tests for the hit grid and buffer text.
//!
//! 1. A query resolves to the last registered region covering the point.
//! 2. Points outside every region (or outside the grid) resolve to None.
//! 3. `set_string` never writes past its width limit.

use pdeck_core::geometry::Rect;
use pdeck_render::buffer::Buffer;
use pdeck_render::cell::CellFlags;
use pdeck_render::frame::{HitData, HitGrid, HitId, HitRegion};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn screen_dims() -> impl Strategy<Value = (u16, u16)> {
    (1u16..=120, 1u16..=60)
}

fn any_rect() -> impl Strategy<Value = Rect> {
    (0u16..150, 0u16..80, 0u16..60, 0u16..30).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn last_covering_region_wins(
        (w, h) in screen_dims(),
        rects in proptest::collection::vec(any_rect(), 0..20),
        qx in 0u16..200,
        qy in 0u16..100,
    ) {
        let mut grid = HitGrid::new(w, h);
        for (i, rect) in rects.iter().enumerate() {
            grid.register(*rect, HitId::new(i as u32 + 1), HitRegion::Content, i as HitData);
        }

        let in_grid = qx < w && qy < h;
        let expected = rects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, r)| r.contains(qx, qy))
            .filter(|_| in_grid)
            .map(|(i, _)| (HitId::new(i as u32 + 1), HitRegion::Content, i as HitData));

        prop_assert_eq!(grid.hit_test(qx, qy), expected);
    }

    #[test]
    fn set_string_stays_within_limit(
        text in "[a-zA-Z ★─漢]{0,40}",
        x in 0u16..30,
        max_width in 0u16..30,
    ) {
        let mut buf = Buffer::new(24, 1);
        let written = buf.set_string(x, 0, &text, CellFlags::empty(), max_width);
        prop_assert!(written <= max_width);
        let end = x.saturating_add(written);
        prop_assert!(end <= 24 || written == 0);
        for col in end..24 {
            prop_assert!(buf.get(col, 0).is_some_and(|c| c.is_empty()));
        }
    }
}
