#![forbid(unsafe_code)]

//! Frame = Buffer + hit grid for one render pass.
//!
//! Widgets draw into [`Frame::buffer`] and register the cells they occupy in
//! the hit grid. After the pass the runtime keeps the frame so that the next
//! pointer event can be resolved to whatever was drawn under it.
//!
//! # Usage
//!
//! ```
//! use pdeck_core::geometry::Rect;
//! use pdeck_render::frame::{Frame, HitId, HitRegion};
//!
//! let mut frame = Frame::with_hit_grid(20, 4);
//! frame.register_hit(Rect::new(0, 1, 20, 1), HitId::new(3), HitRegion::Content, 0);
//! assert_eq!(frame.hit_test(5, 1), Some((HitId::new(3), HitRegion::Content, 0)));
//! ```

use pdeck_core::geometry::Rect;

use crate::buffer::Buffer;

/// Identifier for an interactive region in the hit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(pub u32);

impl HitId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Opaque per-region payload (row index, menu entry, ...).
pub type HitData = u64;

/// What part of a widget a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitRegion {
    #[default]
    None,
    /// Body of an entity row.
    Content,
    /// A clickable control.
    Button,
    /// One entry of an open menu.
    MenuItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct HitCell {
    widget_id: Option<HitId>,
    region: HitRegion,
    data: HitData,
}

/// Maps cell positions to the region registered last at that cell.
#[derive(Debug, Clone)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<HitCell>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![HitCell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Register `rect` (clipped to the grid). Later registrations win.
    pub fn register(&mut self, rect: Rect, widget_id: HitId, region: HitRegion, data: HitData) {
        // usize avoids overflow for rects hanging off the edge.
        let x_end = (rect.x as usize + rect.width as usize).min(self.width as usize) as u16;
        let y_end = (rect.y as usize + rect.height as usize).min(self.height as usize) as u16;

        let hit = HitCell {
            widget_id: Some(widget_id),
            region,
            data,
        };
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = hit;
                }
            }
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, HitData)> {
        let cell = self.cells.get(self.index(x, y)?)?;
        cell.widget_id.map(|id| (id, cell.region, cell.data))
    }

    pub fn clear(&mut self) {
        self.cells.fill(HitCell::default());
    }
}

/// Render target handed to `Model::view`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    /// Present when the pass records pointer regions.
    pub hit_grid: Option<HitGrid>,
}

impl Frame {
    /// A frame without hit testing.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
        }
    }

    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: Some(HitGrid::new(width, height)),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        if let Some(ref mut grid) = self.hit_grid {
            grid.clear();
        }
    }

    /// Returns `false` when the frame has no hit grid.
    pub fn register_hit(&mut self, rect: Rect, id: HitId, region: HitRegion, data: HitData) -> bool {
        if let Some(ref mut grid) = self.hit_grid {
            grid.register(rect, id, region, data);
            true
        } else {
            false
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, HitData)> {
        self.hit_grid.as_ref().and_then(|grid| grid.hit_test(x, y))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellFlags;

    #[test]
    fn frame_without_grid_registers_nothing() {
        let mut frame = Frame::new(10, 2);
        assert!(!frame.register_hit(Rect::new(0, 0, 5, 1), HitId::new(1), HitRegion::Content, 0));
        assert!(frame.hit_test(1, 0).is_none());
    }

    #[test]
    fn register_and_hit_test() {
        let mut frame = Frame::with_hit_grid(30, 10);
        let id = HitId::new(42);
        frame.register_hit(Rect::new(10, 5, 20, 3), id, HitRegion::Button, 99);

        assert_eq!(frame.hit_test(10, 5), Some((id, HitRegion::Button, 99)));
        assert_eq!(frame.hit_test(29, 7), Some((id, HitRegion::Button, 99)));
        assert!(frame.hit_test(9, 5).is_none());
        assert!(frame.hit_test(15, 8).is_none());
        assert!(frame.hit_test(15, 4).is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut grid = HitGrid::new(20, 20);
        grid.register(Rect::new(0, 0, 10, 10), HitId::new(1), HitRegion::Content, 1);
        grid.register(Rect::new(5, 5, 10, 10), HitId::new(2), HitRegion::MenuItem, 2);

        assert_eq!(grid.hit_test(2, 2), Some((HitId::new(1), HitRegion::Content, 1)));
        assert_eq!(grid.hit_test(7, 7), Some((HitId::new(2), HitRegion::MenuItem, 2)));
    }

    #[test]
    fn registration_is_clipped() {
        let mut grid = HitGrid::new(10, 10);
        grid.register(Rect::new(8, 8, 10, 10), HitId::new(1), HitRegion::Content, 0);
        assert!(grid.hit_test(9, 9).is_some());
        assert!(grid.hit_test(10, 10).is_none());
        assert!(grid.hit_test(100, 100).is_none());
    }

    #[test]
    fn clear_resets_buffer_and_grid() {
        let mut frame = Frame::with_hit_grid(10, 10);
        frame.buffer.set_string(0, 0, "X", CellFlags::empty(), 10);
        frame.register_hit(Rect::new(0, 0, 5, 5), HitId::new(1), HitRegion::Content, 0);

        frame.clear();

        assert!(frame.buffer.get(0, 0).unwrap().is_empty());
        assert!(frame.hit_test(2, 2).is_none());
    }

    #[test]
    fn default_frame_is_one_cell() {
        let frame = Frame::default();
        assert_eq!((frame.width(), frame.height()), (1, 1));
        assert_eq!(frame.bounds(), Rect::new(0, 0, 1, 1));
    }
}
