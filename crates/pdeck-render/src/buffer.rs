#![forbid(unsafe_code)]

//! Fixed-size grid of [`Cell`]s.
//!
//! Writes outside the grid are clipped silently. Double-width characters
//! occupy two cells, the second marked as a continuation so that
//! [`Buffer::row_text`] reproduces the original string.

use pdeck_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellFlags};

/// A width x height grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width as usize * height as usize],
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
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Overwrite one cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Write `text` starting at (x, y), stopping after `max_width` cells or
    /// at the right edge. Returns the number of cells written.
    ///
    /// A double-width character that would straddle the limit is dropped.
    pub fn set_string(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        flags: CellFlags,
        max_width: u16,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = (x as u32 + max_width as u32).min(self.width as u32);
        let mut col = x as u32;
        for ch in text.chars() {
            let w = match ch.width() {
                Some(w) if w > 0 => w as u32,
                // Control and zero-width characters take no cell.
                _ => continue,
            };
            if col + w > limit {
                break;
            }
            self.set(col as u16, y, Cell::from_char(ch).with_flags(flags));
            if w == 2 {
                self.set(col as u16 + 1, y, Cell::continuation());
            }
            col += w;
        }
        (col - x as u32) as u16
    }

    /// Add `flags` to every cell in `rect` (clipped).
    pub fn add_flags(&mut self, rect: Rect, flags: CellFlags) {
        let area = rect.intersection(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.flags |= flags;
                }
            }
        }
    }

    /// Fill `rect` with blank cells (clipped).
    pub fn clear_rect(&mut self, rect: Rect) {
        let area = rect.intersection(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, Cell::EMPTY);
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Text of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: u16) -> String {
        let Some(start) = self.index(0, y) else {
            return String::new();
        };
        let row = &self.cells[start..start + self.width as usize];
        let text: String = row
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_string()
    }

    /// The whole grid as text, one line per row, trailing blank rows removed.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = (0..self.height).map(|y| self.row_text(y)).collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_string_clips_to_width() {
        let mut buf = Buffer::new(5, 1);
        let written = buf.set_string(2, 0, "hello", CellFlags::empty(), u16::MAX);
        assert_eq!(written, 3);
        assert_eq!(buf.row_text(0), "  hel");
    }

    #[test]
    fn set_string_respects_max_width() {
        let mut buf = Buffer::new(10, 1);
        let written = buf.set_string(0, 0, "abcdef", CellFlags::BOLD, 4);
        assert_eq!(written, 4);
        assert_eq!(buf.row_text(0), "abcd");
        assert!(buf.get(0, 0).unwrap().flags.contains(CellFlags::BOLD));
        assert!(buf.get(4, 0).unwrap().is_empty());
    }

    #[test]
    fn wide_chars_round_trip_through_row_text() {
        let mut buf = Buffer::new(6, 1);
        let written = buf.set_string(0, 0, "a漢b", CellFlags::empty(), u16::MAX);
        assert_eq!(written, 4);
        assert!(buf.get(2, 0).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "a漢b");
    }

    #[test]
    fn wide_char_at_limit_is_dropped() {
        let mut buf = Buffer::new(2, 1);
        let written = buf.set_string(1, 0, "漢", CellFlags::empty(), u16::MAX);
        assert_eq!(written, 0);
        assert_eq!(buf.row_text(0), "");
    }

    #[test]
    fn out_of_bounds_row_is_ignored() {
        let mut buf = Buffer::new(4, 2);
        assert_eq!(buf.set_string(0, 5, "x", CellFlags::empty(), 4), 0);
        assert_eq!(buf.row_text(5), "");
    }

    #[test]
    fn add_flags_is_clipped() {
        let mut buf = Buffer::new(3, 3);
        buf.add_flags(Rect::new(2, 2, 5, 5), CellFlags::REVERSE);
        assert!(buf.get(2, 2).unwrap().flags.contains(CellFlags::REVERSE));
        assert!(buf.get(1, 1).unwrap().flags.is_empty());
    }

    #[test]
    fn to_text_drops_trailing_blank_rows() {
        let mut buf = Buffer::new(8, 4);
        buf.set_string(0, 0, "H : A", CellFlags::empty(), 8);
        buf.set_string(0, 1, "B", CellFlags::empty(), 8);
        assert_eq!(buf.to_text(), "H : A\nB");
        buf.clear();
        assert_eq!(buf.to_text(), "");
    }

    #[test]
    fn clear_rect_blanks_region() {
        let mut buf = Buffer::new(4, 1);
        buf.set_string(0, 0, "abcd", CellFlags::UNDERLINE, 4);
        buf.clear_rect(Rect::new(1, 0, 2, 1));
        assert_eq!(buf.row_text(0), "a  d");
    }
}
