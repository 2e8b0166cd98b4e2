#![forbid(unsafe_code)]

//! A single terminal cell.

use bitflags::bitflags;

bitflags! {
    /// Text attributes rendered by the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const REVERSE   = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        /// Trailing half of a double-width character.
        const CONTINUATION = 0b1000_0000;
    }
}

/// One grid cell: a character and its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub flags: CellFlags,
}

impl Cell {
    /// A blank cell.
    pub const EMPTY: Self = Self {
        ch: ' ',
        flags: CellFlags::empty(),
    };

    const CONTINUATION: Self = Self {
        ch: ' ',
        flags: CellFlags::CONTINUATION,
    };

    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            flags: CellFlags::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_flags(mut self, flags: CellFlags) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) const fn continuation() -> Self {
        Self::CONTINUATION
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.flags.contains(CellFlags::CONTINUATION)
    }

    /// Whether the cell shows nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ch == ' ' && self.flags.is_empty()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
