#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, and frames with hit testing.
//!
//! # Role in ProofDeck
//! `pdeck-render` is the surface views draw into. A [`frame::Frame`] pairs a
//! [`buffer::Buffer`] of styled cells with a [`frame::HitGrid`] mapping each
//! cell back to the entity drawn there, which is how pointer coordinates
//! become "this hypothesis" or "the current goal".
//!
//! # How it fits in the system
//! `pdeck-runtime` allocates a frame per render pass and hands it to the
//! model's `view()`. Hosts read the result back as plain text with
//! [`buffer::Buffer::to_text`], which is also what snapshot tests compare.

pub mod buffer;
pub mod cell;
pub mod frame;

pub use buffer::Buffer;
pub use cell::{Cell, CellFlags};
pub use frame::{Frame, HitData, HitGrid, HitId, HitRegion};

/// Display width of `text` in terminal cells.
#[must_use]
pub fn display_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(text)
}
