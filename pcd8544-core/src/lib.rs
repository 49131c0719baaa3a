//! Hardware-free core logic for PCD8544 (Nokia 3310) LCD displays
//!
//! This crate contains everything about the display that does not need
//! a bus or a pin:
//!
//! - Packed 1bpp framebuffer cache with dirty-range watermarks
//! - Rasterization primitives (pixel, line, circle, rect, bars)
//! - Bitmap font engine (cursor, code-page remap, 1x and 2x glyphs)
//! - Glyph table abstraction plus a built-in 5x7 ASCII font
//!
//! The transport and controller protocol live in `pcd8544-driver`.
//! All state is held in an explicit [`Canvas`] owned by the caller;
//! there are no statics and no internal locking.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod cache;
pub mod canvas;
pub mod font;
pub mod glyphs;

pub use cache::FrameCache;
pub use canvas::{BarConfig, Canvas, Error, PixelMode};
pub use font::{Advance, FontSize};
pub use glyphs::{GlyphSource, FONT_ASCII};

/// Display width in pixels.
pub const WIDTH: usize = 84;

/// Display height in pixels.
pub const HEIGHT: usize = 48;

/// Number of 8-pixel-high pages.
pub const PAGES: usize = HEIGHT / 8;

/// Size of the packed framebuffer cache in bytes.
pub const CACHE_SIZE: usize = WIDTH * HEIGHT / 8;

/// Width of one character cell in bytes (5 glyph columns + 1 spacer).
pub const CELL_WIDTH: usize = 6;

/// Number of character columns at 1x font size.
pub const TEXT_COLS: usize = WIDTH / CELL_WIDTH;

/// Number of character rows at 1x font size.
pub const TEXT_ROWS: usize = PAGES;
