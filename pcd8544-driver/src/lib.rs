//! Protocol driver for PCD8544 (Nokia 3310) LCD controllers
//!
//! Sits on top of `pcd8544-core`: the core owns the framebuffer
//! cache and all drawing; this crate owns the wire. It initializes
//! the controller, sets contrast, and flushes the cache's dirty byte
//! range through a [`LcdInterface`] byte transport, with a dedicated
//! addressing sequence for the widespread clone controller that does
//! not auto-advance across row boundaries.
//!
//! ```ignore
//! let interface = SpiInterface::new(spi, dc, rst);
//! let mut lcd = Pcd8544::new(interface, Controller::Standard);
//! lcd.init(&mut delay)?;
//!
//! let canvas = lcd.canvas_mut();
//! canvas.set_cursor(0, 0)?;
//! canvas.put_str(&FONT_ASCII[..], FontSize::X1, "Hello")?;
//! lcd.flush()?;
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

pub mod driver;
pub mod interface;

pub use driver::{Controller, Error, Pcd8544};
pub use interface::{ByteKind, LcdInterface, SpiInterface, TransportError};

// Drawing surface re-exports so callers need only this crate. The
// core's drawing error gets a distinct name next to the driver error.
pub use pcd8544_core::{
    Advance, BarConfig, Canvas, Error as DrawError, FontSize, GlyphSource, PixelMode, CACHE_SIZE,
    FONT_ASCII, HEIGHT, WIDTH,
};
