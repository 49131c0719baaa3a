//! Controller protocol: initialization, contrast, cache flush
//!
//! The driver owns a [`Canvas`] and a byte transport. Drawing happens
//! on the canvas; [`Pcd8544::flush`] walks the canvas's clamped dirty
//! byte range and streams exactly those bytes into display RAM,
//! addressing from the low watermark.
//!
//! Two controller variants exist in the wild. The genuine PCD8544
//! auto-advances its RAM pointer across the whole frame, so one
//! address setup is enough. The common clone stops auto-advancing at
//! each row end, needs the column/page address re-issued on every row
//! wrap, and maps its (taller) RAM onto the glass with a vertical
//! offset that a vendor-specific shift command corrects after the
//! transfer. The variant is a construction-time choice for the board
//! at hand, never probed at runtime.

use embedded_hal::delay::DelayNs;
use pcd8544_core::{Canvas, WIDTH};

use crate::interface::{ByteKind, LcdInterface, TransportError};

/// Controller command set (basic and extended).
mod cmd {
    /// Function set: basic command set, horizontal addressing.
    pub const FUNCTION_SET: u8 = 0x20;
    /// OR into `FUNCTION_SET` to select the extended command set.
    pub const EXTENDED: u8 = 0x01;
    /// Display control: normal (non-inverted) video.
    pub const DISPLAY_NORMAL: u8 = 0x0C;
    /// Set RAM page address (OR the page number).
    pub const SET_Y_ADDR: u8 = 0x40;
    /// Set RAM column address (OR the column).
    pub const SET_X_ADDR: u8 = 0x80;
    /// Extended: temperature coefficient 2.
    pub const TEMP_COEFF_2: u8 = 0x06;
    /// Extended: bias system 1:48.
    pub const BIAS_1_48: u8 = 0x13;
    /// Extended: set Vop (OR the 7-bit contrast value).
    pub const SET_VOP: u8 = 0x80;
    /// Extended, clone only: shift the picture up to cancel the
    /// clone RAM's vertical offset. The genuine chip ignores it.
    pub const CLONE_VSHIFT: u8 = 0x45;
}

/// Power-up Vop (contrast) level from the reference init sequence.
const DEFAULT_VOP: u8 = 0x48;

/// Which controller variant the board carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    /// Genuine PCD8544: RAM pointer auto-advances across rows.
    Standard,
    /// Clone controller: per-row re-addressing plus a vertical-shift
    /// correction after each transfer.
    Clone,
}

/// Driver-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The byte transport failed.
    Transport(TransportError),
    /// Operation requires a completed [`Pcd8544::init`].
    NotReady,
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

/// PCD8544 display driver: canvas + transport + variant tag.
pub struct Pcd8544<IF> {
    iface: IF,
    canvas: Canvas,
    controller: Controller,
    ready: bool,
}

impl<IF: LcdInterface> Pcd8544<IF> {
    /// Create an uninitialized driver for the given controller
    /// variant. Call [`init`](Self::init) before anything else.
    pub fn new(iface: IF, controller: Controller) -> Self {
        Self {
            iface,
            canvas: Canvas::new(),
            controller,
            ready: false,
        }
    }

    /// Borrow the drawing surface.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Borrow the drawing surface mutably.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Give the transport back.
    pub fn release(self) -> IF {
        self.iface
    }

    /// Reset the chip and run the power-up sequence, then push a
    /// cleared frame. The driver is Ready afterwards.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        self.iface.hard_reset(delay)?;

        self.command(cmd::FUNCTION_SET | cmd::EXTENDED)?;
        self.command(cmd::SET_VOP | DEFAULT_VOP)?;
        self.command(cmd::TEMP_COEFF_2)?;
        self.command(cmd::BIAS_1_48)?;
        self.command(cmd::FUNCTION_SET)?;
        self.command(cmd::DISPLAY_NORMAL)?;

        self.ready = true;
        self.canvas.clear();
        self.flush()
    }

    /// Set the display contrast (Vop), 0x00..=0x7F.
    pub fn set_contrast(&mut self, vop: u8) -> Result<(), Error> {
        if !self.ready {
            return Err(Error::NotReady);
        }
        self.command(cmd::FUNCTION_SET | cmd::EXTENDED)?;
        self.command(cmd::SET_VOP | (vop & 0x7F))?;
        self.command(cmd::FUNCTION_SET)?;
        Ok(())
    }

    /// Transmit the modified part of the cache to display RAM.
    ///
    /// Sends nothing at all when nothing changed since the last
    /// flush. Afterwards the dirty range is empty and the canvas's
    /// changed flag is cleared.
    pub fn flush(&mut self) -> Result<(), Error> {
        if let Some((lo, hi)) = self.canvas.dirty_span() {
            match self.controller {
                Controller::Standard => self.flush_sequential(lo, hi)?,
                Controller::Clone => self.flush_readdressed(lo, hi)?,
            }
        }
        self.canvas.reset_dirty();
        Ok(())
    }

    /// Standard controller: one address setup, then a straight byte
    /// stream; the chip advances its own RAM pointer.
    fn flush_sequential(&mut self, lo: usize, hi: usize) -> Result<(), Error> {
        self.command(cmd::SET_X_ADDR | (lo % WIDTH) as u8)?;
        self.command(cmd::SET_Y_ADDR | (lo / WIDTH) as u8)?;

        for index in lo..=hi {
            let byte = self.canvas.byte(index);
            self.data(byte)?;
        }
        Ok(())
    }

    /// Clone controller: write one page lower than the target (the
    /// clone RAM sits shifted on the glass), re-address on every row
    /// wrap because the clone stops advancing there, and finally
    /// shift the picture back up with the vendor command.
    fn flush_readdressed(&mut self, lo: usize, hi: usize) -> Result<(), Error> {
        let mut x = (lo % WIDTH) as u8;
        let mut y = (lo / WIDTH) as u8 + 1;

        self.command(cmd::SET_X_ADDR | x)?;
        self.command(cmd::SET_Y_ADDR | y)?;

        for index in lo..=hi {
            let byte = self.canvas.byte(index);
            self.data(byte)?;

            x += 1;
            if x as usize >= WIDTH {
                x = 0;
                y += 1;
                self.command(cmd::SET_X_ADDR)?;
                self.command(cmd::SET_Y_ADDR | y)?;
            }
        }

        self.command(cmd::FUNCTION_SET | cmd::EXTENDED)?;
        self.command(cmd::CLONE_VSHIFT)?;
        self.command(cmd::FUNCTION_SET)?;
        Ok(())
    }

    fn command(&mut self, byte: u8) -> Result<(), Error> {
        self.iface.send(ByteKind::Command, byte)?;
        Ok(())
    }

    fn data(&mut self, byte: u8) -> Result<(), Error> {
        self.iface.send(ByteKind::Data, byte)?;
        Ok(())
    }
}
