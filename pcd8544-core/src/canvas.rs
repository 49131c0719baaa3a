//! Drawing canvas and rasterization primitives
//!
//! [`Canvas`] is the explicit context object for all drawing state:
//! the framebuffer cache, the font cursor and the informational
//! changed flag. Every raster primitive funnels through
//! [`Canvas::set_pixel`], which owns the index/offset computation and
//! the bounds check, so the addressing formula lives in one place.
//!
//! Multi-step primitives differ deliberately in how they fail:
//! `line`, `single_bar` and `bars` stop at the first out-of-border
//! pixel and leave what was already drawn; `rect` validates all four
//! corners before touching the cache; `circle` rejects only a bad
//! center and silently clips symmetric points that fall off-display.

use crate::cache::FrameCache;
use crate::{CACHE_SIZE, HEIGHT, WIDTH};

/// The one error this crate produces: a coordinate or cursor outside
/// the addressable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Coordinate outside the display, or cursor cell outside the
    /// printable grid.
    OutOfBorder,
}

/// How a drawing operation combines with the pixel already in the
/// cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelMode {
    /// Clear the pixel.
    Off,
    /// Set the pixel.
    On,
    /// Toggle the pixel.
    Xor,
}

/// Layout of a bar chart drawn by [`Canvas::bars`].
#[derive(Debug, Clone, Copy)]
pub struct BarConfig {
    /// Column of the first bar's left edge.
    pub origin_x: u8,
    /// Row of every bar's bottom edge.
    pub base_y: u8,
    /// Blank columns between adjacent bars.
    pub gap: u8,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            origin_x: 5,
            base_y: 38,
            gap: 2,
        }
    }
}

/// Drawing state for one display: cache, font cursor, changed flag.
///
/// Owned by the caller and passed into every operation; callers must
/// serialize access themselves (there is no internal locking, matching
/// the single-owner hardware).
#[derive(Clone, Default)]
pub struct Canvas {
    pub(crate) cache: FrameCache,
    /// Font cursor, a byte index at character-cell granularity.
    pub(crate) cursor: usize,
    /// Informational "something was drawn" flag; the dirty range is
    /// the authoritative flush signal.
    pub(crate) changed: bool,
}

impl Canvas {
    /// Create a blank canvas with the cursor at the origin.
    pub const fn new() -> Self {
        Self {
            cache: FrameCache::new(),
            cursor: 0,
            changed: false,
        }
    }

    /// Zero the cache and mark all of it dirty.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.changed = true;
    }

    /// Replace the whole cache with an externally supplied bitmap and
    /// mark all of it dirty.
    pub fn load_image(&mut self, image: &[u8; CACHE_SIZE]) {
        self.cache.load(image);
        self.changed = true;
    }

    /// Whether anything was drawn since the last flush.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Clamped dirty byte range, or `None` when the cache is clean.
    pub fn dirty_span(&self) -> Option<(usize, usize)> {
        self.cache.dirty_span()
    }

    /// Read one cache byte (`index` below [`CACHE_SIZE`]).
    pub fn byte(&self, index: usize) -> u8 {
        self.cache.get(index)
    }

    /// Borrow the raw packed bitmap.
    pub fn bytes(&self) -> &[u8; CACHE_SIZE] {
        self.cache.bytes()
    }

    /// Empty the dirty range and drop the changed flag; called by the
    /// protocol driver after a transfer.
    pub fn reset_dirty(&mut self) {
        self.cache.reset();
        self.changed = false;
    }

    /// Set, clear or toggle the pixel at absolute coordinates.
    ///
    /// This is the bounds-safety choke point for every raster
    /// primitive: a rejected call leaves the cache untouched.
    pub fn set_pixel(&mut self, x: u8, y: u8, mode: PixelMode) -> Result<(), Error> {
        if x as usize >= WIDTH || y as usize >= HEIGHT {
            return Err(Error::OutOfBorder);
        }

        let index = (y as usize / 8) * WIDTH + x as usize;
        let mask = 1u8 << (y % 8);

        let mut data = self.cache.get(index);
        match mode {
            PixelMode::Off => data &= !mask,
            PixelMode::On => data |= mask,
            PixelMode::Xor => data ^= mask,
        }
        self.cache.put(index, data);

        self.changed = true;
        Ok(())
    }

    /// Draw a line between two points (Bresenham, doubled deltas).
    ///
    /// Plots the start point first and then steps along the dominant
    /// axis. The first out-of-border pixel stops the walk and is
    /// returned; pixels already plotted stay (a line running off the
    /// display is truncated, not clipped-and-continued).
    pub fn line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8, mode: PixelMode) -> Result<(), Error> {
        let mut x = i32::from(x1);
        let mut y = i32::from(y1);
        let mut dx = i32::from(x2) - x;
        let mut dy = i32::from(y2) - y;

        let step_x = if dx < 0 {
            dx = -dx;
            -1
        } else {
            1
        };
        let step_y = if dy < 0 {
            dy = -dy;
            -1
        } else {
            1
        };

        // Doubled deltas keep the error term integral.
        dx <<= 1;
        dy <<= 1;

        self.set_pixel(x as u8, y as u8, mode)?;

        if dx > dy {
            let mut fraction = dy - (dx >> 1);
            while x != i32::from(x2) {
                if fraction >= 0 {
                    y += step_y;
                    fraction -= dx;
                }
                x += step_x;
                fraction += dy;
                self.set_pixel(x as u8, y as u8, mode)?;
            }
        } else {
            let mut fraction = dx - (dy >> 1);
            while y != i32::from(y2) {
                if fraction >= 0 {
                    x += step_x;
                    fraction -= dy;
                }
                y += step_y;
                fraction += dx;
                self.set_pixel(x as u8, y as u8, mode)?;
            }
        }

        self.changed = true;
        Ok(())
    }

    /// Draw a circle outline (midpoint algorithm, 8-way symmetry).
    ///
    /// Fails only when the center itself is off-display. Symmetric
    /// points landing outside the visible area are silently skipped;
    /// that is legitimate for a circle hugging the display edge.
    pub fn circle(&mut self, x: u8, y: u8, radius: u8, mode: PixelMode) -> Result<(), Error> {
        if x as usize >= WIDTH || y as usize >= HEIGHT {
            return Err(Error::OutOfBorder);
        }

        let cx = i32::from(x);
        let cy = i32::from(y);
        let mut xc = 0i32;
        let mut yc = i32::from(radius);
        let mut p = 3 - 2 * i32::from(radius);

        while xc <= yc {
            self.plot_clipped(cx + xc, cy + yc, mode);
            self.plot_clipped(cx + xc, cy - yc, mode);
            self.plot_clipped(cx - xc, cy + yc, mode);
            self.plot_clipped(cx - xc, cy - yc, mode);
            self.plot_clipped(cx + yc, cy + xc, mode);
            self.plot_clipped(cx + yc, cy - xc, mode);
            self.plot_clipped(cx - yc, cy + xc, mode);
            self.plot_clipped(cx - yc, cy - xc, mode);

            if p < 0 {
                p += 4 * xc + 6;
            } else {
                p += 4 * (xc - yc) + 10;
                yc -= 1;
            }
            xc += 1;
        }

        self.changed = true;
        Ok(())
    }

    fn plot_clipped(&mut self, x: i32, y: i32, mode: PixelMode) {
        if (0..WIDTH as i32).contains(&x) && (0..HEIGHT as i32).contains(&y) {
            // In range by the guard, so this cannot fail.
            let _ = self.set_pixel(x as u8, y as u8, mode);
        }
    }

    /// Draw a rectangle outline.
    ///
    /// All four corners are validated before anything is drawn; a
    /// degenerate rectangle (`x2 <= x1` or `y2 <= y1`) succeeds
    /// without drawing.
    pub fn rect(&mut self, x1: u8, y1: u8, x2: u8, y2: u8, mode: PixelMode) -> Result<(), Error> {
        if x1 as usize >= WIDTH
            || x2 as usize >= WIDTH
            || y1 as usize >= HEIGHT
            || y2 as usize >= HEIGHT
        {
            return Err(Error::OutOfBorder);
        }

        if x2 > x1 && y2 > y1 {
            for x in x1..=x2 {
                self.set_pixel(x, y1, mode)?;
                self.set_pixel(x, y2, mode)?;
            }
            for y in y1..=y2 {
                self.set_pixel(x1, y, mode)?;
                self.set_pixel(x2, y, mode)?;
            }
            self.changed = true;
        }
        Ok(())
    }

    /// Fill a `width x height` bar whose bottom-left anchor is
    /// `(base_x, base_y)`.
    ///
    /// The top edge is clamped so the bar never addresses rows above
    /// row 0. An off-display anchor fails before drawing; a bar
    /// running past the right edge fails on the first pixel outside,
    /// leaving the filled part in place.
    pub fn single_bar(
        &mut self,
        base_x: u8,
        base_y: u8,
        height: u8,
        width: u8,
        mode: PixelMode,
    ) -> Result<(), Error> {
        if base_x as usize >= WIDTH || base_y as usize >= HEIGHT {
            return Err(Error::OutOfBorder);
        }

        let top = if height > base_y {
            0
        } else {
            base_y - height + 1
        };

        for y in top..=base_y {
            for x in u16::from(base_x)..u16::from(base_x) + u16::from(width) {
                // x stays well below 256 here: the walk errors out at
                // column 84 before the cast could truncate.
                self.set_pixel(x as u8, y, mode)?;
            }
        }

        self.changed = true;
        Ok(())
    }

    /// Draw a bar chart: one filled bar per value, left to right,
    /// bar `i` of height `values[i] * multiplier` (wrapping byte
    /// product, as the controller-era callers expect).
    ///
    /// Fails with `OutOfBorder` once a bar's starting column leaves
    /// the display; bars already drawn stay (no rollback).
    pub fn bars(
        &mut self,
        config: &BarConfig,
        values: &[u8],
        width: u8,
        multiplier: u8,
    ) -> Result<(), Error> {
        let mut x: u8 = 0;

        for (i, &value) in values.iter().enumerate() {
            if x as usize > WIDTH - 1 {
                return Err(Error::OutOfBorder);
            }

            x = ((u16::from(width) + u16::from(config.gap)) * i as u16
                + u16::from(config.origin_x)) as u8;

            let height = value.wrapping_mul(multiplier);
            self.single_bar(x, config.base_y, height, width, PixelMode::On)?;
        }

        self.changed = true;
        Ok(())
    }
}
