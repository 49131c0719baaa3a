//! Packed framebuffer cache with dirty-range watermarks
//!
//! The cache mirrors the controller's display RAM: one byte covers
//! eight vertically stacked pixels (column `i % WIDTH`, page
//! `i / WIDTH`, bit 0 topmost). Every mutation widens a low/high
//! watermark pair so a flush only has to transmit the byte range that
//! actually changed since the previous flush.

use crate::CACHE_SIZE;

/// In-memory copy of the display RAM plus the modified-range bounds.
#[derive(Clone)]
pub struct FrameCache {
    bytes: [u8; CACHE_SIZE],
    /// Lowest byte index touched since the last flush.
    lo: usize,
    /// Highest byte index touched since the last flush.
    hi: usize,
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCache {
    /// Create an all-zero cache with an empty dirty range.
    pub const fn new() -> Self {
        Self {
            bytes: [0; CACHE_SIZE],
            lo: CACHE_SIZE - 1,
            hi: 0,
        }
    }

    /// Zero every byte and mark the whole cache dirty.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.lo = 0;
        self.hi = CACHE_SIZE - 1;
    }

    /// Bulk-overwrite the cache from a full-size bitmap and mark the
    /// whole cache dirty. The array type carries the length contract.
    pub fn load(&mut self, image: &[u8; CACHE_SIZE]) {
        self.bytes.copy_from_slice(image);
        self.lo = 0;
        self.hi = CACHE_SIZE - 1;
    }

    /// Read one cache byte.
    ///
    /// `index` must be below [`CACHE_SIZE`].
    pub fn get(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    /// Write one cache byte and widen the dirty range over it.
    ///
    /// `index` must be below [`CACHE_SIZE`]; this is the single write
    /// path, so the watermark invariant holds for every mutation.
    pub fn put(&mut self, index: usize, byte: u8) {
        self.bytes[index] = byte;
        self.mark(index);
    }

    /// Widen the dirty range to absorb `index` without writing.
    pub fn mark(&mut self, index: usize) {
        if index < self.lo {
            self.lo = index;
        }
        if index > self.hi {
            self.hi = index;
        }
    }

    /// The inclusive byte range that needs transmitting, clamped into
    /// `[0, CACHE_SIZE - 1]`, or `None` when nothing changed since the
    /// last [`reset`](Self::reset).
    pub fn dirty_span(&self) -> Option<(usize, usize)> {
        let lo = self.lo.min(CACHE_SIZE - 1);
        let hi = self.hi.min(CACHE_SIZE - 1);
        if lo <= hi {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// Reset the dirty range to the empty (inverted) sentinel so the
    /// next mutation establishes a fresh single-point range.
    pub fn reset(&mut self) {
        self.lo = CACHE_SIZE - 1;
        self.hi = 0;
    }

    /// Borrow the raw packed bitmap.
    pub fn bytes(&self) -> &[u8; CACHE_SIZE] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cache_is_zeroed_and_clean() {
        let cache = FrameCache::new();
        assert!(cache.bytes().iter().all(|&b| b == 0));
        assert_eq!(cache.dirty_span(), None);
    }

    #[test]
    fn put_establishes_single_point_range() {
        let mut cache = FrameCache::new();
        cache.put(94, 0xA5);
        assert_eq!(cache.get(94), 0xA5);
        assert_eq!(cache.dirty_span(), Some((94, 94)));
    }

    #[test]
    fn marks_absorb_into_bounding_range() {
        let mut cache = FrameCache::new();
        cache.put(200, 1);
        cache.put(10, 2);
        cache.put(150, 3);
        assert_eq!(cache.dirty_span(), Some((10, 200)));
    }

    #[test]
    fn clear_dirties_everything() {
        let mut cache = FrameCache::new();
        cache.put(50, 0xFF);
        cache.reset();
        cache.clear();
        assert_eq!(cache.dirty_span(), Some((0, CACHE_SIZE - 1)));
        assert_eq!(cache.get(50), 0);
    }

    #[test]
    fn load_overwrites_and_dirties_everything() {
        let mut cache = FrameCache::new();
        cache.reset();
        let image = [0x3C; CACHE_SIZE];
        cache.load(&image);
        assert_eq!(cache.dirty_span(), Some((0, CACHE_SIZE - 1)));
        assert!(cache.bytes().iter().all(|&b| b == 0x3C));
    }

    #[test]
    fn reset_empties_the_range() {
        let mut cache = FrameCache::new();
        cache.put(0, 1);
        cache.put(CACHE_SIZE - 1, 1);
        cache.reset();
        assert_eq!(cache.dirty_span(), None);
    }
}
