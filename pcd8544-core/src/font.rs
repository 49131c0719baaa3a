//! Bitmap font engine
//!
//! Renders 5x7 glyphs into the framebuffer cache at character-cell
//! granularity: 6 cache bytes per cell (5 glyph columns plus one
//! spacer), 14 columns by 6 rows of cells. Glyph columns are shifted
//! left by one bit on the way in so the topmost pixel row of each
//! cell stays clear as inter-line spacing.
//!
//! For speed the engine writes cache bytes directly instead of going
//! through `set_pixel`, so it maintains the dirty watermarks itself.
//! Computed indices are reduced modulo the cache size, the same wrap
//! rule the cursor follows at the cache end.

use crate::canvas::{Canvas, Error};
use crate::glyphs::GlyphSource;
use crate::{CACHE_SIZE, CELL_WIDTH, TEXT_COLS, TEXT_ROWS, WIDTH};

/// Glyph rendering size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    /// One character cell (5x7 glyph in a 6x8 cell).
    X1,
    /// Double width and height; occupies two cell rows.
    X2,
}

/// How the cursor moved after a glyph was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// Cursor advanced normally.
    Moved,
    /// Cursor reached the last cache byte and wrapped to 0.
    Wrapped,
}

/// Glyph-table index of the reserved blank glyph, used for every code
/// the remap does not cover.
pub(crate) const BLANK_GLYPH: usize = 95;

/// Map a character code to its glyph-table index.
///
/// Printable ASCII (0x20..=0x7F) is table-relative from 32; the
/// extended range at 0xC0 and above (CP1251 Cyrillic in the stock
/// tables) is packed contiguously after it. Everything else renders
/// blank.
fn glyph_index(code: u8) -> usize {
    match code {
        0x20..=0x7F => usize::from(code - 32),
        0xC0..=0xFF => usize::from(code - 96),
        _ => BLANK_GLYPH,
    }
}

/// Double the four low bits of `n` into eight: source bit `k` becomes
/// bits `2k` and `2k+1`. Doubled glyphs rendered from existing tables
/// must stay bit-exact, so keep this weighted-multiply form as is.
fn double_nibble(n: u8) -> u8 {
    (n & 0x01) * 3 | (n & 0x02) * 6 | (n & 0x04) * 12 | (n & 0x08) * 24
}

impl Canvas {
    /// Place the cursor at a character cell.
    ///
    /// Valid cells are `col` 0..=13, `row` 0..=5.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error> {
        if col as usize >= TEXT_COLS || row as usize >= TEXT_ROWS {
            return Err(Error::OutOfBorder);
        }
        self.cursor = col as usize * CELL_WIDTH + row as usize * WIDTH;
        Ok(())
    }

    /// Current cursor position as a cache byte index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Draw one character at the cursor and advance it.
    ///
    /// At [`FontSize::X2`] the glyph is doubled into the cell row
    /// above the cursor as well, so the top cell row cannot host a
    /// double-size character and fails with `OutOfBorder`.
    pub fn put_char<F>(&mut self, font: &F, size: FontSize, code: u8) -> Result<Advance, Error>
    where
        F: GlyphSource + ?Sized,
    {
        let glyph = glyph_index(code);

        self.cache.mark(self.cursor);

        match size {
            FontSize::X1 => {
                for col in 0..5 {
                    let byte = font.glyph_byte(glyph, col) << 1;
                    self.cache.put((self.cursor + col) % CACHE_SIZE, byte);
                }
                self.cursor = (self.cursor + 5) % CACHE_SIZE;
            }
            FontSize::X2 => {
                // Doubled glyphs start one cell row up.
                let top = match self.cursor.checked_sub(WIDTH) {
                    Some(top) => top,
                    None => {
                        // A rejected double-height glyph still widens
                        // the low watermark to the frame start.
                        self.cache.mark(0);
                        return Err(Error::OutOfBorder);
                    }
                };

                for col in 0..5 {
                    let byte = font.glyph_byte(glyph, col) << 1;
                    let low = double_nibble(byte & 0x0F);
                    let high = double_nibble(byte >> 4);

                    let at = top + 2 * col;
                    self.cache.put(at % CACHE_SIZE, low);
                    self.cache.put((at + 1) % CACHE_SIZE, low);
                    // Same column pair, one page down.
                    self.cache.put((at + WIDTH) % CACHE_SIZE, high);
                    self.cache.put((at + WIDTH + 1) % CACHE_SIZE, high);
                }

                self.cursor = (self.cursor + 11) % CACHE_SIZE;
            }
        }

        // Inter-character spacing column.
        self.cache.put(self.cursor, 0x00);
        self.changed = true;

        if self.cursor == CACHE_SIZE - 1 {
            self.cursor = 0;
            return Ok(Advance::Wrapped);
        }
        self.cursor += 1;
        Ok(Advance::Moved)
    }

    /// Draw an ASCII string at the cursor.
    ///
    /// Stops and returns `OutOfBorder` at the first character that
    /// cannot be placed; characters already drawn stay. A cursor wrap
    /// is not an error and printing continues from the cache start.
    pub fn put_str<F>(&mut self, font: &F, size: FontSize, text: &str) -> Result<(), Error>
    where
        F: GlyphSource + ?Sized,
    {
        self.put_bytes(font, size, text.as_bytes())
    }

    /// Draw a raw byte string at the cursor.
    ///
    /// Identical to [`put_str`](Self::put_str) except the source is
    /// raw code-page bytes, for text using the extended glyph range.
    pub fn put_bytes<F>(&mut self, font: &F, size: FontSize, text: &[u8]) -> Result<(), Error>
    where
        F: GlyphSource + ?Sized,
    {
        for &code in text {
            self.put_char(font, size, code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::FONT_ASCII;
    use crate::Canvas;

    fn font() -> &'static [[u8; 5]] {
        &FONT_ASCII[..]
    }

    #[test]
    fn cursor_placement_and_bounds() {
        let mut canvas = Canvas::new();
        canvas.set_cursor(3, 2).unwrap();
        assert_eq!(canvas.cursor(), 3 * 6 + 2 * 84);

        assert_eq!(canvas.set_cursor(14, 0), Err(Error::OutOfBorder));
        assert_eq!(canvas.set_cursor(0, 6), Err(Error::OutOfBorder));
        canvas.set_cursor(13, 5).unwrap();
        assert_eq!(canvas.cursor(), 498);
    }

    #[test]
    fn remap_covers_both_alphabet_blocks() {
        assert_eq!(glyph_index(b' '), 0);
        assert_eq!(glyph_index(b'A'), 33);
        assert_eq!(glyph_index(0x7F), 95);
        assert_eq!(glyph_index(0xC0), 96);
        assert_eq!(glyph_index(0xFF), 159);
        // Control codes and the 0x80..0xBF gap render blank.
        assert_eq!(glyph_index(0x00), BLANK_GLYPH);
        assert_eq!(glyph_index(0x1F), BLANK_GLYPH);
        assert_eq!(glyph_index(0xBF), BLANK_GLYPH);
    }

    #[test]
    fn x1_char_writes_five_columns_and_a_spacer() {
        let mut canvas = Canvas::new();
        canvas.put_char(font(), FontSize::X1, b'A').unwrap();

        // 'A' is 7E 11 11 11 7E, shifted left once on the way in.
        assert_eq!(canvas.byte(0), 0xFC);
        assert_eq!(canvas.byte(1), 0x22);
        assert_eq!(canvas.byte(2), 0x22);
        assert_eq!(canvas.byte(3), 0x22);
        assert_eq!(canvas.byte(4), 0xFC);
        assert_eq!(canvas.byte(5), 0x00);
        assert_eq!(canvas.cursor(), 6);
        assert_eq!(canvas.dirty_span(), Some((0, 5)));
    }

    #[test]
    fn unknown_code_renders_blank_cell() {
        let mut canvas = Canvas::new();
        canvas.put_char(font(), FontSize::X1, 0x07).unwrap();
        assert_eq!(canvas.dirty_span(), Some((0, 5)));
        assert!(canvas.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn double_nibble_doubles_each_bit() {
        assert_eq!(double_nibble(0x0), 0x00);
        assert_eq!(double_nibble(0x1), 0b0000_0011);
        assert_eq!(double_nibble(0x2), 0b0000_1100);
        assert_eq!(double_nibble(0x4), 0b0011_0000);
        assert_eq!(double_nibble(0x8), 0b1100_0000);
        assert_eq!(double_nibble(0xF), 0xFF);
        assert_eq!(double_nibble(0x5), 0b0011_0011);
    }

    #[test]
    fn x2_char_expands_into_two_cell_rows() {
        let mut canvas = Canvas::new();
        canvas.set_cursor(0, 1).unwrap();
        canvas.put_char(font(), FontSize::X2, b'A').unwrap();

        // First column of 'A': 0x7E << 1 = 0xFC. Low nibble 0xC
        // doubles to 0xF0, high nibble 0xF to 0xFF.
        assert_eq!(canvas.byte(0), 0xF0);
        assert_eq!(canvas.byte(1), 0xF0);
        assert_eq!(canvas.byte(84), 0xFF);
        assert_eq!(canvas.byte(85), 0xFF);

        // Second column: 0x11 << 1 = 0x22, both nibbles 0x2 -> 0x0C.
        assert_eq!(canvas.byte(2), 0x0C);
        assert_eq!(canvas.byte(3), 0x0C);
        assert_eq!(canvas.byte(86), 0x0C);
        assert_eq!(canvas.byte(87), 0x0C);

        // Cursor advanced 11 from cell (0, 1); spacer written there.
        assert_eq!(canvas.cursor(), 96);
        assert_eq!(canvas.byte(95), 0x00);
    }

    #[test]
    fn x2_in_top_row_is_out_of_border() {
        let mut canvas = Canvas::new();
        canvas.set_cursor(2, 0).unwrap();
        assert_eq!(
            canvas.put_char(font(), FontSize::X2, b'A'),
            Err(Error::OutOfBorder)
        );
        // No glyph bytes written, but the watermark still widened
        // down to the frame start.
        assert!(canvas.bytes().iter().all(|&b| b == 0));
        assert_eq!(canvas.dirty_span(), Some((0, 12)));
    }

    #[test]
    fn cursor_wraps_at_cache_end_with_distinct_code() {
        let mut canvas = Canvas::new();
        canvas.set_cursor(13, 5).unwrap();
        let advance = canvas.put_char(font(), FontSize::X1, b'Z').unwrap();
        assert_eq!(advance, Advance::Wrapped);
        assert_eq!(canvas.cursor(), 0);
    }

    #[test]
    fn put_str_renders_consecutive_cells() {
        let mut canvas = Canvas::new();
        canvas.put_str(font(), FontSize::X1, "AB").unwrap();

        assert_eq!(canvas.byte(0), 0xFC); // 'A' col 0
        assert_eq!(canvas.byte(6), 0xFE); // 'B' col 0: 0x7F << 1
        assert_eq!(canvas.cursor(), 12);
        assert_eq!(canvas.dirty_span(), Some((0, 11)));
    }

    #[test]
    fn put_str_survives_a_wrap() {
        let mut canvas = Canvas::new();
        canvas.set_cursor(13, 5).unwrap();
        canvas.put_str(font(), FontSize::X1, "AB").unwrap();
        // 'A' wrapped the cursor to 0, 'B' landed in the first cell.
        assert_eq!(canvas.byte(0), 0xFE);
        assert_eq!(canvas.cursor(), 6);
    }

    #[test]
    fn put_bytes_stops_at_first_failure() {
        let mut canvas = Canvas::new();
        canvas.set_cursor(0, 0).unwrap();
        assert_eq!(
            canvas.put_bytes(font(), FontSize::X2, b"AB"),
            Err(Error::OutOfBorder)
        );
        // Nothing drawn: the first double-height glyph already had no
        // row above it.
        assert!(canvas.bytes().iter().all(|&b| b == 0));
    }
}
