//! Indexed-color pixel canvas
//!
//! Coordinates are signed so callers can position text partly outside the
//! canvas; every write is clipped.

// Glyph offsets are tiny, widening them to i64 cannot wrap
#![allow(clippy::cast_possible_wrap)]

use super::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Palette index bit that selects the darker tint of a level
pub const GUIDE_BIT: u8 = 0x40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Canvas filled with palette index 0
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|x| *x < self.width)?;
        let y = usize::try_from(y).ok().filter(|y| *y < self.height)?;
        Some(y * self.width + x)
    }

    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: i64, y: i64, value: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = value;
        }
    }

    /// OR `bits` into the pixel at (`x`, `y`)
    pub fn or(&mut self, x: i64, y: i64, bits: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] |= bits;
        }
    }

    /// Text left to right with its top-left corner at (`x`, `y`)
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, color: u8) {
        for (i, c) in (0_i64..).zip(text.chars()) {
            let origin = x + i * ADVANCE as i64;
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if font::is_set(c, col, row) {
                        self.set(origin + col as i64, y + row as i64, color);
                    }
                }
            }
        }
    }

    /// Text running top to bottom, glyphs turned a quarter turn
    pub fn draw_text_rotated(&mut self, x: i64, y: i64, text: &str, color: u8) {
        for (i, c) in (0_i64..).zip(text.chars()) {
            let origin = y + i * ADVANCE as i64;
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if font::is_set(c, col, GLYPH_HEIGHT - 1 - row) {
                        self.set(x + row as i64, origin + col as i64, color);
                    }
                }
            }
        }
    }

    /// Mark a vertical guide from `y0` to `y1` inclusive
    pub fn guide_vertical(&mut self, x: i64, y0: i64, y1: i64) {
        for y in y0..=y1 {
            self.or(x, y, GUIDE_BIT);
        }
    }

    /// Mark a horizontal guide from `x0` to `x1` inclusive
    pub fn guide_horizontal(&mut self, y: i64, x0: i64, x1: i64) {
        for x in x0..=x1 {
            self.or(x, y, GUIDE_BIT);
        }
    }

    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(canvas: &Canvas) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        for y in 0..canvas.height() as i64 {
            for x in 0..canvas.width() as i64 {
                if canvas.get(x, y) != Some(0) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_writes_are_clipped() {
        let mut canvas = Canvas::new(4, 3);
        canvas.set(-1, 0, 9);
        canvas.set(4, 0, 9);
        canvas.set(0, 3, 9);
        canvas.or(3, 2, GUIDE_BIT);
        assert_eq!(lit(&canvas), vec![(3, 2)]);
        assert_eq!(canvas.get(3, 2), Some(GUIDE_BIT));
        assert_eq!(canvas.get(7, 7), None);
    }

    #[test]
    fn test_draw_text_places_glyph_columns() {
        let mut canvas = Canvas::new(12, 7);
        canvas.draw_text(0, 0, "11", 63);
        // centre column of each '1' is fully lit
        assert!((0..7).all(|y| canvas.get(2, y) == Some(63)));
        assert!((0..7).all(|y| canvas.get(8, y) == Some(63)));
        assert!((0..7).all(|y| canvas.get(5, y) == Some(0)));
    }

    #[test]
    fn test_rotated_text_runs_downwards() {
        let mut canvas = Canvas::new(7, 12);
        canvas.draw_text_rotated(0, 0, "11", 63);
        assert!((0..7).all(|x| canvas.get(x, 2) == Some(63)));
        assert!((0..7).all(|x| canvas.get(x, 8) == Some(63)));
        assert!((0..7).all(|x| canvas.get(x, 5) == Some(0)));
    }

    #[test]
    fn test_guides_keep_intensity() {
        let mut canvas = Canvas::new(5, 5);
        canvas.set(2, 2, 10);
        canvas.guide_vertical(2, -3, 10);
        canvas.guide_horizontal(0, 0, 4);
        assert_eq!(canvas.get(2, 2), Some(10 | GUIDE_BIT));
        assert_eq!(canvas.get(2, 4), Some(GUIDE_BIT));
        assert_eq!(canvas.get(4, 0), Some(GUIDE_BIT));
        assert_eq!(canvas.get(4, 1), Some(0));
    }
}
