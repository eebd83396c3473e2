//! Two-tier histogram palette
//!
//! ```text
//!   0        background (white)
//!   1..=63   accent, lightest → darkest
//!   64..=127 the same 64 levels at 4/5 brightness (guides)
//! ```

// Channel math stays within 0..=255 before narrowing
#![allow(clippy::cast_possible_truncation)]

use crate::domain::Rgb;

/// Intensity levels per tier
pub const LEVELS: usize = 64;
/// Entries in the full palette
pub const PALETTE_SIZE: usize = 2 * LEVELS;
/// Highest intensity, used for text
pub const MAX_LEVEL: u8 = 63;

/// Accent color when the run configuration names none
pub const DEFAULT_HIGHLIGHT: Rgb = Rgb::new(0xfc, 0xe9, 0x8d);

/// Build the palette for `accent`
#[must_use]
pub fn build(accent: Rgb) -> Vec<Rgb> {
    let mut palette = vec![Rgb::BLACK; PALETTE_SIZE];
    for level in 0..LEVELS {
        let color = if level == 0 { Rgb::WHITE } else { scale_level(accent, level) };
        palette[level] = color;
        palette[level + LEVELS] = dim(color);
    }
    palette
}

fn scale_level(accent: Rgb, level: usize) -> Rgb {
    let lightness = ((LEVELS - level) * 4 - 1) as u32;
    let channel = |c: u8| (lightness * u32::from(c) / 255) as u8;
    Rgb::new(channel(accent.r), channel(accent.g), channel(accent.b))
}

fn dim(color: Rgb) -> Rgb {
    let channel = |c: u8| (u32::from(c) * 4 / 5) as u8;
    Rgb::new(channel(color.r), channel(color.g), channel(color.b))
}
