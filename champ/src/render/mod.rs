//! Histogram images for watch samples
//!
//! [`HistogramRenderer`] turns one watch's samples into an indexed-color
//! [`Image`]; [`crate::encoder`] hands it to the external image encoder.

pub mod canvas;
pub mod font;
pub mod histogram;
pub mod palette;

pub use canvas::Canvas;
pub use histogram::HistogramRenderer;

use crate::domain::Rgb;

/// Palette plus row-major palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub palette: Vec<Rgb>,
    pub pixels: Vec<u8>,
}
