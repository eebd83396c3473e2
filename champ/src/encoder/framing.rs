//! Line protocols spoken to the image encoder
//!
//! Still image (width, height and palette size are passed as arguments):
//!
//! ```text
//! ffffff            palette, one rrggbb per line
//! …
//! f                 pixel data follows
//! 00                one palette index per line, row-major
//! …
//! ```
//!
//! Animation (the encoder is started with `280 192 2`):
//!
//! ```text
//! 000000            background
//! ffffff            foreground
//! l                 frame follows
//! 0011…             one bit string per scanline, 192 lines
//! d 5               delay in ticks
//! ```

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::domain::Rgb;
use crate::render::Image;

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = 280;
/// Screen height in scanlines
pub const SCREEN_HEIGHT: usize = 192;
/// Raster bytes per scanline; each byte holds seven pixels, LSB first
pub const BYTES_PER_ROW: usize = 40;
const PIXELS_PER_BYTE: usize = 7;
/// Emulator cycles per animation delay tick
pub const CYCLES_PER_TICK: u64 = 10_000;

/// One screen frame ready for the animation encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    raster: Vec<u8>,
    pub delay_ticks: u64,
}

impl AnimationFrame {
    /// Frame shown for `elapsed_cycles` since the previous one
    #[must_use]
    pub fn new(raster: Vec<u8>, elapsed_cycles: u64) -> Self {
        Self { raster, delay_ticks: elapsed_cycles / CYCLES_PER_TICK }
    }

    /// Pixel at (`x`, `y`); missing raster bytes read as dark
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let byte = self.raster.get(y * BYTES_PER_ROW + x / PIXELS_PER_BYTE).copied().unwrap_or(0);
        (byte >> (x % PIXELS_PER_BYTE)) & 1 == 1
    }

    fn scanline(&self, y: usize) -> String {
        (0..SCREEN_WIDTH).map(|x| if self.pixel(x, y) { '1' } else { '0' }).collect()
    }
}

/// Arguments the animation encoder is started with
#[must_use]
pub fn animation_args() -> Vec<String> {
    vec![SCREEN_WIDTH.to_string(), SCREEN_HEIGHT.to_string(), "2".to_string()]
}

/// Write the two-color animation palette
///
/// # Errors
/// Propagates write errors.
pub async fn write_animation_header<W: AsyncWrite + Unpin>(
    out: &mut W,
    background: Rgb,
    foreground: Rgb,
) -> std::io::Result<()> {
    let header = format!("{}\n{}\n", background.hex(), foreground.hex());
    out.write_all(header.as_bytes()).await
}

/// Write one `l … d N` frame block
///
/// # Errors
/// Propagates write errors.
pub async fn write_animation_frame<W: AsyncWrite + Unpin>(
    out: &mut W,
    frame: &AnimationFrame,
) -> std::io::Result<()> {
    let mut block = String::with_capacity(2 + SCREEN_HEIGHT * (SCREEN_WIDTH + 1) + 16);
    block.push_str("l\n");
    for y in 0..SCREEN_HEIGHT {
        block.push_str(&frame.scanline(y));
        block.push('\n');
    }
    block.push_str(&format!("d {}\n", frame.delay_ticks));
    out.write_all(block.as_bytes()).await
}

/// Arguments the still-image encoder is started with
#[must_use]
pub fn still_image_args(image: &Image) -> Vec<String> {
    vec![image.width.to_string(), image.height.to_string(), image.palette.len().to_string()]
}

/// Write a complete still image: palette, `f`, pixels
///
/// # Errors
/// Propagates write errors.
pub async fn write_still_image<W: AsyncWrite + Unpin>(
    out: &mut W,
    image: &Image,
) -> std::io::Result<()> {
    let mut body = String::with_capacity(2 + image.palette.len() * 7 + image.pixels.len() * 3);
    for color in &image.palette {
        body.push_str(&color.hex());
        body.push('\n');
    }
    body.push_str("f\n");
    for pixel in &image.pixels {
        body.push_str(&format!("{pixel:02x}\n"));
    }
    out.write_all(body.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_bit_order() {
        let mut raster = vec![0u8; BYTES_PER_ROW * SCREEN_HEIGHT];
        raster[0] = 0b000_0101;
        raster[BYTES_PER_ROW + 1] = 0b100_0000;
        let frame = AnimationFrame::new(raster, 0);
        assert!(frame.pixel(0, 0));
        assert!(!frame.pixel(1, 0));
        assert!(frame.pixel(2, 0));
        assert!(frame.pixel(13, 1));
        assert!(!frame.pixel(13, 0));
    }

    #[test]
    fn test_short_raster_reads_dark() {
        let frame = AnimationFrame::new(vec![0x7f], 0);
        assert!(frame.pixel(6, 0));
        assert!(!frame.pixel(279, 191));
    }

    #[test]
    fn test_delay_is_quantized() {
        assert_eq!(AnimationFrame::new(vec![], 52_011).delay_ticks, 5);
        assert_eq!(AnimationFrame::new(vec![], 9_999).delay_ticks, 0);
    }

    #[tokio::test]
    async fn test_animation_stream() {
        let mut out = Vec::new();
        write_animation_header(&mut out, Rgb::BLACK, Rgb::WHITE).await.unwrap();
        let frame = AnimationFrame::new(vec![1], 30_000);
        write_animation_frame(&mut out, &frame).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[..3], ["000000", "ffffff", "l"]);
        assert_eq!(lines.len(), 3 + SCREEN_HEIGHT + 1);
        assert!(lines[3].starts_with("10000000"));
        assert_eq!(lines[3].len(), SCREEN_WIDTH);
        assert_eq!(lines.last(), Some(&"d 3"));
    }

    #[tokio::test]
    async fn test_still_image_stream() {
        let image = Image {
            width: 2,
            height: 1,
            palette: vec![Rgb::WHITE, Rgb::new(0x12, 0x34, 0x56)],
            pixels: vec![0, 0x41],
        };
        let mut out = Vec::new();
        write_still_image(&mut out, &image).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ffffff\n123456\nf\n00\n41\n");
        assert_eq!(still_image_args(&image), vec!["2", "1", "2"]);
    }

    #[tokio::test]
    async fn test_still_image_starts_with_palette() {
        let image = Image { width: 276, height: 148, palette: vec![Rgb::WHITE; 128], pixels: vec![] };
        let mut out = Vec::new();
        write_still_image(&mut out, &image).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 129);
        assert!(lines[..128].iter().all(|line| *line == "ffffff"));
        assert_eq!(lines[128], "f");
    }
}
