//! Watch histograms
//!
//! One component: a bar per normalized value, anchored at the bottom of the
//! plot. Two components: a soft dot per (X, Y) pair, larger Y toward the top.
//!
//! ```text
//!   0,0 ┌──────────────────────────────┐
//!       │        TOP margin            │
//!       │  Y   ┌────────────────────┐  │
//!       │ tick │      plot area     │  │
//!       │ text │   cw × ch pixels   │  │
//!       │      └────────────────────┘  │
//!       │        X ticks, caption      │
//!       │            title             │
//!       └──────────────────────────────┘
//! ```

// Plot geometry is small and non-negative; float ↔ int casts are for layout only
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use log::debug;
use std::collections::BTreeMap;

use super::canvas::Canvas;
use super::palette::{self, MAX_LEVEL};
use super::Image;
use crate::directive::{Component, WatchSpec};
use crate::domain::Rgb;

const WIDTH: usize = 276;
const HEIGHT_ONE_COMPONENT: usize = 148;
const HEIGHT_TWO_COMPONENTS: usize = 276;
const TOP: i64 = 20;
const LEFT: i64 = 40;
/// Horizontal and vertical space taken by margins, ticks and captions
const MARGIN: usize = 60;

/// Palette index of a dot halo
const HALO: u8 = 1;

/// Normalized positions of the five axis ticks
const TICK_POSITIONS: [f64; 5] = [0.0, 64.0 / 255.0, 128.0 / 255.0, 192.0 / 255.0, 1.0];

#[rustfmt::skip]
const DOT_MASK: [[u8; 7]; 7] = [
    [0, 0, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 0, 0],
];

/// Intensity level for a bucket: `floor(sqrt(freq / max) * 63)`
#[must_use]
pub fn intensity(freq: u64, max_freq: u64) -> u8 {
    (density(freq, max_freq) * f64::from(MAX_LEVEL)) as u8
}

fn density(freq: u64, max_freq: u64) -> f64 {
    if max_freq == 0 {
        return 0.0;
    }
    (freq as f64 / max_freq as f64).sqrt()
}

/// Bucket counts keyed by normalized (X, Y); Y is 0 for one-component watches
#[must_use]
pub fn bin(watch: &WatchSpec, samples: &[Vec<i64>]) -> BTreeMap<(u8, u8), u64> {
    let mut buckets = BTreeMap::new();
    let arity = watch.components.len();
    for sample in samples {
        if sample.len() < arity {
            debug!("short sample {sample:?} for {}", watch.caption());
            continue;
        }
        let mut key = [0_u8; 2];
        for ((slot, component), raw) in key.iter_mut().zip(&watch.components).zip(sample) {
            *slot = component.value_type().normalize(*raw);
        }
        *buckets.entry((key[0], key[1])).or_insert(0) += 1;
    }
    buckets
}

pub struct HistogramRenderer {
    palette: Vec<Rgb>,
}

impl HistogramRenderer {
    #[must_use]
    pub fn new(highlight: Rgb) -> Self {
        Self { palette: palette::build(highlight) }
    }

    /// Render the samples of one watch; `None` when there are no samples
    #[must_use]
    pub fn render(&self, watch: &WatchSpec, samples: &[Vec<i64>]) -> Option<Image> {
        let buckets = bin(watch, samples);
        let max_freq = buckets.values().copied().max()?;

        let two_d = watch.components.len() > 1;
        let height = if two_d { HEIGHT_TWO_COMPONENTS } else { HEIGHT_ONE_COMPONENT };
        let plot = Plot::new(WIDTH, height);
        let mut canvas = Canvas::new(WIDTH, height);

        for (&(v0, v1), &freq) in &buckets {
            let x = i64::from(v0) * plot.cw / 255 + LEFT;
            let level = intensity(freq, max_freq);
            if two_d {
                let y = i64::from(255 - v1) * plot.ch / 255 + TOP;
                stamp(&mut canvas, x, y, level);
            } else {
                let bottom = TOP + plot.ch - 1;
                let bar = (density(freq, max_freq) * (plot.ch - 1) as f64) as i64;
                for y in bottom - bar..=bottom {
                    stamp(&mut canvas, x, y, level);
                }
            }
        }

        for (axis, component) in watch.components.iter().enumerate() {
            plot.decorate_axis(&mut canvas, axis, component);
        }
        let title = watch.caption();
        canvas.draw_text(
            (WIDTH / 2) as i64 - 3 * title.chars().count() as i64,
            height as i64 - 10,
            &title,
            MAX_LEVEL,
        );

        Some(Image {
            width: WIDTH,
            height,
            palette: self.palette.clone(),
            pixels: canvas.into_pixels(),
        })
    }
}

/// Dot mask around (`x`, `y`) plus the exact bucket cell
fn stamp(canvas: &mut Canvas, x: i64, y: i64, level: u8) {
    for (dy, row) in (-3_i64..).zip(DOT_MASK) {
        for (dx, cell) in (-3_i64..).zip(row) {
            if cell == 1 && canvas.get(x + dx, y + dy) == Some(0) {
                canvas.set(x + dx, y + dy, HALO);
            }
        }
    }
    canvas.set(x, y, level);
}

struct Plot {
    cw: i64,
    ch: i64,
}

impl Plot {
    fn new(width: usize, height: usize) -> Self {
        Self { cw: (width - MARGIN) as i64, ch: (height - MARGIN) as i64 }
    }

    fn decorate_axis(&self, canvas: &mut Canvas, axis: usize, component: &Component) {
        let labels = component.value_type().tick_labels();
        for (fraction, label) in TICK_POSITIONS.into_iter().zip(labels) {
            let len = label.len() as f64;
            if axis == 0 {
                let x = (fraction * self.cw as f64) as i64 + LEFT;
                let text_x = (x as f64 - len * 6.0 * fraction) as i64;
                canvas.draw_text(text_x, TOP + self.ch + 7, label, MAX_LEVEL);
                canvas.guide_vertical(x, TOP, TOP + self.ch + 3);
            } else {
                let y = ((1.0 - fraction) * self.ch as f64) as i64 + TOP;
                let text_y = (y as f64 - len * 6.0 * (1.0 - fraction)) as i64;
                canvas.draw_text_rotated(LEFT - 12, text_y, label, MAX_LEVEL);
                canvas.guide_horizontal(y, LEFT - 3, LEFT + self.cw);
            }
        }

        // Captions are drawn twice, one pixel apart, for a bold face
        let name = component.name();
        let half = name.chars().count() as f64 * 3.0;
        for offset in [0.0, 1.0] {
            if axis == 0 {
                let x = (LEFT as f64 + self.cw as f64 * 0.5 - half + offset) as i64;
                canvas.draw_text(x, TOP + self.ch + 18, name, MAX_LEVEL);
            } else {
                let y = (TOP as f64 + self.ch as f64 * 0.5 - half + offset) as i64;
                canvas.draw_text_rotated(LEFT - 22, y, name, MAX_LEVEL);
            }
        }
    }
}
