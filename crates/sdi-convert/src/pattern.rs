//! Test pattern generators.
//!
//! Patterns are defined on normalized full-range R'G'B' and rendered into
//! any [`Sample`] type with `from_unit(v, false)`.

use sdi_core::{Error, Result, RgbFrame, Sample};
use serde::{Deserialize, Serialize};

/// 100% colour bars, left to right.
pub const BARS: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 0.0],
];

/// Default checkerboard square size in pixels.
pub const CHECKER_SIZE: u32 = 32;

/// A synthetic frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Horizontal grey ramp from `start` at x = 0 to `end` at the last column
    Gradient {
        /// Value of the first column
        start: f32,
        /// Value of the last column
        end: f32,
    },
    /// Eight vertical 100% bars
    Bars,
    /// Eight vertical 75% bars
    Bars75,
    /// Black and white squares, black at the origin
    Checkerboard {
        /// Square size in pixels
        size: u32,
    },
    /// One colour everywhere
    Solid([f32; 3]),
    /// Rectangle of `color` over `background`
    Patch {
        /// Patch colour
        color: [f32; 3],
        /// Colour outside the patch
        background: [f32; 3],
        /// Normalized centre (x, y)
        center: (f32, f32),
        /// Normalized size (width, height)
        size: (f32, f32),
    },
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Gradient { start: 0.0, end: 1.0 }
    }
}

impl Pattern {
    /// Parses a pattern name with default parameters.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gradient" => Ok(Pattern::default()),
            "bars" => Ok(Pattern::Bars),
            "bars75" => Ok(Pattern::Bars75),
            "checkerboard" | "checker" => Ok(Pattern::Checkerboard { size: CHECKER_SIZE }),
            _ => Err(Error::parse("pattern", name)),
        }
    }

    /// Renders at `width` x `height`.
    pub fn render<T: Sample>(&self, width: u32, height: u32) -> Result<RgbFrame<T>> {
        let px = |rgb: [f32; 3]| rgb.map(|v| T::from_unit(v, false));
        match *self {
            Pattern::Gradient { start, end } => {
                let last = width.saturating_sub(1).max(1) as f32;
                RgbFrame::from_fn(width, height, |x, _| {
                    px([start + (end - start) * x as f32 / last; 3])
                })
            }
            Pattern::Bars => bars(width, height, 1.0, px),
            Pattern::Bars75 => bars(width, height, 0.75, px),
            Pattern::Checkerboard { size } => {
                let size = size.max(1);
                RgbFrame::from_fn(width, height, |x, y| {
                    let white = (x / size + y / size) % 2 == 1;
                    px([if white { 1.0 } else { 0.0 }; 3])
                })
            }
            Pattern::Solid(color) => {
                let c = px(color);
                RgbFrame::from_fn(width, height, |_, _| c)
            }
            Pattern::Patch {
                color,
                background,
                center,
                size,
            } => {
                let (fg, bg) = (px(color), px(background));
                let (left, right) = patch_span(center.0, size.0, width);
                let (top, bottom) = patch_span(center.1, size.1, height);
                RgbFrame::from_fn(width, height, |x, y| {
                    if (left..right).contains(&x) && (top..bottom).contains(&y) { fg } else { bg }
                })
            }
        }
    }
}

fn bars<T: Sample>(
    width: u32,
    height: u32,
    level: f32,
    px: impl Fn([f32; 3]) -> [T; 3],
) -> Result<RgbFrame<T>> {
    let colors = BARS.map(|c| px(c.map(|v| v * level)));
    let bar_width = (width / 8).max(1);
    RgbFrame::from_fn(width, height, |x, _| colors[(x / bar_width).min(7) as usize])
}

/// Pixel interval [start, end) covered by a centred span along one axis.
fn patch_span(center: f32, size: f32, extent: u32) -> (u32, u32) {
    let extent_f = extent as f32;
    let len = (size.clamp(0.0, 1.0) * extent_f) as i64;
    let mid = (center.clamp(0.0, 1.0) * extent_f) as i64;
    let start = (mid - len / 2).max(0);
    let end = (mid + (len + 1) / 2).min(extent as i64);
    (start as u32, end.max(start) as u32)
}

/// Normalized value whose u16 rendering is `code << 6`.
///
/// Lets 10-bit integer colours drive [`Pattern`] the way 16-bit frames
/// carry them.
pub fn ten_bit_to_unit(code: u16) -> f32 {
    ((code.min(1023) as u32) << 6) as f32 / 65535.0
}
