//! Floyd–Steinberg error diffusion down to a 1-bit image.
//!
//! The desired intensity of a pixel is the plain sum R + G + B (0..=765)
//! compared against a threshold of 128, so only quite dark tones end up
//! black. [`ChannelReduction::Mean`] divides by three instead for a 50%
//! threshold; it changes the output and is never the default.
//!
//! Error terms are integer-divided by 16, truncating toward zero:
//!
//! ```text
//!            *   7
//!       3    5   1
//! ```
//!
//! The scan is strictly row-major and single pass.

use crate::error::{Error, Result};
use crate::types::{BitImage, RasterImage};

const THRESHOLD: i32 = 128;
const DENOM: i32 = 16;
const W_RIGHT: i32 = 7;
const W_BELOW: i32 = 5;
const W_BELOW_RIGHT: i32 = 1;
const W_BELOW_LEFT: i32 = 3;

/// How the three input channels collapse into one desired intensity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelReduction {
    /// R + G + B, unscaled.
    #[default]
    Sum,
    /// (R + G + B) / 3, truncating.
    Mean,
}

impl ChannelReduction {
    #[inline]
    fn reduce(self, r: u8, g: u8, b: u8) -> i32 {
        let sum = r as i32 + g as i32 + b as i32;
        match self {
            ChannelReduction::Sum => sum,
            ChannelReduction::Mean => sum / 3,
        }
    }
}

/// Which grid the threshold reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quantize {
    /// The working value: desired intensity plus diffused error.
    #[default]
    Working,
    /// The desired intensity alone. Error is still pushed into the working
    /// grid but never read back, so the output is a plain threshold of the
    /// desired grid (the classic painter's output, pixel for pixel).
    Desired,
}

/// Everything that shapes the 1-bit output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherOptions {
    pub reduction: ChannelReduction,
    pub quantize: Quantize,
}

impl From<ChannelReduction> for DitherOptions {
    fn from(reduction: ChannelReduction) -> Self {
        Self { reduction, quantize: Quantize::Working }
    }
}

/// Desired and working grids for one channel.
///
/// `working` starts as a copy of `desired`; each scanned position holds its
/// initial value plus every error term pushed into it by earlier pixels.
/// All three channels share the same desired grid, so one accumulator
/// serves the whole image.
pub struct ErrorAccumulator {
    width: usize,
    height: usize,
    desired: Vec<i32>,
    working: Vec<i32>,
}

impl ErrorAccumulator {
    pub fn new(src: &RasterImage, reduction: ChannelReduction) -> Result<Self> {
        let (w, h) = src.dimensions();
        if w == 0 || h == 0 {
            return Err(Error::Config(format!("cannot dither an empty {w}x{h} image")));
        }
        let desired: Vec<i32> = src.pixels().map(|p| reduction.reduce(p[0], p[1], p[2])).collect();
        let working = desired.clone();
        Ok(Self { width: w as usize, height: h as usize, desired, working })
    }

    pub fn desired(&self, x: usize, y: usize) -> i32 {
        self.desired[y * self.width + x]
    }

    pub fn working(&self, x: usize, y: usize) -> i32 {
        self.working[y * self.width + x]
    }

    #[inline]
    fn push(&mut self, x: usize, y: usize, err: i32, weight: i32) {
        // Rust's `/` on i32 truncates toward zero
        self.working[y * self.width + x] += err * weight / DENOM;
    }

    /// Quantize every pixel in scan order, diffusing the error forward.
    /// Returns the dark mask (true = quantized to 0).
    fn diffuse(&mut self, quantize: Quantize) -> Vec<bool> {
        let (w, h) = (self.width, self.height);
        let mut dark = vec![false; w * h];

        for y in 0..h {
            for x in 0..w {
                let value = match quantize {
                    Quantize::Working => self.working[y * w + x],
                    Quantize::Desired => self.desired[y * w + x],
                };
                let quantized = if value < THRESHOLD { 0 } else { 255 };
                dark[y * w + x] = quantized == 0;
                let err = value - quantized;

                let has_right = x + 1 < w;
                let has_below = y + 1 < h;
                if has_right {
                    self.push(x + 1, y, err, W_RIGHT);
                }
                if has_below {
                    self.push(x, y + 1, err, W_BELOW);
                }
                if has_right && has_below {
                    self.push(x + 1, y + 1, err, W_BELOW_RIGHT);
                }
                if x > 0 && has_below {
                    self.push(x - 1, y + 1, err, W_BELOW_LEFT);
                }
            }
        }
        dark
    }
}

/// Dither `src` to pure black and white.
pub fn dither(src: &RasterImage, options: impl Into<DitherOptions>) -> Result<BitImage> {
    let DitherOptions { reduction, quantize } = options.into();
    let mut acc = ErrorAccumulator::new(src, reduction)?;
    let dark = acc.diffuse(quantize);
    Ok(BitImage::from_dark_mask(src.width(), src.height(), &dark))
}
