// Validated settings for a draw pass, built from the command line.

use std::time::Duration;

use crate::dither::{ChannelReduction, DitherOptions, Quantize};
use crate::error::{Error, Result};
use crate::executor::FailurePolicy;
use crate::types::{Point, Region};

pub const DEFAULT_SETTLE_MS: u64 = 10;
pub const DEFAULT_START_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct DrawSettings {
    /// Pause after each stroke so the target registers it.
    pub settle: Duration,
    /// Pause before the session starts, to focus the target window.
    pub start_delay: Duration,
    pub reduction: ChannelReduction,
    pub quantize: Quantize,
    pub on_failure: FailurePolicy,
}

impl DrawSettings {
    pub fn dither_options(&self) -> DitherOptions {
        DitherOptions { reduction: self.reduction, quantize: self.quantize }
    }
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            start_delay: Duration::from_millis(DEFAULT_START_DELAY_MS),
            reduction: ChannelReduction::Sum,
            quantize: Quantize::Working,
            on_failure: FailurePolicy::Ignore,
        }
    }
}

/// Target rectangle from raw arguments; zero width or height is refused.
pub fn region(x: i32, y: i32, width: u32, height: u32) -> Result<Region> {
    Region::new(Point::new(x, y), width, height)
        .ok_or_else(|| Error::Config(format!("target region {width}x{height} is empty")))
}
