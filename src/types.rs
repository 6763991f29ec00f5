// Core value types shared by the pipeline stages.

use image::{Rgb, RgbImage};

/// A source or intermediate raster, one RGB triplet per pixel.
pub type RasterImage = RgbImage;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Absolute screen coordinate. Signed: a stroke may start one pixel left of the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Target rectangle on screen. Width and height are never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// `None` for a degenerate (zero-sized) rectangle.
    pub fn new(origin: Point, width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { origin, width, height })
    }
}

/// 1-bit image: every pixel is exactly black or white.
/// Only the ditherer builds one (see dither.rs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitImage(RgbImage);

impl BitImage {
    pub(crate) fn from_dark_mask(width: u32, height: u32, dark: &[bool]) -> Self {
        debug_assert_eq!(dark.len(), (width as usize) * (height as usize));
        let img = RgbImage::from_fn(width, height, |x, y| {
            if dark[(y * width + x) as usize] { BLACK } else { WHITE }
        });
        Self(img)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.0.get_pixel(x, y)
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    /// Number of black pixels.
    pub fn ink(&self) -> usize {
        self.0.pixels().filter(|p| **p == BLACK).count()
    }
}

/// Maximal horizontal span of dark pixels in one row; `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub row: u32,
    pub start: u32,
    pub end: u32,
}

impl Run {
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// One press-drag-release gesture between two absolute points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub start: Point,
    pub end: Point,
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Solid canvas filled with `color`.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    /// Pack an RGB image as 0x00RRGGBB pixels.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let pixels = img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self { width: img.width() as usize, height: img.height() as usize, pixels }
    }

    /// Grow the canvas downward so a HUD line fits below the picture.
    pub fn with_footer(mut self, rows: usize, color: u32) -> Self {
        self.pixels.extend(std::iter::repeat_n(color, rows * self.width));
        self.height += rows;
        self
    }
}
