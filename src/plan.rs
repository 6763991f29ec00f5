//! Row scanner that turns a 1-bit image into horizontal strokes.
//!
//! Each row is scanned left to right with a counter of consecutive dark
//! pixels. A run closes on the first light pixel after it, or at the last
//! column. A run closed by a light pixel is pressed one pixel to its left
//! (`end - len`), so even a single dark pixel becomes a short drag; a run
//! that reaches the row end is drawn from its first to its last column.
//!
//! The planner is lazy: strokes are produced one at a time, and the guard
//! callback is consulted before every pixel so a draw pass can stop between
//! any two pixels.

use image::Rgb;

use crate::gray::luma_x100;
use crate::guard::{AbortReason, Verdict};
use crate::types::{BitImage, Point, Run, Stroke};

/// Pixels with weighted luminance below 110 are ink.
const DARK_BELOW_X100: u32 = 110 * 100;

#[inline]
pub fn is_dark(p: Rgb<u8>) -> bool {
    luma_x100(p) < DARK_BELOW_X100
}

#[derive(Clone, Copy)]
enum Closing {
    LightPixel,
    RowEnd,
}

pub struct StrokePlanner<'a> {
    bits: &'a BitImage,
    origin: Point,
    row: u32,
    col: u32,
    count: u32,
    examined: u64,
    aborted: Option<AbortReason>,
}

impl<'a> StrokePlanner<'a> {
    /// `origin` is the screen position of pixel (0, 0).
    pub fn new(bits: &'a BitImage, origin: Point) -> Self {
        Self { bits, origin, row: 0, col: 0, count: 0, examined: 0, aborted: None }
    }

    /// Next run and its stroke, asking `guard` before each pixel.
    /// Once the guard aborts, this and every later call return `None`.
    pub fn next_guarded<F>(&mut self, mut guard: F) -> Option<(Run, Stroke)>
    where
        F: FnMut() -> Verdict,
    {
        if self.aborted.is_some() {
            return None;
        }
        let (w, h) = (self.bits.width(), self.bits.height());

        while self.row < h {
            while self.col < w {
                if let Verdict::Abort(reason) = guard() {
                    tracing::info!(row = self.row, col = self.col, %reason, "draw aborted");
                    self.aborted = Some(reason);
                    return None;
                }
                let j = self.col;
                self.col += 1;
                self.examined += 1;

                if is_dark(self.bits.pixel(j, self.row)) {
                    self.count += 1;
                    if j == w - 1 {
                        return Some(self.close(j, Closing::RowEnd));
                    }
                } else if self.count > 0 {
                    return Some(self.close(j - 1, Closing::LightPixel));
                }
            }
            self.row += 1;
            self.col = 0;
            self.count = 0;
        }
        None
    }

    fn close(&mut self, end: u32, closing: Closing) -> (Run, Stroke) {
        let len = self.count;
        self.count = 0;

        let run = Run { row: self.row, start: end + 1 - len, end };
        let press = match closing {
            Closing::LightPixel => end as i32 - len as i32,
            Closing::RowEnd => run.start as i32,
        };
        let y = self.row as i32;
        let stroke = Stroke {
            start: self.origin.offset(press, y),
            end: self.origin.offset(end as i32, y),
        };
        (run, stroke)
    }

    /// Pixels examined so far (one guard check each).
    pub fn examined(&self) -> u64 {
        self.examined
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        self.aborted.as_ref()
    }

    pub fn into_abort_reason(self) -> Option<AbortReason> {
        self.aborted
    }
}

/// Unguarded: yields every stroke of the image.
impl Iterator for StrokePlanner<'_> {
    type Item = Stroke;

    fn next(&mut self) -> Option<Stroke> {
        self.next_guarded(|| Verdict::Continue).map(|(_, stroke)| stroke)
    }
}

/// All runs of the image, top to bottom, left to right.
pub fn runs(bits: &BitImage) -> impl Iterator<Item = Run> + '_ {
    let mut planner = StrokePlanner::new(bits, Point::new(0, 0));
    std::iter::from_fn(move || planner.next_guarded(|| Verdict::Continue).map(|(run, _)| run))
}
