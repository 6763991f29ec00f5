//! End-to-end: prepare a bitmap, then paint it through a platform.

use std::thread;

use crate::config::DrawSettings;
use crate::dither::{self, DitherOptions};
use crate::error::Result;
use crate::executor;
use crate::gray;
use crate::guard::{self, AbortReason, DrawSession};
use crate::plan::StrokePlanner;
use crate::platform::InputPlatform;
use crate::source;
use crate::types::{BitImage, Point, RasterImage};

/// Resize to the footprint, grayscale, dither.
pub fn prepare(src: &RasterImage, width: u32, height: u32, options: impl Into<DitherOptions>) -> Result<BitImage> {
    let sized = source::fit(src, width, height)?;
    let grayed = gray::to_grayscale(&sized);
    let bits = dither::dither(&grayed, options)?;
    tracing::debug!(width, height, ink = bits.ink(), "bitmap ready");
    Ok(bits)
}

/// Outcome of one draw pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawReport {
    pub strokes: usize,
    pub pixels_examined: u64,
    /// Set when the guard stopped the pass early.
    pub aborted: Option<AbortReason>,
}

impl DrawReport {
    pub fn completed(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Paint `bits` with pixel (0, 0) at `origin`.
///
/// The session must already be started against the target window. Every
/// pixel is guarded; each stroke is followed by `settings.settle`.
pub fn draw<P: InputPlatform + ?Sized>(
    bits: &BitImage,
    origin: Point,
    session: &mut DrawSession,
    platform: &mut P,
    settings: &DrawSettings,
) -> Result<DrawReport> {
    let mut planner = StrokePlanner::new(bits, origin);
    let mut strokes = 0;

    while let Some((_, stroke)) = planner.next_guarded(|| guard::poll(&*session, &*platform)) {
        executor::execute(stroke, session, platform, settings.on_failure)?;
        strokes += 1;
        if !settings.settle.is_zero() {
            thread::sleep(settings.settle);
        }
    }

    let report = DrawReport {
        strokes,
        pixels_examined: planner.examined(),
        aborted: planner.into_abort_reason(),
    };
    match &report.aborted {
        None => tracing::info!(strokes, pixels = report.pixels_examined, "drawing finished"),
        Some(reason) => tracing::info!(strokes, pixels = report.pixels_examined, %reason, "drawing stopped early"),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{ChannelReduction, Quantize};
    use crate::plan;
    use crate::platform::RecordingPlatform;
    use crate::types::{BLACK, Run};
    use image::Rgb;
    use std::time::Duration;

    fn quick() -> DrawSettings {
        DrawSettings { settle: Duration::ZERO, start_delay: Duration::ZERO, ..DrawSettings::default() }
    }

    #[test]
    fn prepare_keeps_footprint_and_is_two_color() {
        let src = RasterImage::from_fn(16, 16, |x, _| {
            let v = (x * 16) as u8;
            Rgb([v, v, v])
        });
        let bits = prepare(&src, 8, 4, ChannelReduction::Mean).unwrap();
        assert_eq!((bits.width(), bits.height()), (8, 4));
        // the darkest column ends up inked
        assert_eq!(bits.pixel(0, 0), BLACK);
    }

    #[test]
    fn desired_threshold_keeps_the_whole_dark_run() {
        let src = RasterImage::from_fn(4, 1, |x, _| {
            let v = if x < 2 { 40 } else { 200 };
            Rgb([v, v, v])
        });
        let diffused = prepare(&src, 4, 1, ChannelReduction::Sum).unwrap();
        assert_eq!(plan::runs(&diffused).collect::<Vec<_>>(), vec![Run { row: 0, start: 0, end: 0 }]);

        let opts = DitherOptions { reduction: ChannelReduction::Sum, quantize: Quantize::Desired };
        let thresholded = prepare(&src, 4, 1, opts).unwrap();
        assert_eq!(plan::runs(&thresholded).collect::<Vec<_>>(), vec![Run { row: 0, start: 0, end: 1 }]);
    }

    #[test]
    fn draws_every_run_on_a_quiet_platform() {
        let src = RasterImage::from_pixel(5, 3, Rgb([0, 0, 0]));
        let bits = prepare(&src, 5, 3, ChannelReduction::Sum).unwrap();

        let mut platform = RecordingPlatform::new(9);
        let mut session = DrawSession::begin(&platform).unwrap();
        let report = draw(&bits, Point::new(20, 30), &mut session, &mut platform, &quick()).unwrap();

        assert!(report.completed());
        assert_eq!(report.strokes, 3);
        assert_eq!(report.pixels_examined, 15);
        assert_eq!(
            platform.drags(),
            vec![
                (Point::new(20, 30), Point::new(24, 30)),
                (Point::new(20, 31), Point::new(24, 31)),
                (Point::new(20, 32), Point::new(24, 32)),
            ]
        );
        assert_eq!(session.last_position(), Some(Point::new(24, 32)));
    }
}
