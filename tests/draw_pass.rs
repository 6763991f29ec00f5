// Full draw passes against scripted platforms: the guard must stop the pass
// as soon as the pointer is disturbed or the focus moves elsewhere.

use std::cell::Cell;
use std::time::Duration;

use image::{Rgb, RgbImage};

use pixel_painter::config::DrawSettings;
use pixel_painter::dither::{ChannelReduction, DitherOptions, Quantize};
use pixel_painter::error::Error;
use pixel_painter::executor::FailurePolicy;
use pixel_painter::guard::{AbortReason, DrawSession};
use pixel_painter::pipeline::{self, DrawReport};
use pixel_painter::platform::{InputPlatform, PlatformError, PlatformResult, RecordingPlatform};
use pixel_painter::types::{BitImage, Point, Region};

const TARGET_PID: u32 = 4242;

/// Pointer that obeys, plus optional interference.
struct Scripted {
    at: Point,
    releases: usize,
    /// After this many releases the "user" shoves the mouse.
    shove_after: Option<usize>,
    owner_calls: Cell<usize>,
    /// After this many owner lookups another process has focus.
    focus_lost_after: Option<usize>,
    fail_buttons: bool,
    moves: Vec<Point>,
}

impl Scripted {
    fn new() -> Self {
        Self {
            at: Point::new(0, 0),
            releases: 0,
            shove_after: None,
            owner_calls: Cell::new(0),
            focus_lost_after: None,
            fail_buttons: false,
            moves: Vec::new(),
        }
    }
}

impl InputPlatform for Scripted {
    fn set_pointer(&mut self, to: Point) -> PlatformResult<()> {
        self.at = to;
        self.moves.push(to);
        Ok(())
    }

    fn press(&mut self) -> PlatformResult<()> {
        if self.fail_buttons {
            return Err(PlatformError::Injection("no input desktop".into()));
        }
        Ok(())
    }

    fn release(&mut self) -> PlatformResult<()> {
        if self.fail_buttons {
            return Err(PlatformError::Injection("no input desktop".into()));
        }
        self.releases += 1;
        if self.shove_after == Some(self.releases) {
            self.at = self.at.offset(3, 7);
        }
        Ok(())
    }

    fn pointer(&self) -> PlatformResult<Point> {
        Ok(self.at)
    }

    fn foreground_owner(&self) -> PlatformResult<u32> {
        let n = self.owner_calls.get() + 1;
        self.owner_calls.set(n);
        match self.focus_lost_after {
            Some(limit) if n > limit => Ok(TARGET_PID + 1),
            _ => Ok(TARGET_PID),
        }
    }

    fn capture_region(&self, _: Region) -> PlatformResult<RgbImage> {
        Err(PlatformError::Unsupported("capture"))
    }
}

fn quick() -> DrawSettings {
    DrawSettings { settle: Duration::ZERO, start_delay: Duration::ZERO, ..DrawSettings::default() }
}

fn gray_row(values: &[u8]) -> RgbImage {
    RgbImage::from_fn(values.len() as u32, 1, |x, _| {
        let v = values[x as usize];
        Rgb([v, v, v])
    })
}

fn solid_black(w: u32, h: u32) -> BitImage {
    let src = RgbImage::from_pixel(w, h, Rgb([0, 0, 0]));
    pipeline::prepare(&src, w, h, ChannelReduction::Sum).unwrap()
}

fn run<P: InputPlatform>(bits: &BitImage, origin: Point, platform: &mut P, settings: &DrawSettings) -> DrawReport {
    let mut session = DrawSession::begin(&*platform).unwrap();
    pipeline::draw(bits, origin, &mut session, platform, settings).unwrap()
}

#[test]
fn external_pointer_move_stops_after_in_flight_stroke() {
    let bits = solid_black(4, 3);
    let mut platform = Scripted::new();
    platform.shove_after = Some(1);

    let report = run(&bits, Point::new(50, 60), &mut platform, &quick());

    assert_eq!(report.strokes, 1);
    // the very next pixel check saw the shove
    assert_eq!(report.pixels_examined, 4);
    assert_eq!(
        report.aborted,
        Some(AbortReason::PointerMoved { expected: Point::new(53, 60), actual: Point::new(56, 67) })
    );
    // nothing was sent after the first stroke
    assert_eq!(platform.moves, vec![Point::new(50, 60), Point::new(53, 60)]);
}

#[test]
fn focus_change_stops_regardless_of_pointer() {
    let bits = solid_black(4, 2);
    let mut platform = Scripted::new();
    // lookup 1 starts the session, 2..=5 guard row 0, 6 and 7 guard row 1
    platform.focus_lost_after = Some(7);

    let report = run(&bits, Point::new(0, 0), &mut platform, &quick());

    assert_eq!(report.strokes, 1);
    assert_eq!(report.pixels_examined, 6);
    assert_eq!(report.aborted, Some(AbortReason::FocusChanged { expected: TARGET_PID, actual: TARGET_PID + 1 }));
}

#[test]
fn focus_lost_before_first_pixel_draws_nothing() {
    let bits = solid_black(3, 3);
    let mut platform = Scripted::new();
    platform.focus_lost_after = Some(1);

    let report = run(&bits, Point::new(0, 0), &mut platform, &quick());

    assert_eq!(report.strokes, 0);
    assert_eq!(report.pixels_examined, 0);
    assert!(platform.moves.is_empty());
}

#[test]
fn dark_then_light_row_yields_one_stroke() {
    let src = gray_row(&[40, 40, 200, 200]);
    let origin = Point::new(100, 200);

    // channel sum: 120 goes black, its error pushes the second pixel over the threshold
    let bits = pipeline::prepare(&src, 4, 1, ChannelReduction::Sum).unwrap();
    let mut platform = RecordingPlatform::new(TARGET_PID);
    let report = run(&bits, origin, &mut platform, &quick());
    assert!(report.completed());
    assert_eq!(report.strokes, 1);
    assert_eq!(platform.drags(), vec![(Point::new(99, 200), Point::new(100, 200))]);

    // channel mean: the dark run covers columns 0 and 1
    let bits = pipeline::prepare(&src, 4, 1, ChannelReduction::Mean).unwrap();
    let mut platform = RecordingPlatform::new(TARGET_PID);
    let report = run(&bits, origin, &mut platform, &quick());
    assert!(report.completed());
    assert_eq!(report.strokes, 1);
    assert_eq!(platform.drags(), vec![(Point::new(99, 200), Point::new(101, 200))]);
}

#[test]
fn desired_threshold_row_draws_columns_zero_and_one() {
    let src = gray_row(&[40, 40, 200, 200]);
    let settings = DrawSettings { quantize: Quantize::Desired, ..quick() };
    assert_eq!(
        settings.dither_options(),
        DitherOptions { reduction: ChannelReduction::Sum, quantize: Quantize::Desired }
    );

    let bits = pipeline::prepare(&src, 4, 1, settings.dither_options()).unwrap();
    let mut platform = RecordingPlatform::new(TARGET_PID);
    let report = run(&bits, Point::new(100, 200), &mut platform, &settings);

    assert!(report.completed());
    assert_eq!(report.strokes, 1);
    assert_eq!(platform.drags(), vec![(Point::new(99, 200), Point::new(101, 200))]);
}

#[test]
fn white_image_examines_every_pixel_and_draws_nothing() {
    let src = RgbImage::from_pixel(5, 4, Rgb([255, 255, 255]));
    let bits = pipeline::prepare(&src, 5, 4, ChannelReduction::Sum).unwrap();
    let mut platform = RecordingPlatform::new(TARGET_PID);

    let report = run(&bits, Point::new(0, 0), &mut platform, &quick());

    assert!(report.completed());
    assert_eq!(report.strokes, 0);
    assert_eq!(report.pixels_examined, 20);
    assert!(platform.events().is_empty());
}

#[test]
fn ignored_button_failures_keep_drawing() {
    let bits = solid_black(3, 2);
    let mut platform = Scripted::new();
    platform.fail_buttons = true;

    let report = run(&bits, Point::new(0, 0), &mut platform, &quick());

    assert!(report.completed());
    assert_eq!(report.strokes, 2);
}

#[test]
fn strict_policy_surfaces_button_failure() {
    let bits = solid_black(3, 2);
    let mut platform = Scripted::new();
    platform.fail_buttons = true;
    let settings = DrawSettings { on_failure: FailurePolicy::Stop, ..quick() };

    let mut session = DrawSession::begin(&platform).unwrap();
    let err = pipeline::draw(&bits, Point::new(0, 0), &mut session, &mut platform, &settings).unwrap_err();

    assert!(matches!(err, Error::Platform(PlatformError::Injection(_))));
}

#[test]
fn empty_target_is_rejected_before_dithering() {
    let src = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
    let err = pipeline::prepare(&src, 0, 2, ChannelReduction::Sum).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
