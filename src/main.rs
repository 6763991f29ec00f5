// pixel-painter: paint a picture into another window with simulated mouse strokes.
//
//   draw     load → resize → grayscale → dither → guarded strokes
//   preview  show the bitmap (or the simulated strokes) without touching the mouse
//   dither   write the 1-bit bitmap to a PNG
//   snap     capture a screen region to a PNG (handy to check coordinates)
//
// While drawing, moving the mouse or switching windows stops the pass.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pixel_painter::config::{self, DEFAULT_SETTLE_MS, DEFAULT_START_DELAY_MS, DrawSettings};
use pixel_painter::dither::{ChannelReduction, DitherOptions, Quantize};
use pixel_painter::error::{Error, Result};
use pixel_painter::executor::FailurePolicy;
use pixel_painter::guard::DrawSession;
use pixel_painter::pipeline::{self, DrawReport};
use pixel_painter::plan::StrokePlanner;
use pixel_painter::platform::{DesktopPlatform, InputPlatform, RecordingPlatform};
use pixel_painter::preview::{self, PreviewWindow};
use pixel_painter::types::{BitImage, FrameBuffer, Point, Region, Stroke};
use pixel_painter::{logging, source};

#[derive(Parser, Debug)]
#[command(name = "pixel-painter", version, about = "Paint an image with simulated mouse strokes")]
struct Cli {
    /// Debug logging (one line per stroke); RUST_LOG overrides either level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint IMAGE into the target region
    ///
    /// The focus guard reads the foreground window's owner, which only works
    /// on Windows; elsewhere the pass fails to start. `--dry-run` works on
    /// every platform.
    Draw {
        image: PathBuf,
        #[command(flatten)]
        target: TargetArgs,
        /// Pause after each stroke, in milliseconds
        #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
        settle_ms: u64,
        /// Time to focus the target window before drawing starts, in milliseconds
        #[arg(long, default_value_t = DEFAULT_START_DELAY_MS)]
        start_delay_ms: u64,
        #[command(flatten)]
        dither: DitherArgs,
        /// Stop at the first failed pointer/button call instead of ignoring it
        #[arg(long)]
        strict: bool,
        /// Show the simulated result first; Enter draws, Esc cancels
        #[arg(long)]
        preview: bool,
        /// Plan and log strokes without moving the real pointer
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the dithered bitmap in a window
    Preview {
        image: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
        /// Render the planned strokes instead of the bitmap
        #[arg(long)]
        strokes: bool,
        #[command(flatten)]
        dither: DitherArgs,
    },
    /// Write the dithered bitmap to OUT
    Dither {
        image: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        dither: DitherArgs,
    },
    /// Capture a screen region to OUT
    Snap {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Screen x of the region's top-left corner
    #[arg(long, allow_hyphen_values = true)]
    x: i32,
    /// Screen y of the region's top-left corner
    #[arg(long, allow_hyphen_values = true)]
    y: i32,
    #[arg(long)]
    width: u32,
    #[arg(long)]
    height: u32,
}

impl TargetArgs {
    fn region(&self) -> Result<Region> {
        config::region(self.x, self.y, self.width, self.height)
    }
}

#[derive(Args, Debug)]
struct SizeArgs {
    #[arg(long)]
    width: u32,
    #[arg(long)]
    height: u32,
}

#[derive(Args, Debug)]
struct DitherArgs {
    #[arg(long, value_enum, default_value_t = Reduction::Sum)]
    reduction: Reduction,
    /// `threshold` ignores diffused error, inking exactly the pixels that
    /// are dark on their own
    #[arg(long, value_enum, default_value_t = Quantizer::Diffused)]
    quantize: Quantizer,
}

impl DitherArgs {
    fn options(&self) -> DitherOptions {
        DitherOptions { reduction: self.reduction.to_channel_reduction(), quantize: self.quantize.to_quantize() }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Quantizer {
    /// Threshold the working value (error diffusion)
    Diffused,
    /// Threshold the desired value alone
    Threshold,
}

impl Quantizer {
    fn to_quantize(self) -> Quantize {
        match self {
            Quantizer::Diffused => Quantize::Working,
            Quantizer::Threshold => Quantize::Desired,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Reduction {
    /// R + G + B against 128 (only dark tones become ink)
    Sum,
    /// (R + G + B) / 3 against 128 (half-tone threshold)
    Mean,
}

impl Reduction {
    fn to_channel_reduction(self) -> ChannelReduction {
        match self {
            Reduction::Sum => ChannelReduction::Sum,
            Reduction::Mean => ChannelReduction::Mean,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Draw { image, target, settle_ms, start_delay_ms, dither, strict, preview, dry_run } => {
            let DitherOptions { reduction, quantize } = dither.options();
            let settings = DrawSettings {
                settle: Duration::from_millis(settle_ms),
                start_delay: Duration::from_millis(start_delay_ms),
                reduction,
                quantize,
                on_failure: if strict { FailurePolicy::Stop } else { FailurePolicy::Ignore },
            };
            run_draw(&image, target.region()?, &settings, preview, dry_run)
        }
        Command::Preview { image, size, strokes, dither } => {
            let bits = load_bitmap(&image, size.width, size.height, dither.options())?;
            show(&bits, strokes, "ESC CLOSE")?;
            Ok(())
        }
        Command::Dither { image, size, out, dither } => {
            let bits = load_bitmap(&image, size.width, size.height, dither.options())?;
            save(bits.as_rgb(), &out)?;
            tracing::info!(out = %out.display(), ink = bits.ink(), "bitmap written");
            Ok(())
        }
        Command::Snap { target, out } => {
            let platform = DesktopPlatform::new()?;
            let shot = platform.capture_region(target.region()?)?;
            save(&shot, &out)?;
            tracing::info!(out = %out.display(), "region captured");
            Ok(())
        }
    }
}

fn load_bitmap(path: &Path, width: u32, height: u32, options: DitherOptions) -> Result<BitImage> {
    let src = source::load(path)?;
    pipeline::prepare(&src, width, height, options)
}

fn save(img: &image::RgbImage, out: &Path) -> Result<()> {
    img.save(out).map_err(|source| Error::ImageSave { path: out.to_path_buf(), source })
}

fn run_draw(image: &Path, region: Region, settings: &DrawSettings, preview: bool, dry_run: bool) -> Result<()> {
    let bits = load_bitmap(image, region.width, region.height, settings.dither_options())?;

    if preview && !show(&bits, true, "ENTER DRAW | ESC CANCEL")? {
        tracing::info!("cancelled from preview");
        return Ok(());
    }

    if dry_run {
        let mut platform = RecordingPlatform::new(std::process::id());
        let settings = DrawSettings { settle: Duration::ZERO, ..settings.clone() };
        let report = paint(&bits, region.origin, &mut platform, &settings)?;
        tracing::info!(strokes = report.strokes, events = platform.events().len(), "dry run complete");
        return Ok(());
    }

    let mut platform = DesktopPlatform::new()?;
    tracing::info!(
        delay_ms = settings.start_delay.as_millis() as u64,
        "focus the target window; drawing starts after the delay"
    );
    thread::sleep(settings.start_delay);
    let report = paint(&bits, region.origin, &mut platform, settings)?;
    if !report.completed() {
        tracing::warn!(strokes = report.strokes, "picture is incomplete");
    }
    Ok(())
}

fn paint<P: InputPlatform>(
    bits: &BitImage,
    origin: Point,
    platform: &mut P,
    settings: &DrawSettings,
) -> Result<DrawReport> {
    let mut session = DrawSession::begin(&*platform)?;
    pipeline::draw(bits, origin, &mut session, platform, settings)
}

/// Preview window. Returns true when the user pressed Enter.
fn show(bits: &BitImage, strokes: bool, hint: &str) -> Result<bool> {
    let (w, h) = (bits.width() as usize, bits.height() as usize);
    let (fb, hud) = if strokes {
        let planned: Vec<Stroke> = StrokePlanner::new(bits, Point::new(0, 0)).collect();
        let fb = preview::simulate_strokes(w, h, Point::new(0, 0), &planned);
        (fb, format!("STROKES {} | {hint}", planned.len()))
    } else {
        (FrameBuffer::from_rgb(bits.as_rgb()), format!("INK {} | {hint}", bits.ink()))
    };
    let fb = preview::with_hud(fb, &hud);

    let mut window = PreviewWindow::new("pixel-painter preview", fb.width, fb.height)?;
    window.confirm(&fb)
}
