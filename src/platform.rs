//! Input/display platform boundary.
//!
//! The pipeline only talks to [`InputPlatform`]. [`DesktopPlatform`] drives
//! the real pointer; [`RecordingPlatform`] keeps everything in memory for
//! dry runs.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use image::RgbImage;
use thiserror::Error;

use crate::types::{Point, Region};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("not supported on this platform: {0}")]
    Unsupported(&'static str),
    #[error("input backend init failed: {0}")]
    Init(String),
    #[error("input injection failed: {0}")]
    Injection(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// What the painter needs from the OS.
pub trait InputPlatform {
    fn set_pointer(&mut self, to: Point) -> PlatformResult<()>;
    fn press(&mut self) -> PlatformResult<()>;
    fn release(&mut self) -> PlatformResult<()>;
    fn pointer(&self) -> PlatformResult<Point>;
    /// Process id owning the currently focused window.
    fn foreground_owner(&self) -> PlatformResult<u32>;
    fn capture_region(&self, region: Region) -> PlatformResult<RgbImage>;
}

// ------------------------------- desktop -------------------------------------

/// Real pointer via enigo, focus lookup via Win32, capture via screenshots.
pub struct DesktopPlatform {
    enigo: Enigo,
}

impl DesktopPlatform {
    pub fn new() -> PlatformResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| PlatformError::Init(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl InputPlatform for DesktopPlatform {
    fn set_pointer(&mut self, to: Point) -> PlatformResult<()> {
        self.enigo
            .move_mouse(to.x, to.y, Coordinate::Abs)
            .map_err(|e| PlatformError::Injection(e.to_string()))
    }

    fn press(&mut self) -> PlatformResult<()> {
        self.enigo
            .button(Button::Left, Direction::Press)
            .map_err(|e| PlatformError::Injection(e.to_string()))
    }

    fn release(&mut self) -> PlatformResult<()> {
        self.enigo
            .button(Button::Left, Direction::Release)
            .map_err(|e| PlatformError::Injection(e.to_string()))
    }

    fn pointer(&self) -> PlatformResult<Point> {
        let (x, y) = self.enigo.location().map_err(|e| PlatformError::Query(e.to_string()))?;
        Ok(Point::new(x, y))
    }

    fn foreground_owner(&self) -> PlatformResult<u32> {
        foreground_owner()
    }

    fn capture_region(&self, region: Region) -> PlatformResult<RgbImage> {
        use screenshots::Screen;

        let Region { origin, width, height } = region;
        let screen = Screen::from_point(origin.x, origin.y)
            .map_err(|e| PlatformError::Capture(e.to_string()))?;
        let shot = screen
            .capture_area(
                origin.x - screen.display_info.x,
                origin.y - screen.display_info.y,
                width,
                height,
            )
            .map_err(|e| PlatformError::Capture(e.to_string()))?;

        // screenshots hands back RGBA; drop alpha
        let (w, h) = (shot.width(), shot.height());
        let rgba = shot.into_raw();
        let rgb: Vec<u8> = rgba.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect();
        RgbImage::from_raw(w, h, rgb)
            .ok_or_else(|| PlatformError::Capture("capture buffer has the wrong size".into()))
    }
}

#[cfg(target_os = "windows")]
fn foreground_owner() -> PlatformResult<u32> {
    use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowThreadProcessId};

    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.is_invalid() {
            return Err(PlatformError::Query("no foreground window".into()));
        }
        let mut pid: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
        Ok(pid)
    }
}

#[cfg(not(target_os = "windows"))]
fn foreground_owner() -> PlatformResult<u32> {
    Err(PlatformError::Unsupported("foreground window owner lookup"))
}

// ------------------------------- recording -----------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move(Point),
    Press,
    Release,
}

/// In-memory platform: the pointer goes where it is told, focus never changes.
#[derive(Debug, Clone)]
pub struct RecordingPlatform {
    pointer: Point,
    owner: u32,
    events: Vec<InputEvent>,
}

impl RecordingPlatform {
    pub fn new(owner: u32) -> Self {
        Self { pointer: Point::new(0, 0), owner, events: Vec::new() }
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Press-to-release segments, in order.
    pub fn drags(&self) -> Vec<(Point, Point)> {
        let mut out = Vec::new();
        let mut down_at = None;
        let mut at = self.pointer;
        for ev in &self.events {
            match *ev {
                InputEvent::Move(p) => at = p,
                InputEvent::Press => down_at = Some(at),
                InputEvent::Release => {
                    if let Some(start) = down_at.take() {
                        out.push((start, at));
                    }
                }
            }
        }
        out
    }
}

impl InputPlatform for RecordingPlatform {
    fn set_pointer(&mut self, to: Point) -> PlatformResult<()> {
        self.pointer = to;
        self.events.push(InputEvent::Move(to));
        Ok(())
    }

    fn press(&mut self) -> PlatformResult<()> {
        self.events.push(InputEvent::Press);
        Ok(())
    }

    fn release(&mut self) -> PlatformResult<()> {
        self.events.push(InputEvent::Release);
        Ok(())
    }

    fn pointer(&self) -> PlatformResult<Point> {
        Ok(self.pointer)
    }

    fn foreground_owner(&self) -> PlatformResult<u32> {
        Ok(self.owner)
    }

    fn capture_region(&self, region: Region) -> PlatformResult<RgbImage> {
        Ok(RgbImage::from_pixel(region.width, region.height, image::Rgb([255, 255, 255])))
    }
}
