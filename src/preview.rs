// Preview window + software drawing utilities.
// What it shows:
// 1) The dithered bitmap exactly as it will be painted, or
// 2) A simulation of the planned strokes drawn as 1-pixel lines.
// A HUD line under the picture carries counts and key hints.

use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::error::{Error, Result};
use crate::types::{FrameBuffer, Point, Stroke};

const PAPER: u32 = 0x00_FF_FF_FF;
const INK: u32 = 0x00_00_00_00;
const HUD_BG: u32 = 0x00_30_30_30;
const HUD_FG: u32 = 0x00_FF_FF_FF;
const HUD_ROWS: usize = 11;

pub struct PreviewWindow {
    window: Window,
}

impl PreviewWindow {
    /// Open a window sized for `fb`, enlarged when the picture is small.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let opts = WindowOptions { scale: pick_scale(width, height), ..WindowOptions::default() };
        let mut window =
            Window::new(title, width, height, opts).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(30);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Show `fb` until the user decides: Enter = true, Esc or close = false.
    pub fn confirm(&mut self, fb: &FrameBuffer) -> Result<bool> {
        while self.window.is_open() {
            if self.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
                return Ok(false);
            }
            if self.window.is_key_pressed(Key::Enter, KeyRepeat::No) {
                return Ok(true);
            }
            self.present(fb)?;
        }
        Ok(false)
    }
}

fn pick_scale(width: usize, height: usize) -> Scale {
    match width.max(height) {
        0..=100 => Scale::X8,
        101..=200 => Scale::X4,
        201..=400 => Scale::X2,
        _ => Scale::X1,
    }
}

/// Append the HUD line below the picture.
pub fn with_hud(fb: FrameBuffer, text: &str) -> FrameBuffer {
    let top = fb.height as i32 + 2;
    let mut fb = fb.with_footer(HUD_ROWS, HUD_BG);
    draw_text_5x7(&mut fb, 2, top, text, HUD_FG);
    fb
}

/// Paint `strokes` as lines on blank paper; `origin` maps to pixel (0, 0).
/// Visual: what the target canvas should look like once the pass completes.
pub fn simulate_strokes(width: usize, height: usize, origin: Point, strokes: &[Stroke]) -> FrameBuffer {
    let mut fb = FrameBuffer::filled(width, height, PAPER);
    for s in strokes {
        draw_line(
            &mut fb,
            s.start.x - origin.x,
            s.start.y - origin.y,
            s.end.x - origin.x,
            s.end.y - origin.y,
            INK,
        );
    }
    fb
}

/* ---------- Software drawing: pixels, lines, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/* ---------- 5x7 bitmap font (HUD subset: "STROKES 12 | ENTER DRAW | ESC CANCEL") ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),

        ' ' => g!(0,0,0,0,0,0,0),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 1 pixel apart. Unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
