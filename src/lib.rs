//! Paints a picture into another application by simulating mouse strokes.
//!
//! source image → resize → grayscale → Floyd–Steinberg dither → row runs →
//! guarded press/drag/release strokes.

pub mod config;
pub mod dither;
pub mod error;
pub mod executor;
pub mod gray;
pub mod guard;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod platform;
pub mod preview;
pub mod source;
pub mod types;

pub use error::{Error, Result};
