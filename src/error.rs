// One error type for the whole painter.
// Every variant states *where* things went wrong.
// A guard abort is not an error; it ends a draw pass normally (see pipeline::DrawReport).
use std::path::PathBuf;

use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum Error {
    /// Nothing was started: missing/empty image, zero-sized region, bad option.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Platform setup failed, or a call failed while failures are not ignored.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
