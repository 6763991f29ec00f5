// Loads the picture to paint and scales it to the target footprint.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbaImage};

use crate::error::{Error, Result};
use crate::types::RasterImage;

/// Open `path` and flatten any transparency onto white paper.
pub fn load(path: &Path) -> Result<RasterImage> {
    let img = image::open(path).map_err(|source| Error::ImageLoad { path: path.to_path_buf(), source })?;
    let img = match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => flatten_on_white(&other.to_rgba8()),
    };
    ensure_not_empty(&img)?;
    tracing::info!(path = %path.display(), width = img.width(), height = img.height(), "loaded source image");
    Ok(img)
}

/// Alpha-composite over white: transparent areas stay blank instead of turning into ink.
pub fn flatten_on_white(src: &RgbaImage) -> RasterImage {
    RasterImage::from_fn(src.width(), src.height(), |x, y| {
        let p = src.get_pixel(x, y);
        let a = p[3] as u32;
        let mix = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([mix(p[0]), mix(p[1]), mix(p[2])])
    })
}

pub fn ensure_not_empty(img: &RasterImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::Config(format!("image is empty ({}x{})", img.width(), img.height())));
    }
    Ok(())
}

/// Bicubic resample to exactly `width` x `height`.
pub fn fit(img: &RasterImage, width: u32, height: u32) -> Result<RasterImage> {
    ensure_not_empty(img)?;
    if width == 0 || height == 0 {
        return Err(Error::Config(format!("target size {width}x{height} is empty")));
    }
    if img.dimensions() == (width, height) {
        return Ok(img.clone());
    }
    Ok(imageops::resize(img, width, height, FilterType::CatmullRom))
}
