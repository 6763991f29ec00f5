// Perceptual grayscale: l = round(0.3 R + 0.59 G + 0.11 B).
// Integer weights in hundredths keep the result exact, so gray stays gray.

use image::Rgb;

use crate::types::RasterImage;

const WR: u32 = 30;
const WG: u32 = 59;
const WB: u32 = 11;

/// Weighted luminance scaled by 100 (0..=25500), unrounded.
#[inline]
pub fn luma_x100(p: Rgb<u8>) -> u32 {
    WR * p[0] as u32 + WG * p[1] as u32 + WB * p[2] as u32
}

/// Rounded luminance of one pixel in [0, 255].
#[inline]
pub fn luminance(p: Rgb<u8>) -> u8 {
    // weights sum to 100, so the rounded value never exceeds 255
    ((luma_x100(p) + 50) / 100).min(255) as u8
}

/// New image of the same size with R = G = B = luminance.
pub fn to_grayscale(src: &RasterImage) -> RasterImage {
    let mut out = RasterImage::new(src.width(), src.height());
    for (dst, p) in out.pixels_mut().zip(src.pixels()) {
        let l = luminance(*p);
        *dst = Rgb([l, l, l]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn weights_match_reference_values() {
        assert_eq!(luminance(Rgb([255, 0, 0])), 77); // 76.5 rounds up
        assert_eq!(luminance(Rgb([0, 255, 0])), 150); // 150.45
        assert_eq!(luminance(Rgb([0, 0, 255])), 28); // 28.05
        assert_eq!(luminance(Rgb([255, 255, 255])), 255);
        assert_eq!(luminance(Rgb([0, 0, 0])), 0);
    }

    #[test]
    fn keeps_dimensions() {
        let src = RasterImage::new(7, 3);
        let out = to_grayscale(&src);
        assert_eq!(out.dimensions(), (7, 3));
    }

    fn raster() -> impl Strategy<Value = RasterImage> {
        (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |raw| RasterImage::from_raw(w, h, raw).unwrap())
        })
    }

    proptest! {
        #[test]
        fn channels_equal_weighted_luminance(src in raster()) {
            let out = to_grayscale(&src);
            for (p, q) in src.pixels().zip(out.pixels()) {
                let expected = (0.3 * p[0] as f64 + 0.59 * p[1] as f64 + 0.11 * p[2] as f64)
                    .round()
                    .clamp(0.0, 255.0) as i32;
                prop_assert_eq!(q[0], q[1]);
                prop_assert_eq!(q[1], q[2]);
                // float rounding of exact .5 cases may land either side
                prop_assert!((q[0] as i32 - expected).abs() <= 1);
            }
        }

        #[test]
        fn grayscale_is_idempotent(src in raster()) {
            let once = to_grayscale(&src);
            let twice = to_grayscale(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
