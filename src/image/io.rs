//! Conversions between `image` crate buffers and screenmatch images.
//!
//! Exact matching works on RGB triples (alpha dropped), edge matching on luma
//! scaled to `[0, 1]` with ITU-R 709 weights.

use crate::image::OwnedImage;
use crate::util::{ScreenMatchError, ScreenMatchResult};
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;

const LUMA_R: f32 = 0.2125;
const LUMA_G: f32 = 0.7154;
const LUMA_B: f32 = 0.0721;

/// Opens and decodes a raster file.
pub fn open_image<P: AsRef<Path>>(path: P) -> ScreenMatchResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|err| ScreenMatchError::ImageIo {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Converts a decoded image to an owned RGB buffer at native resolution.
pub fn rgb_from_dynamic(img: &DynamicImage) -> ScreenMatchResult<OwnedImage<[u8; 3]>> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    let pixels = rgb.pixels().map(|p| p.0).collect();
    OwnedImage::new(pixels, width, height)
}

/// Converts a decoded image to luma in `[0, 1]`.
pub fn luma_from_dynamic(img: &DynamicImage) -> ScreenMatchResult<OwnedImage<f32>> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    let pixels = rgb
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (LUMA_R * f32::from(r) + LUMA_G * f32::from(g) + LUMA_B * f32::from(b)) / 255.0
        })
        .collect();
    OwnedImage::new(pixels, width, height)
}

/// Loads a raster file as RGB.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> ScreenMatchResult<OwnedImage<[u8; 3]>> {
    rgb_from_dynamic(&open_image(path)?)
}

/// Loads a raster file as luma in `[0, 1]`.
pub fn load_luma<P: AsRef<Path>>(path: P) -> ScreenMatchResult<OwnedImage<f32>> {
    luma_from_dynamic(&open_image(path)?)
}

/// Renders a float image as 8-bit grayscale, mapping `[lo, hi]` to `[0, 255]`.
///
/// Used to dump edge maps (`[0, 1]`) and correlation surfaces (`[-1, 1]`)
/// for inspection.
pub fn to_gray_image(img: &OwnedImage<f32>, lo: f32, hi: f32) -> GrayImage {
    let span = if hi > lo { hi - lo } else { 1.0 };
    GrayImage::from_fn(img.width() as u32, img.height() as u32, |x, y| {
        let v = (img.get(x as usize, y as usize) - lo) / span;
        Luma([(v.clamp(0.0, 1.0) * 255.0).round() as u8])
    })
}
