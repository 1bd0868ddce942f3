//! Separable Gaussian smoothing with clamped borders.

use crate::image::OwnedImage;
use crate::util::math::gaussian_kernel;

/// Blurs `src` with a Gaussian of standard deviation `sigma`.
///
/// The kernel is truncated at `4 * sigma`; samples outside the image are
/// clamped to the nearest edge pixel. A non-positive `sigma` returns a copy.
pub fn gaussian_blur(src: &OwnedImage<f32>, sigma: f32) -> OwnedImage<f32> {
    let taps = gaussian_kernel(sigma);
    if taps.len() == 1 {
        return src.clone();
    }
    let radius = taps.len() / 2;
    let w = src.width();
    let h = src.height();

    let mut tmp = src.clone();
    for y in 0..h {
        let row = src.row(y);
        let out = tmp.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = (x + k).saturating_sub(radius).min(w - 1);
                acc += row[sx] * tap;
            }
            *dst = acc;
        }
    }

    let mut out = tmp.clone();
    for y in 0..h {
        let dst = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = (y + k).saturating_sub(radius).min(h - 1);
            let src_row = tmp.row(sy);
            if k == 0 {
                for (d, &s) in dst.iter_mut().zip(src_row) {
                    *d = s * tap;
                }
            } else {
                for (d, &s) in dst.iter_mut().zip(src_row) {
                    *d += s * tap;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::gaussian_blur;
    use crate::image::OwnedImage;

    #[test]
    fn blur_preserves_constant_images() {
        let img = OwnedImage::filled(9, 7, 0.4f32).unwrap();
        let out = gaussian_blur(&img, 1.5);
        assert!(out.data().iter().all(|&v| (v - 0.4).abs() < 1e-5));
    }

    #[test]
    fn blur_spreads_an_impulse_symmetrically() {
        let mut img = OwnedImage::filled(11, 11, 0.0f32).unwrap();
        img.set(5, 5, 1.0);
        let out = gaussian_blur(&img, 1.0);
        assert!(out.get(5, 5) < 1.0);
        assert!(out.get(4, 5) > 0.0);
        assert!((out.get(4, 5) - out.get(6, 5)).abs() < 1e-6);
        assert!((out.get(5, 4) - out.get(5, 6)).abs() < 1e-6);
        let total: f32 = out.data().iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let img = OwnedImage::new(vec![0.1f32, 0.9, 0.3, 0.7], 2, 2).unwrap();
        assert_eq!(gaussian_blur(&img, 0.0), img);
    }
}
