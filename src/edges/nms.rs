//! Non‑maximum suppression on gradient magnitude with direction alignment.
//!
//! For each pixel the gradient direction is quantized to one of four axes
//! (0°, 45°, 90°, 135°) and the magnitude is compared against the two
//! neighbours along that axis. A pixel survives when it is not smaller than
//! the neighbour behind it and strictly greater than the one ahead, which
//! keeps exactly one pixel of a two-pixel plateau.
//!
//! The outermost 1‑pixel frame is always suppressed.

use crate::edges::grad::Grad;
use crate::image::OwnedImage;

const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Returns a thinned magnitude image: surviving pixels keep their magnitude,
/// everything else is zero.
pub fn suppress_non_maxima(grad: &Grad) -> OwnedImage<f32> {
    let w = grad.mag.width();
    let h = grad.mag.height();
    let mut out = grad.mag.clone();
    for v in out.row_mut(0) {
        *v = 0.0;
    }
    if h == 1 {
        return out;
    }
    for v in out.row_mut(h - 1) {
        *v = 0.0;
    }
    for y in 0..h {
        out.set(0, y, 0.0);
        out.set(w - 1, y, 0.0);
    }
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let out_row = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= 0.0 {
                out_row[x] = 0.0;
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            // (behind, ahead) along the gradient; y grows downwards.
            let (behind, ahead) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_next[x - 1], mag_prev[x + 1])
            };

            if mag < behind || mag <= ahead {
                out_row[x] = 0.0;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::suppress_non_maxima;
    use crate::edges::grad::sobel_gradients;
    use crate::image::OwnedImage;

    #[test]
    fn step_edge_thins_to_single_column() {
        let mut img = OwnedImage::filled(8, 6, 0.0f32).unwrap();
        for y in 0..6 {
            for x in 4..8 {
                img.set(x, y, 1.0);
            }
        }
        let thin = suppress_non_maxima(&sobel_gradients(&img));
        for y in 1..5 {
            let kept: Vec<usize> = (0..8).filter(|&x| thin.get(x, y) > 0.0).collect();
            assert_eq!(kept, vec![4], "row {y}");
        }
        assert!(thin.row(0).iter().all(|&v| v == 0.0));
        assert!(thin.row(5).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn tiny_images_are_fully_suppressed() {
        let img = OwnedImage::new(vec![0.0f32, 1.0, 0.0, 1.0], 2, 2).unwrap();
        let thin = suppress_non_maxima(&sobel_gradients(&img));
        assert!(thin.data().iter().all(|&v| v == 0.0));
    }
}
