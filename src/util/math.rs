//! Numeric helpers shared by the edge pipeline.

/// Largest Gaussian radius in pixels; wider kernels are truncated here.
pub(crate) const MAX_GAUSSIAN_RADIUS: usize = 256;

/// Builds a normalized 1D Gaussian kernel truncated at `4 * sigma`.
///
/// Returns a single unit tap when `sigma` is zero or too small to spread.
/// The radius never exceeds [`MAX_GAUSSIAN_RADIUS`].
pub(crate) fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !(sigma > 0.0) {
        return vec![1.0];
    }
    let reach = (4.0 * f64::from(sigma)).ceil();
    let radius = if reach >= MAX_GAUSSIAN_RADIUS as f64 {
        MAX_GAUSSIAN_RADIUS
    } else {
        reach as usize
    };
    if radius == 0 {
        return vec![1.0];
    }

    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let mut taps = Vec::with_capacity(2 * radius + 1);
    let mut sum = 0.0f64;
    for i in 0..=2 * radius {
        let d = i as f64 - radius as f64;
        let w = (-(d * d) / denom).exp();
        sum += w;
        taps.push(w);
    }
    taps.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Returns the pixel center of a box using integer division.
pub(crate) fn box_center(x: usize, y: usize, width: usize, height: usize) -> (usize, usize) {
    (x + width / 2, y + height / 2)
}

#[cfg(test)]
mod tests {
    use super::{box_center, gaussian_kernel, MAX_GAUSSIAN_RADIUS};

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let taps = gaussian_kernel(2.0);
        assert_eq!(taps.len(), 17);
        let sum: f32 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..taps.len() / 2 {
            assert!((taps[i] - taps[taps.len() - 1 - i]).abs() < 1e-7);
        }
        assert!(taps[8] > taps[7]);
    }

    #[test]
    fn gaussian_kernel_degenerates_to_identity() {
        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel(-1.0), vec![1.0]);
        assert_eq!(gaussian_kernel(f32::NAN), vec![1.0]);
    }

    #[test]
    fn huge_sigma_is_truncated_to_max_radius() {
        for sigma in [1e30f32, f32::INFINITY, 1000.0] {
            let taps = gaussian_kernel(sigma);
            assert_eq!(taps.len(), 2 * MAX_GAUSSIAN_RADIUS + 1);
            let sum: f32 = taps.iter().sum();
            assert!((sum - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn box_center_uses_integer_halves() {
        assert_eq!(box_center(10, 20, 5, 4), (12, 22));
        assert_eq!(box_center(0, 0, 1, 1), (0, 0));
    }
}
