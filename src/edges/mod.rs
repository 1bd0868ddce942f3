//! Canny-style edge detection used by the edge strategy.
//!
//! The pipeline is smoothing, Sobel gradients, non-maximum suppression and
//! hysteresis. Each stage is deterministic, so identical inputs and
//! parameters always yield identical edge maps.

use crate::image::OwnedImage;
use crate::trace::trace_span;
use crate::util::math::MAX_GAUSSIAN_RADIUS;
use crate::util::{ScreenMatchError, ScreenMatchResult};

pub mod grad;
pub mod hysteresis;
pub mod nms;
pub mod smooth;

/// Largest accepted `sigma`; its `4 * sigma` reach fills the widest kernel.
pub const MAX_SIGMA: f32 = (MAX_GAUSSIAN_RADIUS / 4) as f32;

/// Binary edge map stored as floats (1.0 edge, 0.0 background).
pub type EdgeMap = OwnedImage<f32>;

/// Parameters of the edge pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeParams {
    /// Standard deviation of the Gaussian pre-blur; 0 disables it.
    pub sigma: f32,
    /// Hysteresis lower bound on the gradient magnitude.
    pub low_threshold: f32,
    /// Hysteresis upper bound on the gradient magnitude.
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            low_threshold: 0.1,
            high_threshold: 0.3,
        }
    }
}

impl EdgeParams {
    /// Checks that all values are finite, non-negative, `low <= high` and
    /// `sigma <= MAX_SIGMA`.
    pub fn validate(&self) -> ScreenMatchResult<()> {
        let finite = self.sigma.is_finite()
            && self.low_threshold.is_finite()
            && self.high_threshold.is_finite();
        if !finite {
            return Err(ScreenMatchError::InvalidConfiguration {
                reason: "edge parameters must be finite".to_string(),
            });
        }
        if !(0.0..=MAX_SIGMA).contains(&self.sigma) {
            return Err(ScreenMatchError::InvalidConfiguration {
                reason: format!(
                    "edge_sigma must be in [0, {}], got {}",
                    MAX_SIGMA, self.sigma
                ),
            });
        }
        if self.low_threshold < 0.0 || self.low_threshold > self.high_threshold {
            return Err(ScreenMatchError::InvalidConfiguration {
                reason: format!(
                    "edge thresholds must satisfy 0 <= low <= high, got low={} high={}",
                    self.low_threshold, self.high_threshold
                ),
            });
        }
        Ok(())
    }
}

/// Runs the full edge pipeline on a luma image in `[0, 1]`.
pub fn detect_edges(luma: &OwnedImage<f32>, params: &EdgeParams) -> EdgeMap {
    let _span = trace_span!(
        "detect_edges",
        width = luma.width(),
        height = luma.height(),
        sigma = params.sigma
    )
    .entered();

    let smoothed = smooth::gaussian_blur(luma, params.sigma);
    let grad = grad::sobel_gradients(&smoothed);
    let thin = nms::suppress_non_maxima(&grad);
    hysteresis::hysteresis(&thin, params.low_threshold, params.high_threshold)
}

#[cfg(test)]
mod tests {
    use super::{detect_edges, EdgeParams, MAX_SIGMA};
    use crate::image::OwnedImage;
    use crate::ScreenMatchError;

    fn square(size: usize, x0: usize, y0: usize, side: usize) -> OwnedImage<f32> {
        let mut img = OwnedImage::filled(size, size, 0.0f32).unwrap();
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                img.set(x, y, 1.0);
            }
        }
        img
    }

    #[test]
    fn square_outline_is_detected() {
        let img = square(32, 8, 8, 16);
        let edges = detect_edges(&img, &EdgeParams::default());
        let count = edges.data().iter().filter(|&&v| v == 1.0).count();
        assert!(count > 40, "expected an outline, got {count} edge pixels");
        assert_eq!(edges.get(16, 16), 0.0);
        assert_eq!(edges.get(1, 1), 0.0);
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = OwnedImage::filled(16, 16, 0.7f32).unwrap();
        let edges = detect_edges(&img, &EdgeParams::default());
        assert!(edges.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let params = EdgeParams {
            sigma: 1.0,
            low_threshold: 0.5,
            high_threshold: 0.2,
        };
        assert!(matches!(
            params.validate(),
            Err(ScreenMatchError::InvalidConfiguration { .. })
        ));
        assert!(EdgeParams::default().validate().is_ok());
        let negative = EdgeParams {
            sigma: -1.0,
            ..EdgeParams::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn validate_bounds_sigma() {
        let widest = EdgeParams {
            sigma: MAX_SIGMA,
            ..EdgeParams::default()
        };
        assert!(widest.validate().is_ok());
        for sigma in [MAX_SIGMA + 1.0, 1e30, f32::INFINITY, f32::NAN] {
            let params = EdgeParams {
                sigma,
                ..EdgeParams::default()
            };
            assert!(matches!(
                params.validate(),
                Err(ScreenMatchError::InvalidConfiguration { .. })
            ));
        }
    }
}
