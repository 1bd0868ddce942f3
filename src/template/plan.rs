//! Template plan precomputation for NCC.

use crate::image::OwnedImage;

/// Precomputed statistics and zero-mean buffer for a needle.
///
/// A constant needle is accepted; its `var_t` is zero and every placement
/// scores 0.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    var_t: f64,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a float needle image.
    pub fn from_image(tpl: &OwnedImage<f32>) -> Self {
        let width = tpl.width();
        let height = tpl.height();
        let count = (width * height) as f64;

        let sum: f64 = tpl.data().iter().map(|&v| f64::from(v)).sum();
        let mean = sum / count;
        let zero_mean: Vec<f64> = tpl.data().iter().map(|&v| f64::from(v) - mean).collect();
        let var_t = zero_mean.iter().map(|v| v * v).sum();

        Self {
            width,
            height,
            mean,
            var_t,
            zero_mean,
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}
