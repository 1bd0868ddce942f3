//! Normalized cross-correlation kernels.
//!
//! The haystack is preprocessed once into a [`SearchImage`]: summed-area
//! tables give every window's sum and sum of squares in O(1), and a
//! compressed row layout of the non-zero pixels lets the dot product skip
//! empty regions. Edge maps are mostly zero, so this is where the time goes.
//!
//! A placement whose window or needle has no variance scores 0.

use crate::image::OwnedImage;
use crate::template::TemplatePlan;
use crate::util::{ScreenMatchError, ScreenMatchResult};

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Denominators at or below this value produce a score of 0.
pub(crate) const MIN_DENOM: f64 = 1e-9;

/// Haystack prepared for repeated NCC evaluation.
pub struct SearchImage {
    width: usize,
    height: usize,
    /// `(width + 1) * (height + 1)` summed-area table of values.
    integral: Vec<f64>,
    /// Summed-area table of squared values.
    integral_sq: Vec<f64>,
    row_start: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f32>,
}

impl SearchImage {
    /// Preprocesses a float haystack.
    pub fn new(img: &OwnedImage<f32>) -> Self {
        let width = img.width();
        let height = img.height();
        let stride = width + 1;
        let mut integral = vec![0.0f64; stride * (height + 1)];
        let mut integral_sq = vec![0.0f64; stride * (height + 1)];
        let mut row_start = Vec::with_capacity(height + 1);
        let mut cols = Vec::new();
        let mut vals = Vec::new();

        for y in 0..height {
            row_start.push(cols.len());
            let mut run = 0.0f64;
            let mut run_sq = 0.0f64;
            for (x, &v) in img.row(y).iter().enumerate() {
                let v64 = f64::from(v);
                run += v64;
                run_sq += v64 * v64;
                let idx = (y + 1) * stride + x + 1;
                integral[idx] = integral[idx - stride] + run;
                integral_sq[idx] = integral_sq[idx - stride] + run_sq;
                if v != 0.0 {
                    cols.push(x);
                    vals.push(v);
                }
            }
        }
        row_start.push(cols.len());

        Self {
            width,
            height,
            integral,
            integral_sq,
            row_start,
            cols,
            vals,
        }
    }

    /// Returns the haystack width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the haystack height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(sum, sum of squares)` over the window at `(x, y)`.
    #[inline]
    pub(crate) fn window_sums(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let stride = self.width + 1;
        let a = y * stride + x;
        let b = y * stride + x + w;
        let c = (y + h) * stride + x;
        let d = (y + h) * stride + x + w;
        (
            self.integral[d] - self.integral[b] - self.integral[c] + self.integral[a],
            self.integral_sq[d] - self.integral_sq[b] - self.integral_sq[c]
                + self.integral_sq[a],
        )
    }

    /// Non-zero `(columns, values)` of row `y`.
    #[inline]
    pub(crate) fn nonzero_row(&self, y: usize) -> (&[usize], &[f32]) {
        let range = self.row_start[y]..self.row_start[y + 1];
        (&self.cols[range.clone()], &self.vals[range])
    }

    /// Returns the surface dimensions for a needle, or an error when it does
    /// not fit inside the haystack.
    pub fn surface_size(&self, plan: &TemplatePlan) -> ScreenMatchResult<(usize, usize)> {
        if plan.width() > self.width || plan.height() > self.height {
            return Err(ScreenMatchError::InvalidDimensions {
                width: plan.width(),
                height: plan.height(),
            });
        }
        Ok((
            self.width - plan.width() + 1,
            self.height - plan.height() + 1,
        ))
    }
}

/// Kernel trait for scoring and full-surface evaluation.
pub trait Kernel {
    /// Computes the NCC score at a single placement (top-left coordinates).
    ///
    /// The caller guarantees the needle fits at `(x, y)`.
    fn score_at(image: &SearchImage, plan: &TemplatePlan, x: usize, y: usize) -> f32 {
        score_at(image, plan, x, y)
    }

    /// Evaluates every valid placement and returns the correlation surface.
    fn surface(image: &SearchImage, plan: &TemplatePlan) -> ScreenMatchResult<OwnedImage<f32>>;
}

pub(crate) fn score_at(image: &SearchImage, plan: &TemplatePlan, x: usize, y: usize) -> f32 {
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    let var_t = plan.var_t();
    if var_t <= MIN_DENOM {
        return 0.0;
    }

    let (sum_i, sum_i2) = image.window_sums(x, y, tpl_width, tpl_height);
    let n = (tpl_width * tpl_height) as f64;
    let var_i = sum_i2 - (sum_i * sum_i) / n;
    let denom = (var_t * var_i.max(0.0)).sqrt();
    if denom <= MIN_DENOM {
        return 0.0;
    }

    let t_prime = plan.zero_mean();
    let end_x = x + tpl_width;
    let mut dot = 0.0f64;
    for ty in 0..tpl_height {
        let (cols, vals) = image.nonzero_row(y + ty);
        let start = cols.partition_point(|&c| c < x);
        let base = ty * tpl_width;
        for (&c, &v) in cols[start..].iter().zip(&vals[start..]) {
            if c >= end_x {
                break;
            }
            dot += t_prime[base + c - x] * f64::from(v);
        }
    }

    (dot / denom).clamp(-1.0, 1.0) as f32
}

#[cfg(not(feature = "rayon"))]
pub use scalar::NccScalar as NccDefault;

#[cfg(feature = "rayon")]
pub use self::rayon::NccRayon as NccDefault;
