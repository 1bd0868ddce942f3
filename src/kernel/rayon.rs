//! Rayon-parallel kernel (feature-gated).
//!
//! Rows of the surface are scored independently, so the output is
//! bit-identical to the scalar kernel.

use crate::image::OwnedImage;
use crate::kernel::{Kernel, SearchImage};
use crate::template::TemplatePlan;
use crate::util::ScreenMatchResult;
use rayon::prelude::*;

/// Row-parallel NCC kernel.
pub struct NccRayon;

impl Kernel for NccRayon {
    fn surface(image: &SearchImage, plan: &TemplatePlan) -> ScreenMatchResult<OwnedImage<f32>> {
        let (out_w, out_h) = image.surface_size(plan)?;
        let rows: Vec<Vec<f32>> = (0..out_h)
            .into_par_iter()
            .map(|y| {
                (0..out_w)
                    .map(|x| Self::score_at(image, plan, x, y))
                    .collect()
            })
            .collect();
        OwnedImage::new(rows.concat(), out_w, out_h)
    }
}
