//! Scalar reference kernel.

use crate::image::OwnedImage;
use crate::kernel::{Kernel, SearchImage};
use crate::template::TemplatePlan;
use crate::util::ScreenMatchResult;

/// Single-threaded NCC kernel.
pub struct NccScalar;

impl Kernel for NccScalar {
    fn surface(image: &SearchImage, plan: &TemplatePlan) -> ScreenMatchResult<OwnedImage<f32>> {
        let (out_w, out_h) = image.surface_size(plan)?;
        let mut data = Vec::with_capacity(out_w * out_h);
        for y in 0..out_h {
            for x in 0..out_w {
                data.push(Self::score_at(image, plan, x, y));
            }
        }
        OwnedImage::new(data, out_w, out_h)
    }
}
