//! Double-threshold hysteresis over a thinned magnitude image.

use crate::image::OwnedImage;

/// Keeps strong pixels (`>= high`) and weak pixels (`>= low`) that are
/// 8-connected to a strong one, directly or through other weak pixels.
///
/// Returns an edge map with 1.0 on kept pixels and 0.0 elsewhere. Zero
/// magnitudes never count as edges, even with `low == 0`.
pub fn hysteresis(thin: &OwnedImage<f32>, low: f32, high: f32) -> OwnedImage<f32> {
    let w = thin.width();
    let h = thin.height();
    let is_weak = |v: f32| v > 0.0 && v >= low;

    let mut out = thin.clone();
    for y in 0..h {
        out.row_mut(y).fill(0.0);
    }

    let mut stack = Vec::new();
    for y in 0..h {
        for (x, &v) in thin.row(y).iter().enumerate() {
            if is_weak(v) && v >= high && out.get(x, y) == 0.0 {
                out.set(x, y, 1.0);
                stack.push((x, y));
                while let Some((cx, cy)) = stack.pop() {
                    let y0 = cy.saturating_sub(1);
                    let y1 = (cy + 1).min(h - 1);
                    let x0 = cx.saturating_sub(1);
                    let x1 = (cx + 1).min(w - 1);
                    for ny in y0..=y1 {
                        for nx in x0..=x1 {
                            if out.get(nx, ny) == 0.0 && is_weak(thin.get(nx, ny)) {
                                out.set(nx, ny, 1.0);
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
            }
        }
    }
    out
}
