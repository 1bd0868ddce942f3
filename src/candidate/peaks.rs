//! Peak extraction from correlation surfaces.

use crate::image::OwnedImage;
use std::cmp::Ordering;

/// Peak candidate on a correlation surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the peak.
    pub x: usize,
    /// Y coordinate (row) of the peak.
    pub y: usize,
    /// Surface value at the peak.
    pub score: f32,
}

fn peak_cmp_desc(a: &Peak, b: &Peak) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts peaks by descending score with raster-order tie-breaking.
pub(crate) fn sort_peaks_desc(peaks: &mut [Peak]) {
    peaks.sort_by(peak_cmp_desc);
}

/// Returns the global maximum, the first one in raster order on ties.
///
/// NaN values are never selected.
pub fn global_max(surface: &OwnedImage<f32>) -> Option<Peak> {
    let mut best: Option<Peak> = None;
    for y in 0..surface.height() {
        for (x, &score) in surface.row(y).iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(Peak { x, y, score });
            }
        }
    }
    best
}

/// Returns every local maximum strictly above `threshold`, best first.
///
/// Pixels of equal value that touch (8-connected) form one plateau. A
/// plateau is a maximum when no pixel bordering it is larger, and it is
/// reported once, at its first pixel in raster order.
pub fn local_maxima(surface: &OwnedImage<f32>, threshold: f32) -> Vec<Peak> {
    let w = surface.width();
    let h = surface.height();
    let mut seen = vec![false; w * h];
    let mut stack = Vec::new();
    let mut peaks = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let score = surface.get(x, y);
            if seen[y * w + x] || !(score > threshold) {
                continue;
            }
            seen[y * w + x] = true;
            stack.push((x, y));
            let mut is_peak = true;
            while let Some((cx, cy)) = stack.pop() {
                for ny in cy.saturating_sub(1)..=(cy + 1).min(h - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(w - 1) {
                        let other = surface.get(nx, ny);
                        if other > score {
                            is_peak = false;
                        } else if other == score && !seen[ny * w + nx] {
                            seen[ny * w + nx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
            if is_peak {
                peaks.push(Peak { x, y, score });
            }
        }
    }

    sort_peaks_desc(&mut peaks);
    peaks
}

#[cfg(test)]
mod tests {
    use super::{global_max, local_maxima, Peak};
    use crate::image::OwnedImage;

    #[test]
    fn global_max_prefers_first_on_ties() {
        let surface = OwnedImage::new(vec![0.1f32, 0.9, 0.3, 0.9], 2, 2).unwrap();
        assert_eq!(
            global_max(&surface),
            Some(Peak {
                x: 1,
                y: 0,
                score: 0.9
            })
        );
    }

    #[test]
    fn local_maxima_are_sorted_and_thresholded() {
        let surface = OwnedImage::new(
            vec![
                0.9, 0.1, 0.0, 0.0, 0.0, //
                0.1, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.5, 0.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.95, 0.0, 0.0, 0.2, //
            ],
            5,
            5,
        )
        .unwrap();
        let peaks = local_maxima(&surface, 0.3);
        let coords: Vec<(usize, usize)> = peaks.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(1, 4), (0, 0), (3, 2)]);
        assert!(local_maxima(&surface, 0.95).is_empty());
    }

    #[test]
    fn plateau_yields_single_peak() {
        let surface = OwnedImage::new(
            vec![
                0.0, 0.0, 0.0, 0.0, //
                0.0, 0.8, 0.8, 0.0, //
                0.0, 0.8, 0.8, 0.0, //
            ],
            4,
            3,
        )
        .unwrap();
        let peaks = local_maxima(&surface, 0.5);
        assert_eq!(peaks.len(), 1);
        assert_eq!((peaks[0].x, peaks[0].y), (1, 1));
    }

    #[test]
    fn plateau_joined_through_a_lower_row_is_one_peak() {
        let surface = OwnedImage::new(
            vec![
                0.8, 0.0, 0.8, //
                0.0, 0.8, 0.0, //
                0.0, 0.0, 0.0, //
            ],
            3,
            3,
        )
        .unwrap();
        let peaks = local_maxima(&surface, 0.5);
        assert_eq!(
            peaks,
            vec![Peak {
                x: 0,
                y: 0,
                score: 0.8
            }]
        );
    }

    #[test]
    fn plateau_touching_a_higher_pixel_is_not_a_peak() {
        let surface = OwnedImage::new(
            vec![
                0.6, 0.6, 0.6, 0.0, //
                0.0, 0.0, 0.0, 0.9, //
            ],
            4,
            2,
        )
        .unwrap();
        let coords: Vec<(usize, usize)> = local_maxima(&surface, 0.5)
            .iter()
            .map(|p| (p.x, p.y))
            .collect();
        assert_eq!(coords, vec![(3, 1)]);
    }
}
