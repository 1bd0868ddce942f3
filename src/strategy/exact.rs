//! Pixel-exact template search on RGB images.
//!
//! Without the `tolerant` feature every needle pixel must match. With it, a
//! confidence below 1.0 becomes the minimum fraction of needle pixels that
//! must be identical at a placement. Placements are visited in raster
//! order; `Single` mode stops at the first hit.

use crate::candidate::overlap::keep_disjoint;
use crate::image::io::{load_rgb, rgb_from_dynamic};
use crate::image::OwnedImage;
use crate::strategy::{Found, MatchMode};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::types::MatchBox;
use crate::util::ScreenMatchResult;
use image::DynamicImage;
use std::path::Path;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// RGB pixel.
pub type Rgb = [u8; 3];

/// Exact (optionally tolerant) pixel search.
#[derive(Clone, Debug)]
pub struct ExactStrategy {
    confidence: Option<f32>,
}

impl ExactStrategy {
    pub fn new(confidence: Option<f32>) -> Self {
        Self { confidence }
    }

    /// Loads the needle and searches the haystack at native resolution.
    pub fn try_locate(
        &self,
        needle: &Path,
        haystack: &DynamicImage,
        mode: MatchMode,
    ) -> ScreenMatchResult<Found> {
        let needle = load_rgb(needle)?;
        let haystack = rgb_from_dynamic(haystack)?;
        Ok(self.search(&needle, &haystack, mode))
    }

    /// Searches already decoded images.
    pub fn search(
        &self,
        needle: &OwnedImage<Rgb>,
        haystack: &OwnedImage<Rgb>,
        mode: MatchMode,
    ) -> Found {
        let _span = trace_span!(
            "exact_search",
            needle_w = needle.width(),
            needle_h = needle.height()
        )
        .entered();

        if needle.width() > haystack.width() || needle.height() > haystack.height() {
            return Found::from_boxes(mode, Vec::new());
        }

        let budget = self.mismatch_budget(needle.width() * needle.height());
        let boxes = match mode {
            MatchMode::Single => first_match(needle, haystack, budget).into_iter().collect(),
            MatchMode::All => keep_disjoint(all_matches(needle, haystack, budget)),
        };
        trace_event!("exact_matches", count = boxes.len());
        Found::from_boxes(mode, boxes)
    }

    /// Number of differing needle pixels a placement may have.
    fn mismatch_budget(&self, pixels: usize) -> usize {
        let confidence = match self.confidence {
            Some(c) if c < 1.0 => c,
            _ => return 0,
        };
        if cfg!(feature = "tolerant") {
            ((1.0 - f64::from(confidence)) * pixels as f64).floor() as usize
        } else {
            trace_warn!(
                "confidence {} ignored: the tolerant matching backend is not available, \
                 requiring an exact match",
                confidence
            );
            0
        }
    }
}

/// Scores the placement at `(x, y)`, or `None` when more than `budget`
/// pixels differ.
fn match_at(
    needle: &OwnedImage<Rgb>,
    haystack: &OwnedImage<Rgb>,
    x: usize,
    y: usize,
    budget: usize,
) -> Option<MatchBox> {
    let w = needle.width();
    let h = needle.height();
    let mut mismatches = 0usize;
    for ty in 0..h {
        let hay_row = &haystack.row(y + ty)[x..x + w];
        let tpl_row = needle.row(ty);
        if budget == 0 {
            if hay_row != tpl_row {
                return None;
            }
            continue;
        }
        mismatches += hay_row.iter().zip(tpl_row).filter(|(a, b)| a != b).count();
        if mismatches > budget {
            return None;
        }
    }
    let total = (w * h) as f32;
    Some(MatchBox {
        x,
        y,
        width: w,
        height: h,
        score: 1.0 - mismatches as f32 / total,
    })
}

fn row_matches<'a>(
    needle: &'a OwnedImage<Rgb>,
    haystack: &'a OwnedImage<Rgb>,
    y: usize,
    budget: usize,
) -> impl Iterator<Item = MatchBox> + 'a {
    let max_x = haystack.width() - needle.width();
    let first = needle.get(0, 0);
    (0..=max_x).filter_map(move |x| {
        if budget == 0 && haystack.get(x, y) != first {
            return None;
        }
        match_at(needle, haystack, x, y, budget)
    })
}

#[cfg(not(feature = "rayon"))]
fn first_match(
    needle: &OwnedImage<Rgb>,
    haystack: &OwnedImage<Rgb>,
    budget: usize,
) -> Option<MatchBox> {
    let max_y = haystack.height() - needle.height();
    (0..=max_y).find_map(|y| row_matches(needle, haystack, y, budget).next())
}

#[cfg(feature = "rayon")]
fn first_match(
    needle: &OwnedImage<Rgb>,
    haystack: &OwnedImage<Rgb>,
    budget: usize,
) -> Option<MatchBox> {
    let max_y = haystack.height() - needle.height();
    (0..=max_y)
        .into_par_iter()
        .find_map_first(|y| row_matches(needle, haystack, y, budget).next())
}

#[cfg(not(feature = "rayon"))]
fn all_matches(
    needle: &OwnedImage<Rgb>,
    haystack: &OwnedImage<Rgb>,
    budget: usize,
) -> Vec<MatchBox> {
    let max_y = haystack.height() - needle.height();
    (0..=max_y)
        .flat_map(|y| row_matches(needle, haystack, y, budget))
        .collect()
}

#[cfg(feature = "rayon")]
fn all_matches(
    needle: &OwnedImage<Rgb>,
    haystack: &OwnedImage<Rgb>,
    budget: usize,
) -> Vec<MatchBox> {
    let max_y = haystack.height() - needle.height();
    let rows: Vec<Vec<MatchBox>> = (0..=max_y)
        .into_par_iter()
        .map(|y| row_matches(needle, haystack, y, budget).collect())
        .collect();
    rows.concat()
}
