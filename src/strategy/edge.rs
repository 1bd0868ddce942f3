//! Edge-based matching.
//!
//! Needle and haystack are reduced to binary edge maps with the same
//! parameters, then the needle's map is slid over the haystack's and scored
//! with normalized cross-correlation. A placement is reported only when its
//! score is strictly greater than the confidence.

use crate::candidate::peaks::{global_max, local_maxima};
use crate::edges::{detect_edges, EdgeMap, EdgeParams};
use crate::image::io::{load_luma, luma_from_dynamic};
use crate::image::OwnedImage;
use crate::kernel::{Kernel, NccDefault, SearchImage};
use crate::strategy::{Found, MatchMode};
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::types::MatchBox;
use crate::util::ScreenMatchResult;
use image::DynamicImage;
use std::path::Path;

/// Intermediate products of one edge match, kept for inspection.
#[derive(Clone, Debug)]
pub struct EdgeAnalysis {
    pub needle_edges: EdgeMap,
    pub haystack_edges: EdgeMap,
    /// `None` when the needle is larger than the haystack.
    pub surface: Option<OwnedImage<f32>>,
}

/// Edge detection followed by NCC.
#[derive(Clone, Debug)]
pub struct EdgeStrategy {
    params: EdgeParams,
    confidence: f32,
}

impl EdgeStrategy {
    pub fn new(params: EdgeParams, confidence: f32) -> Self {
        Self { params, confidence }
    }

    pub fn params(&self) -> &EdgeParams {
        &self.params
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Loads the needle as grayscale and matches it against the haystack.
    pub fn try_locate(
        &self,
        needle: &Path,
        haystack: &DynamicImage,
        mode: MatchMode,
    ) -> ScreenMatchResult<Found> {
        let needle = load_luma(needle)?;
        let haystack = luma_from_dynamic(haystack)?;
        self.search(&needle, &haystack, mode)
    }

    /// Matches luma images in `[0, 1]`.
    pub fn search(
        &self,
        needle: &OwnedImage<f32>,
        haystack: &OwnedImage<f32>,
        mode: MatchMode,
    ) -> ScreenMatchResult<Found> {
        let analysis = self.analyze(needle, haystack)?;
        Ok(self.extract(&analysis, mode))
    }

    /// Runs the edge pipeline on both images and correlates the edge maps.
    ///
    /// Fails with `InvalidConfiguration` when the parameters do not validate.
    pub fn analyze(
        &self,
        needle: &OwnedImage<f32>,
        haystack: &OwnedImage<f32>,
    ) -> ScreenMatchResult<EdgeAnalysis> {
        self.params.validate()?;
        let _span = trace_span!(
            "edge_analyze",
            needle_w = needle.width(),
            needle_h = needle.height(),
            haystack_w = haystack.width(),
            haystack_h = haystack.height()
        )
        .entered();

        let needle_edges = detect_edges(needle, &self.params);
        let haystack_edges = detect_edges(haystack, &self.params);

        let fits = needle.width() <= haystack.width() && needle.height() <= haystack.height();
        let surface = if fits {
            let plan = TemplatePlan::from_image(&needle_edges);
            let search = SearchImage::new(&haystack_edges);
            Some(NccDefault::surface(&search, &plan)?)
        } else {
            None
        };

        Ok(EdgeAnalysis {
            needle_edges,
            haystack_edges,
            surface,
        })
    }

    /// Turns a correlation surface into match boxes.
    pub fn extract(&self, analysis: &EdgeAnalysis, mode: MatchMode) -> Found {
        let surface = match analysis.surface.as_ref() {
            Some(surface) => surface,
            None => return Found::from_boxes(mode, Vec::new()),
        };
        let width = analysis.needle_edges.width();
        let height = analysis.needle_edges.height();
        let to_box = |x: usize, y: usize, score: f32| MatchBox {
            x,
            y,
            width,
            height,
            score,
        };

        match mode {
            MatchMode::Single => match global_max(surface) {
                Some(peak) if peak.score > self.confidence => {
                    trace_event!("edge_peak", score = peak.score, accepted = true);
                    Found::Single(to_box(peak.x, peak.y, peak.score))
                }
                Some(peak) => {
                    trace_event!("edge_peak", score = peak.score, accepted = false);
                    Found::NoMatch
                }
                None => Found::NoMatch,
            },
            MatchMode::All => {
                let boxes: Vec<MatchBox> = local_maxima(surface, self.confidence)
                    .into_iter()
                    .map(|peak| to_box(peak.x, peak.y, peak.score))
                    .collect();
                trace_event!("edge_peaks", count = boxes.len());
                Found::Many(boxes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeStrategy;
    use crate::edges::EdgeParams;
    use crate::image::OwnedImage;
    use crate::strategy::{Found, MatchMode};

    fn draw_cross(img: &mut OwnedImage<f32>, x0: usize, y0: usize) {
        for i in 0..12 {
            for t in 0..3 {
                img.set(x0 + i, y0 + 4 + t, 1.0);
                img.set(x0 + 4 + t, y0 + i, 1.0);
            }
        }
    }

    fn needle() -> OwnedImage<f32> {
        let mut img = OwnedImage::filled(20, 20, 0.0f32).unwrap();
        draw_cross(&mut img, 4, 4);
        img
    }

    fn haystack(at: &[(usize, usize)]) -> OwnedImage<f32> {
        let mut img = OwnedImage::filled(96, 64, 0.0f32).unwrap();
        for &(x, y) in at {
            draw_cross(&mut img, x + 4, y + 4);
        }
        img
    }

    fn params() -> EdgeParams {
        EdgeParams {
            sigma: 1.0,
            low_threshold: 0.1,
            high_threshold: 0.3,
        }
    }

    #[test]
    fn single_finds_the_stamped_needle() {
        let strategy = EdgeStrategy::new(params(), 0.9);
        let found = strategy
            .search(&needle(), &haystack(&[(50, 30)]), MatchMode::Single)
            .unwrap();
        match found {
            Found::Single(hit) => {
                assert_eq!((hit.x, hit.y, hit.width, hit.height), (50, 30, 20, 20));
                assert!(hit.score > 0.99);
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn score_must_strictly_exceed_confidence() {
        let strategy = EdgeStrategy::new(params(), 0.5);
        let analysis = strategy
            .analyze(&needle(), &haystack(&[(10, 10)]))
            .unwrap();
        let best = crate::candidate::peaks::global_max(analysis.surface.as_ref().unwrap())
            .unwrap()
            .score;

        let at_peak = EdgeStrategy::new(params(), best);
        assert_eq!(at_peak.extract(&analysis, MatchMode::Single), Found::NoMatch);
        let below = EdgeStrategy::new(params(), best - 1e-4);
        assert!(matches!(
            below.extract(&analysis, MatchMode::Single),
            Found::Single(_)
        ));
    }

    #[test]
    fn all_reports_each_occurrence() {
        let strategy = EdgeStrategy::new(params(), 0.9);
        let found = strategy
            .search(&needle(), &haystack(&[(2, 2), (60, 36)]), MatchMode::All)
            .unwrap();
        let mut coords: Vec<(usize, usize)> =
            found.into_vec().iter().map(|b| (b.x, b.y)).collect();
        coords.sort();
        assert_eq!(coords, vec![(2, 2), (60, 36)]);
    }

    #[test]
    fn blank_haystack_matches_nothing() {
        let strategy = EdgeStrategy::new(params(), 0.0);
        let found = strategy
            .search(&needle(), &haystack(&[]), MatchMode::Single)
            .unwrap();
        assert_eq!(found, Found::NoMatch);
    }

    #[test]
    fn oversized_needle_is_no_match() {
        let strategy = EdgeStrategy::new(params(), 0.5);
        let small = OwnedImage::filled(8, 8, 0.0f32).unwrap();
        let found = strategy.search(&needle(), &small, MatchMode::All).unwrap();
        assert_eq!(found, Found::Many(vec![]));
    }

    #[test]
    fn unvalidated_params_are_rejected_before_matching() {
        let huge = EdgeParams {
            sigma: 1e30,
            ..params()
        };
        let strategy = EdgeStrategy::new(huge, 0.5);
        assert!(matches!(
            strategy.search(&needle(), &haystack(&[(4, 4)]), MatchMode::Single),
            Err(crate::ScreenMatchError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn pipeline_is_deterministic() {
        let strategy = EdgeStrategy::new(params(), 0.9);
        let hay = haystack(&[(30, 20)]);
        let first = strategy.analyze(&needle(), &hay).unwrap();
        let second = strategy.analyze(&needle(), &hay).unwrap();
        assert_eq!(first.surface, second.surface);
        assert_eq!(first.needle_edges, second.needle_edges);
        assert_eq!(
            strategy.extract(&first, MatchMode::Single),
            strategy.extract(&second, MatchMode::Single)
        );
    }
}
