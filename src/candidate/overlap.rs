//! Disjoint-box suppression for exact matches.

use crate::types::MatchBox;

/// Keeps boxes in input order, dropping any that overlaps an already kept one.
pub(crate) fn keep_disjoint(boxes: Vec<MatchBox>) -> Vec<MatchBox> {
    let mut kept: Vec<MatchBox> = Vec::with_capacity(boxes.len());
    'outer: for candidate in boxes {
        for kept_box in kept.iter() {
            if kept_box.overlaps(&candidate) {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }
    kept
}
