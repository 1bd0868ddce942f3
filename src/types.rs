//! Result types shared by strategies, the locator and callers.

use crate::util::math::box_center;

/// Bounding box of a match in haystack pixels, with its score.
///
/// For the exact strategy the score is the fraction of agreeing pixels
/// (1.0 for a pixel-perfect hit); for the edge strategy it is the NCC value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub score: f32,
}

impl MatchBox {
    /// Integer pixel center, `(x + width / 2, y + height / 2)`.
    pub fn center(&self) -> Point {
        let (cx, cy) = box_center(self.x, self.y, self.width, self.height);
        Point::new(cx as f64, cy as f64)
    }

    /// Returns true when the two boxes share at least one pixel.
    pub fn overlaps(&self, other: &MatchBox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Screen point; fractional after high-density halving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A located reference: the raw box and the reported center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// Box in haystack pixels.
    pub bounds: MatchBox,
    /// Center after coordinate post-processing.
    pub center: Point,
}
