//! Interchangeable matching strategies.
//!
//! A strategy answers one question: where does this needle appear in this
//! haystack? It never fails on "not found"; it returns [`Found::NoMatch`]
//! or an empty [`Found::Many`] and leaves escalation to the locator.

use crate::session::{Session, StrategyKind};
use crate::types::MatchBox;
use crate::util::ScreenMatchResult;
use image::DynamicImage;
use std::path::Path;

pub mod edge;
pub mod exact;

pub use edge::{EdgeAnalysis, EdgeStrategy};
pub use exact::ExactStrategy;

/// How many matches a strategy should report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// The first (exact) or best (edge) match only.
    Single,
    /// Every match.
    All,
}

/// Outcome of one strategy invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Found {
    NoMatch,
    Single(MatchBox),
    Many(Vec<MatchBox>),
}

impl Found {
    /// True when nothing was matched.
    pub fn is_empty(&self) -> bool {
        match self {
            Found::NoMatch => true,
            Found::Single(_) => false,
            Found::Many(boxes) => boxes.is_empty(),
        }
    }

    /// The first reported box, if any.
    pub fn first(&self) -> Option<MatchBox> {
        match self {
            Found::NoMatch => None,
            Found::Single(found) => Some(*found),
            Found::Many(boxes) => boxes.first().copied(),
        }
    }

    /// Every reported box.
    pub fn into_vec(self) -> Vec<MatchBox> {
        match self {
            Found::NoMatch => Vec::new(),
            Found::Single(found) => vec![found],
            Found::Many(boxes) => boxes,
        }
    }

    pub(crate) fn from_boxes(mode: MatchMode, boxes: Vec<MatchBox>) -> Self {
        match mode {
            MatchMode::All => Found::Many(boxes),
            MatchMode::Single => boxes.first().copied().map_or(Found::NoMatch, Found::Single),
        }
    }
}

/// The active strategy, configured from a session snapshot.
#[derive(Clone, Debug)]
pub enum Strategy {
    Exact(ExactStrategy),
    Edge(EdgeStrategy),
}

impl Strategy {
    /// Builds the strategy selected by the session with its current
    /// confidence and edge parameters.
    pub fn from_session(session: &Session) -> Self {
        let cfg = session.strategy();
        match cfg.kind {
            StrategyKind::Exact => Strategy::Exact(ExactStrategy::new(session.confidence())),
            StrategyKind::Edge => {
                Strategy::Edge(EdgeStrategy::new(cfg.edge, session.effective_confidence()))
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Exact(_) => StrategyKind::Exact,
            Strategy::Edge(_) => StrategyKind::Edge,
        }
    }

    /// Looks for the needle stored at `needle` inside `haystack`.
    ///
    /// Fails only when the needle cannot be read or decoded.
    pub fn try_locate(
        &self,
        needle: &Path,
        haystack: &DynamicImage,
        mode: MatchMode,
    ) -> ScreenMatchResult<Found> {
        match self {
            Strategy::Exact(strategy) => strategy.try_locate(needle, haystack, mode),
            Strategy::Edge(strategy) => strategy.try_locate(needle, haystack, mode),
        }
    }
}
