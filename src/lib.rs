//! ScreenMatch finds reference images inside screenshots.
//!
//! A reference is resolved to an ordered list of candidate image files, each
//! candidate is searched for in a haystack with one of two strategies, and
//! the first hit is reported as a bounding box plus a click point:
//!
//! - [`ExactStrategy`] compares RGB pixels directly and honors the
//!   confidence as a pixel-agreement fraction (with the `tolerant` feature).
//! - [`EdgeStrategy`] runs Canny edge detection on both images and scores
//!   the needle edges against every haystack position with normalized
//!   cross-correlation.
//!
//! The [`Locator`] drives lookups against a [`Session`], capturing the
//! screen through a [`ScreenCapture`] collaborator and optionally polling
//! until a deadline with [`Locator::wait_for`]. Parallel search is
//! available through the `rayon` feature; structured logging through the
//! `tracing` feature.

mod candidate;
pub mod edges;
pub mod image;
pub mod kernel;
pub mod locate;
pub mod reference;
pub mod session;
pub mod strategy;
pub mod template;
mod trace;
pub mod types;
pub mod util;

pub use crate::edges::{detect_edges, EdgeMap, EdgeParams, MAX_SIGMA};
pub use crate::image::OwnedImage;
pub use crate::kernel::scalar::NccScalar;
pub use crate::kernel::{Kernel, NccDefault, SearchImage};
pub use crate::locate::{
    offset, Clock, CollaboratorError, Direction, FailureHook, Locator, NoCapture, ScreenCapture,
    SystemClock,
};
pub use crate::reference::{CandidateSet, ReferenceResolver};
pub use crate::session::{
    Session, Settings, StrategyConfig, StrategyKind, EDGE_DEFAULT_CONFIDENCE,
    EXACT_DEFAULT_CONFIDENCE,
};
pub use crate::strategy::{
    EdgeAnalysis, EdgeStrategy, ExactStrategy, Found, MatchMode, Strategy,
};
pub use crate::template::TemplatePlan;
pub use crate::types::{Location, MatchBox, Point};
pub use crate::util::{ScreenMatchError, ScreenMatchResult};

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::NccRayon;
