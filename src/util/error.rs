//! Error types for screenmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for screenmatch operations.
pub type ScreenMatchResult<T> = std::result::Result<T, ScreenMatchError>;

/// Errors that can occur while resolving references or matching images.
///
/// A strategy that simply finds nothing is not an error; only the locator
/// and poller turn exhaustion into [`ScreenMatchError::NotFound`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScreenMatchError {
    /// The reference root or a strategy parameter is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    /// A reference name does not resolve to usable image files.
    #[error("invalid image spec {spec:?}: {reason}")]
    InvalidImageSpec { spec: String, reason: &'static str },
    /// No candidate matched within one attempt or within the timeout.
    #[error("image {spec:?} was not found")]
    NotFound { spec: String },
    /// `locate_all` was given a reference with more than one candidate.
    #[error("locating all occurrences of {count} candidate files for {spec:?} is not supported")]
    UnsupportedSpec { spec: String, count: usize },
    /// Unknown matching strategy name.
    #[error("invalid strategy: {name:?}")]
    InvalidStrategy { name: String },
    /// Unknown offset direction name.
    #[error("invalid direction: {name:?}")]
    InvalidDirection { name: String },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer is shorter than its declared layout.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A reference image could not be read or decoded.
    #[error("failed to load {path:?}: {reason}")]
    ImageIo { path: PathBuf, reason: String },
    /// The screen capture collaborator failed.
    #[error("screen capture failed: {reason}")]
    Capture { reason: String },
}
