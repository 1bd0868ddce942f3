//! Locating references on screen.
//!
//! The [`Locator`] owns the collaborators (capture source, failure hook,
//! clock) and receives the [`Session`] by reference on every call. Each call
//! resolves the reference once into an ordered candidate set, captures the
//! haystack at most once, and tries the candidates in order until one
//! matches. Only here does exhaustion become an error.

use crate::reference::{CandidateSet, ReferenceResolver};
use crate::session::Session;
use crate::strategy::{MatchMode, Strategy};
use crate::trace::{trace_info, trace_span, trace_warn};
use crate::types::{Location, MatchBox, Point};
use crate::util::{ScreenMatchError, ScreenMatchResult};
use image::DynamicImage;

mod collab;
pub mod offset;
mod poll;

pub use collab::{Clock, CollaboratorError, FailureHook, NoCapture, ScreenCapture, SystemClock};
pub use offset::{offset, Direction};

/// What to do when no candidate matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OnMiss {
    /// Log the miss and run the failure hook.
    Report,
    /// Stay silent; the caller decides.
    Silent,
}

/// Finds references on captured or supplied haystacks.
pub struct Locator {
    capture: Box<dyn ScreenCapture>,
    failure_hook: Option<Box<dyn FailureHook>>,
    clock: Box<dyn Clock>,
}

impl Locator {
    /// Creates a locator that captures haystacks from `capture`.
    pub fn new(capture: impl ScreenCapture + 'static) -> Self {
        Self {
            capture: Box::new(capture),
            failure_hook: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Installs the hook run when a lookup is exhausted.
    pub fn with_failure_hook(mut self, hook: impl FailureHook + 'static) -> Self {
        self.failure_hook = Some(Box::new(hook));
        self
    }

    /// Replaces the clock used by [`Locator::wait_for`].
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Locates `spec` and returns its box and post-processed center.
    ///
    /// Candidates are tried in order and the first match wins; scores are
    /// not compared across candidates. When none matches, the failure hook
    /// runs once and [`ScreenMatchError::NotFound`] is returned.
    pub fn locate(
        &mut self,
        session: &Session,
        spec: &str,
        haystack: Option<&DynamicImage>,
    ) -> ScreenMatchResult<Location> {
        self.locate_with(session, spec, haystack, OnMiss::Report)
    }

    /// Returns every occurrence of a single-file reference.
    ///
    /// The result may be empty; the failure hook is not run. A reference
    /// naming a directory of several files is rejected.
    pub fn locate_all(
        &mut self,
        session: &Session,
        spec: &str,
        haystack: Option<&DynamicImage>,
    ) -> ScreenMatchResult<Vec<MatchBox>> {
        let _span = trace_span!("locate_all", spec = spec).entered();
        let candidates = self.candidates(session, spec)?;
        if candidates.len() > 1 {
            return Err(ScreenMatchError::UnsupportedSpec {
                spec: spec.to_string(),
                count: candidates.len(),
            });
        }

        let strategy = Strategy::from_session(session);
        let captured;
        let haystack = match haystack {
            Some(img) => img,
            None => {
                captured = self.capture_haystack()?;
                &captured
            }
        };
        let boxes = match candidates.paths().first() {
            Some(path) => strategy.try_locate(path, haystack, MatchMode::All)?.into_vec(),
            None => Vec::new(),
        };
        trace_info!(
            "image {:?} found {} time(s) (strategy: {})",
            spec,
            boxes.len(),
            strategy.kind()
        );
        Ok(boxes)
    }

    /// Reports whether `spec` is visible, never failing and never running
    /// the failure hook.
    pub fn exists(&mut self, session: &Session, spec: &str) -> bool {
        self.locate_with(session, spec, None, OnMiss::Silent).is_ok()
    }

    /// Locates `spec` and moves its center by `pixels` in `direction`.
    pub fn locate_relative(
        &mut self,
        session: &Session,
        spec: &str,
        direction: Direction,
        pixels: i32,
    ) -> ScreenMatchResult<Point> {
        let location = self.locate(session, spec, None)?;
        Ok(offset(location.center, direction, pixels))
    }

    fn candidates(&self, session: &Session, spec: &str) -> ScreenMatchResult<CandidateSet> {
        ReferenceResolver::new(session.reference_root()).list_candidates(spec)
    }

    fn capture_haystack(&mut self) -> ScreenMatchResult<DynamicImage> {
        self.capture
            .capture()
            .map_err(|err| ScreenMatchError::Capture {
                reason: err.to_string(),
            })
    }

    fn locate_with(
        &mut self,
        session: &Session,
        spec: &str,
        haystack: Option<&DynamicImage>,
        on_miss: OnMiss,
    ) -> ScreenMatchResult<Location> {
        let _span = trace_span!("locate", spec = spec).entered();
        let candidates = self.candidates(session, spec)?;
        let strategy = Strategy::from_session(session);

        let captured;
        let haystack = match haystack {
            Some(img) => img,
            None => {
                captured = self.capture_haystack()?;
                &captured
            }
        };

        for path in &candidates {
            if let Some(found) = strategy
                .try_locate(path, haystack, MatchMode::Single)?
                .first()
            {
                let location = post_process(session, found);
                if on_miss == OnMiss::Report {
                    trace_info!(
                        "image {:?} found at ({}, {}) (strategy: {})",
                        spec,
                        location.center.x,
                        location.center.y,
                        strategy.kind()
                    );
                }
                return Ok(location);
            }
        }

        if on_miss == OnMiss::Report {
            trace_info!(
                "image {:?} was not found on screen (strategy: {})",
                spec,
                strategy.kind()
            );
            self.run_failure_hook();
        }
        Err(ScreenMatchError::NotFound {
            spec: spec.to_string(),
        })
    }

    fn run_failure_hook(&mut self) {
        if let Some(hook) = self.failure_hook.as_mut() {
            if let Err(err) = hook.on_failure() {
                trace_warn!("failure hook failed: {}", err);
            }
        }
    }
}

/// Centers the box and applies the high-density halving.
fn post_process(session: &Session, bounds: MatchBox) -> Location {
    let mut center = bounds.center();
    if session.high_density_display() {
        center = Point::new(center.x / 2.0, center.y / 2.0);
    }
    Location { bounds, center }
}

#[cfg(test)]
mod tests {
    use super::post_process;
    use crate::session::Session;
    use crate::types::{MatchBox, Point};

    #[test]
    fn high_density_display_halves_center() {
        let bounds = MatchBox {
            x: 90,
            y: 190,
            width: 20,
            height: 20,
            score: 1.0,
        };
        let mut session = Session::default();
        assert_eq!(
            post_process(&session, bounds).center,
            Point::new(100.0, 200.0)
        );
        session.set_high_density_display(true);
        let location = post_process(&session, bounds);
        assert_eq!(location.center, Point::new(50.0, 100.0));
        assert_eq!(location.bounds, bounds);
    }
}
