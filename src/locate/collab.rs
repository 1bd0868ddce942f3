//! External collaborators consumed by the locator.

use std::error::Error;
use std::time::Instant;

/// Boxed error returned by collaborators.
pub type CollaboratorError = Box<dyn Error + Send + Sync + 'static>;

/// Source of haystack images.
///
/// Calls block until the capture is complete; the engine applies no timeout.
pub trait ScreenCapture {
    fn capture(&mut self) -> Result<image::DynamicImage, CollaboratorError>;
}

/// Side effect run when a lookup is exhausted, e.g. saving a screenshot.
///
/// Errors are logged and swallowed by the locator.
pub trait FailureHook {
    fn on_failure(&mut self) -> Result<(), CollaboratorError>;
}

/// Time source for the poller's deadline.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Capture source for callers that always supply the haystack.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCapture;

impl ScreenCapture for NoCapture {
    fn capture(&mut self) -> Result<image::DynamicImage, CollaboratorError> {
        Err("no screen capture source configured".into())
    }
}
