//! Deadline-bounded retry of [`Locator::locate`].

use std::time::Duration;

use super::{Locator, OnMiss};
use crate::session::Session;
use crate::trace::{trace_event, trace_info, trace_span};
use crate::types::Location;
use crate::util::{ScreenMatchError, ScreenMatchResult};

impl Locator {
    /// Repeats the lookup of `spec` until it matches or `timeout` elapses.
    ///
    /// At least one attempt is always made, and every attempt captures a
    /// fresh haystack. Attempts run back to back with no sleep. Only
    /// [`ScreenMatchError::NotFound`] is retried; any other error ends the
    /// wait immediately. On timeout the failure hook runs exactly once. A
    /// timeout too long to represent as an `Instant` never expires.
    pub fn wait_for(
        &mut self,
        session: &Session,
        spec: &str,
        timeout: Duration,
    ) -> ScreenMatchResult<Location> {
        let _span = trace_span!("wait_for", spec = spec).entered();
        let deadline = self.clock.now().checked_add(timeout);
        let mut attempts = 0usize;
        loop {
            attempts += 1;
            match self.locate_with(session, spec, None, OnMiss::Silent) {
                Ok(location) => {
                    trace_event!("wait_for_found", attempts = attempts);
                    return Ok(location);
                }
                Err(ScreenMatchError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
            if let Some(deadline) = deadline {
                if self.clock.now() >= deadline {
                    break;
                }
            }
        }

        trace_info!(
            "image {:?} did not appear within {:?} after {} attempt(s)",
            spec,
            timeout,
            attempts
        );
        self.run_failure_hook();
        Err(ScreenMatchError::NotFound {
            spec: spec.to_string(),
        })
    }
}
