//! Coalescing of rapid updates.
//!
//! Fast typing produces a burst of filter changes; only the last value of
//! a burst needs to reach the search session.  [`Debouncer`] keeps the most
//! recent value and releases it once no newer value has arrived for the
//! configured quiet period.
//!
//! Time is always passed in explicitly so callers (and tests) control the
//! clock.

use std::time::{Duration, Instant};

/// Holds the latest pending value until it has been stable for `quiet`.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replace any pending value with `value`, restarting the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value if it has settled by `now`.
    pub fn take_settled(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Take the pending value regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// When the pending value settles, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }

    /// Drop the pending value.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
