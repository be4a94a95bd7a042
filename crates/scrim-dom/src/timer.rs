#![forbid(unsafe_code)]

//! Host-pumped timer deadlines.
//!
//! Widgets never spawn threads: they record a [`Deadline`] and the host
//! calls `tick(now)` from its event loop. `web_time` keeps this usable on
//! wasm targets with the same API as `std::time`.

use web_time::{Duration, Instant};

/// A wall-clock deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline `delay` after `now`.
    #[must_use]
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { at: now + delay }
    }

    /// Whether the deadline has passed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.at
    }

    /// The instant the deadline fires.
    #[must_use]
    pub const fn at(&self) -> Instant {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_exactly_at_deadline() {
        let now = Instant::now();
        let d = Deadline::after(now, Duration::from_millis(100));
        assert!(!d.is_due(now));
        assert!(!d.is_due(now + Duration::from_millis(99)));
        assert!(d.is_due(now + Duration::from_millis(100)));
        assert!(d.is_due(now + Duration::from_secs(5)));
    }
}
