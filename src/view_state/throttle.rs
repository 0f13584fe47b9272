//! Rate limiting for pointer-driven recomputes.

use std::time::{Duration, Instant};

/// Default spacing between pointer-move recomputes.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);

/// Lets at most one call through per interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

impl Throttle {
    /// A throttle letting one call through per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether a recompute may run at `now`. A `true` answer starts a new
    /// interval.
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Forget the last run (teardown).
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Minimum spacing between calls.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_passes() {
        let mut throttle = Throttle::default();
        assert!(throttle.ready(Instant::now()));
    }

    #[test]
    fn calls_within_interval_are_dropped() {
        let mut throttle = Throttle::default();
        let t0 = Instant::now();
        assert!(throttle.ready(t0));
        assert!(!throttle.ready(t0 + Duration::from_millis(40)));
        assert!(!throttle.ready(t0 + Duration::from_millis(99)));
        assert!(throttle.ready(t0 + Duration::from_millis(100)));
        assert!(!throttle.ready(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn reset_reopens() {
        let mut throttle = Throttle::new(Duration::from_secs(1));
        let t0 = Instant::now();
        assert!(throttle.ready(t0));
        throttle.reset();
        assert!(throttle.ready(t0 + Duration::from_millis(1)));
    }

    #[test]
    fn clock_going_backwards_does_not_fire() {
        let mut throttle = Throttle::default();
        let t0 = Instant::now() + Duration::from_secs(5);
        assert!(throttle.ready(t0));
        assert!(!throttle.ready(t0 - Duration::from_secs(1)));
    }
}
