//! Move-event throttling against an injected monotonic clock.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Minimum interval between admitted non-pen move events.
pub const DEFAULT_MOVE_INTERVAL: Duration = Duration::from_millis(15);

/// Monotonic time source. Injected so throttling is testable without
/// sleeping.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Production clock backed by `Instant`.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-cranked clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Rate limiter for pointer-move events. Pen moves bypass it so stroke
/// fidelity is never throttled away.
#[derive(Debug)]
pub struct MoveThrottle {
    min_interval: Duration,
    last: Option<Duration>,
}

impl MoveThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Whether a move at the current clock time may pass. `bypass` is
    /// set for pen input.
    pub fn admit(&mut self, clock: &dyn Clock, bypass: bool) -> bool {
        if bypass {
            return true;
        }
        let now = clock.now();
        if let Some(last) = self.last {
            if now.saturating_sub(last) < self.min_interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    /// Forget the last admitted time (gesture ended).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for MoveThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttles_rapid_moves() {
        let clock = ManualClock::new();
        let mut throttle = MoveThrottle::new(Duration::from_millis(15));
        assert!(throttle.admit(&clock, false));
        clock.advance(Duration::from_millis(5));
        assert!(!throttle.admit(&clock, false));
        clock.advance(Duration::from_millis(11));
        assert!(throttle.admit(&clock, false));
    }

    #[test]
    fn test_pen_bypasses() {
        let clock = ManualClock::new();
        let mut throttle = MoveThrottle::new(Duration::from_millis(15));
        assert!(throttle.admit(&clock, false));
        assert!(throttle.admit(&clock, true));
        assert!(throttle.admit(&clock, true));
    }

    #[test]
    fn test_reset_forgets_window() {
        let clock = ManualClock::new();
        let mut throttle = MoveThrottle::new(Duration::from_millis(15));
        assert!(throttle.admit(&clock, false));
        throttle.reset();
        assert!(throttle.admit(&clock, false));
    }
}
