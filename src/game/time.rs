//! Mismatch reveal timer
//!
//! Counts down frame deltas until a mismatched pair should be hidden again.

use std::time::Duration;

/// Default time a mismatched pair stays face up
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// A pending reveal, tagged with the board generation it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealTimer {
    /// Generation of the board that scheduled this reveal
    generation: u64,
    /// Time left before the reveal fires
    remaining: Duration,
}

impl RevealTimer {
    /// Schedule a reveal for the given board generation
    pub fn new(generation: u64, delay: Duration) -> Self {
        Self {
            generation,
            remaining: delay,
        }
    }

    /// Advance by `delta` and return true once the delay has elapsed
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(delta);
        self.remaining.is_zero()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timer = RevealTimer::new(1, Duration::from_millis(100));
        assert!(!timer.tick(Duration::from_millis(60)));
        assert_eq!(timer.remaining(), Duration::from_millis(40));
        assert!(timer.tick(Duration::from_millis(60)));
    }

    #[test]
    fn test_zero_delay_fires_immediately() {
        let mut timer = RevealTimer::new(3, Duration::ZERO);
        assert!(timer.tick(Duration::ZERO));
        assert_eq!(timer.generation(), 3);
    }
}
