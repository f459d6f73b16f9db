//! Counter-to-rate conversion.
//!
//! Kernel counters (bytes sent, sectors read, ...) only ever grow, except when
//! an interface is re-created or the counter wraps. A decrease is therefore
//! reported as a zero rate rather than a negative one.

/// Rate in units per second between two counter readings.
///
/// Returns `None` when no time has elapsed.
#[inline]
pub fn per_second(
    previous: u64,
    current: u64,
    elapsed_ms: u64,
) -> Option<f32> {
    if elapsed_ms == 0 {
        return None;
    }
    Some(current.saturating_sub(previous) as f32 * 1000.0 / elapsed_ms as f32)
}

/// Remembers the previous reading of one counter.
#[derive(Clone, Copy, Debug, Default)]
pub struct RateTracker {
    previous: Option<(u64, u64)>,
}

impl RateTracker {
    pub const fn new() -> Self { Self { previous: None } }

    /// Record a reading taken at `now_ms` and return the rate since the last one.
    ///
    /// The first reading only establishes the baseline and returns `None`.
    pub fn update(
        &mut self,
        counter: u64,
        now_ms: u64,
    ) -> Option<f32> {
        let rate = self
            .previous
            .and_then(|(prev, at)| per_second(prev, counter, now_ms.saturating_sub(at)));
        self.previous = Some((counter, now_ms));
        rate
    }

    /// Forget the baseline, e.g. after the counter source disappeared.
    pub fn reset(&mut self) { self.previous = None; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_over_two_seconds() {
        assert_eq!(per_second(1000, 1500, 2000), Some(250.0));
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        assert_eq!(per_second(1500, 100, 2000), Some(0.0));
    }

    #[test]
    fn test_zero_elapsed_has_no_rate() {
        assert_eq!(per_second(1000, 1500, 0), None);
    }

    #[test]
    fn test_tracker_first_reading_is_baseline() {
        let mut tracker = RateTracker::new();
        assert_eq!(tracker.update(1000, 10_000), None);
        assert_eq!(tracker.update(1500, 12_000), Some(250.0));
        assert_eq!(tracker.update(100, 14_000), Some(0.0), "reset must not go negative");
        assert_eq!(tracker.update(600, 16_000), Some(250.0));
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = RateTracker::new();
        tracker.update(1000, 0);
        tracker.reset();
        assert_eq!(tracker.update(5000, 1000), None);
    }
}
