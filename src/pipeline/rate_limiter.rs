//! Frame admission throttling.

use crate::defaults;
use std::time::{Duration, Instant};

/// Decides whether an incoming frame timestamp is eligible for processing.
///
/// Caps classifier invocation rate independently of the camera frame rate:
/// a frame is admitted only when strictly more than `min_interval` has
/// elapsed since the last admitted frame. The first frame of a session is
/// always admitted. Rejected frames leave the limiter untouched; there is
/// no retry and no backpressure to the source.
///
/// Single-writer: only the capture thread calls `admit`, so the state needs
/// no synchronization.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_admitted: Option<Instant>,
}

impl RateLimiter {
    /// Limiter with the given minimum interval between admissions.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_admitted: None,
        }
    }

    /// Decide whether a frame with the given timestamp may proceed.
    ///
    /// Timestamps are expected to be non-decreasing; if the upstream clock
    /// regresses the frame is treated as not yet eligible rather than an
    /// error.
    pub fn admit(&mut self, timestamp: Instant) -> bool {
        match self.last_admitted {
            None => {
                self.last_admitted = Some(timestamp);
                true
            }
            Some(prev) => {
                // None on clock regression: not yet eligible.
                let elapsed = match timestamp.checked_duration_since(prev) {
                    Some(elapsed) => elapsed,
                    None => return false,
                };
                if elapsed <= self.min_interval {
                    false
                } else {
                    self.last_admitted = Some(timestamp);
                    true
                }
            }
        }
    }

    /// Timestamp of the last admitted frame, if any.
    pub fn last_admitted(&self) -> Option<Instant> {
        self.last_admitted
    }

    /// Reset to the start-of-session state.
    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(defaults::MIN_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn test_first_frame_always_admitted() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let base = Instant::now();
        assert!(limiter.admit(at(base, 0)));
    }

    #[test]
    fn test_one_second_cadence_0_400_1100() {
        // 0ms admitted, 400ms dropped, 1100ms admitted.
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let base = Instant::now();

        assert!(limiter.admit(at(base, 0)));
        assert!(!limiter.admit(at(base, 400)));
        assert!(limiter.admit(at(base, 1100)));
    }

    #[test]
    fn test_exactly_min_interval_is_rejected() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let base = Instant::now();

        assert!(limiter.admit(at(base, 0)));
        assert!(!limiter.admit(at(base, 1000)));
        assert!(limiter.admit(at(base, 1001)));
    }

    #[test]
    fn test_rejection_leaves_state_unchanged() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let base = Instant::now();

        assert!(limiter.admit(at(base, 0)));
        assert!(!limiter.admit(at(base, 900)));
        // Interval still measured from t=0, not t=900.
        assert!(!limiter.admit(at(base, 1000)));
        assert!(limiter.admit(at(base, 1500)));
        assert_eq!(limiter.last_admitted(), Some(at(base, 1500)));
    }

    #[test]
    fn test_clock_regression_is_not_eligible() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let base = Instant::now();

        assert!(limiter.admit(at(base, 2000)));
        // Regressed timestamp: dropped, state untouched.
        assert!(!limiter.admit(at(base, 500)));
        assert_eq!(limiter.last_admitted(), Some(at(base, 2000)));
        assert!(limiter.admit(at(base, 3001)));
    }

    #[test]
    fn test_reset_readmits_immediately() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let base = Instant::now();

        assert!(limiter.admit(at(base, 0)));
        limiter.reset();
        assert!(limiter.admit(at(base, 1)));
    }

    #[test]
    fn test_window_admission_bound() {
        // In any window of length T, admissions never exceed ceil(T/min)+1.
        let min_ms = 100u64;
        let mut limiter = RateLimiter::new(Duration::from_millis(min_ms));
        let base = Instant::now();

        // A dense burst of timestamps, 10ms apart over 2 seconds.
        let window_ms = 2000u64;
        let admitted: Vec<u64> = (0..=window_ms)
            .step_by(10)
            .filter(|&ms| limiter.admit(at(base, ms)))
            .collect();

        let bound = window_ms.div_ceil(min_ms) + 1;
        assert!(
            (admitted.len() as u64) <= bound,
            "{} admissions exceed bound {}",
            admitted.len(),
            bound
        );
    }
}
