//! Clock and timing utilities.
//!
//! - [`RecordingClock`] anchors a capture session to a monotonic epoch so
//!   pointer samples can be expressed relative to capture start.
//! - [`FrameClock`] measures the wall-clock delta between animation
//!   callbacks and forgets its last tick on pause.
//! - [`RateController`] throttles a sample stream to a target rate.

use std::time::{Duration, Instant};

/// A recording clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment capture started).
#[derive(Debug, Clone)]
pub struct RecordingClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl RecordingClock {
    /// Create a new recording clock anchored to now.
    pub fn start() -> Self {
        Self::from_epoch(Instant::now())
    }

    /// Create a clock from a known epoch.
    pub fn from_epoch(epoch: Instant) -> Self {
        Self {
            epoch,
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get seconds elapsed since capture start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Seconds between the epoch and `at`, or `None` if `at` precedes it.
    pub fn offset_of(&self, at: Instant) -> Option<f64> {
        at.checked_duration_since(self.epoch)
            .map(|d| d.as_secs_f64())
    }

    /// Wall-clock time at capture start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Tracks the real elapsed time between consecutive animation frames.
///
/// The first tick after construction or [`FrameClock::reset`] reports a zero
/// delta, so a resumed animation never applies the time spent paused.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now` and return seconds since the previous frame.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let delta = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        delta
    }

    /// Forget the previous frame.
    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    /// Whether a previous frame is known.
    pub fn is_primed(&self) -> bool {
        self.last_tick.is_some()
    }
}

/// Rate controller for sample throttling.
#[derive(Debug)]
pub struct RateController {
    target_interval: Duration,
    last_tick: Option<Instant>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval: Duration::from_secs(1) / target_hz.max(1),
            last_tick: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now: Instant) -> bool {
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                true
            }
            Some(last) if now >= last + self.target_interval => {
                self.last_tick = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Target interval between ticks.
    pub fn interval(&self) -> Duration {
        self.target_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = RecordingClock::start();
        assert!(clock.elapsed_secs() < 1.0);
    }

    #[test]
    fn test_offset_before_epoch_is_none() {
        let before = Instant::now();
        let clock = RecordingClock::from_epoch(before + Duration::from_millis(50));
        assert_eq!(clock.offset_of(before), None);
        let offset = clock
            .offset_of(before + Duration::from_millis(250))
            .unwrap();
        assert!((offset - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_frame_clock_first_tick_is_zero() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(start), 0.0);
        let dt = clock.tick(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-9);
    }

    #[test]
    fn test_frame_clock_reset_drops_stale_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(start);
        clock.reset();
        assert!(!clock.is_primed());
        // Five seconds "paused" must not leak into the next frame.
        assert_eq!(clock.tick(start + Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn test_rate_controller() {
        let start = Instant::now();
        let mut ctrl = RateController::new(60);
        assert!(ctrl.should_tick(start)); // first tick always fires
        assert!(!ctrl.should_tick(start + Duration::from_millis(1)));
        assert!(ctrl.should_tick(start + Duration::from_millis(17)));
    }
}
