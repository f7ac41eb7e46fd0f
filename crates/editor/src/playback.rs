//! Playhead driven by real frame deltas.

use std::sync::Arc;
use std::time::Instant;

use cursorflow_common::FrameClock;
use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    /// Playback reached the end of the timeline on its own.
    Ended,
}

/// Owns the current playback time.
///
/// Time advances only in [`PlaybackDriver::tick`], by the wall-clock delta
/// between consecutive ticks. Pausing forgets the last tick so resuming
/// never jumps forward by the paused interval.
#[derive(Debug)]
pub struct PlaybackDriver {
    current_time: f64,
    duration: f64,
    playing: bool,
    clock: FrameClock,
    status: watch::Sender<PlaybackStatus>,
}

impl PlaybackDriver {
    pub fn new(duration: f64) -> Self {
        let (status, _) = watch::channel(PlaybackStatus::Stopped);
        Self {
            current_time: 0.0,
            duration: duration.max(0.0),
            playing: false,
            clock: FrameClock::new(),
            status,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn status(&self) -> PlaybackStatus {
        *self.status.borrow()
    }

    /// Watch status changes, including the end-of-timeline signal.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.subscribe()
    }

    /// Update the timeline length, pulling the playhead back inside it.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        if self.current_time > self.duration {
            self.current_time = self.duration;
        }
    }

    /// Start playing. Playing from the very end starts over.
    pub fn play(&mut self) {
        if self.current_time >= self.duration {
            self.current_time = 0.0;
        }
        self.playing = true;
        self.clock.reset();
        self.status.send_replace(PlaybackStatus::Playing);
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.clock.reset();
        self.status.send_replace(PlaybackStatus::Stopped);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewind to zero and play.
    pub fn restart(&mut self) {
        self.current_time = 0.0;
        self.play();
    }

    /// Move the playhead, clamped to `[0, duration]`. Returns the new time.
    pub fn seek(&mut self, time: f64) -> f64 {
        let time = if time.is_finite() { time } else { 0.0 };
        self.current_time = time.clamp(0.0, self.duration);
        self.current_time
    }

    /// Advance by the real time since the previous tick.
    ///
    /// Returns the delta applied. Reaching the end stops playback and
    /// publishes [`PlaybackStatus::Ended`].
    pub fn tick(&mut self, now: Instant) -> f64 {
        if !self.playing {
            return 0.0;
        }

        let dt = self.clock.tick(now);
        self.current_time += dt;

        if self.current_time >= self.duration {
            self.current_time = self.duration;
            self.playing = false;
            self.clock.reset();
            tracing::debug!(duration = self.duration, "Playback reached the end");
            self.status.send_replace(PlaybackStatus::Ended);
        }
        dt
    }
}

/// Playback shared between the editor loop and a recording session.
#[derive(Debug, Clone)]
pub struct SharedPlayback(Arc<Mutex<PlaybackDriver>>);

impl SharedPlayback {
    pub fn new(driver: PlaybackDriver) -> Self {
        Self(Arc::new(Mutex::new(driver)))
    }

    pub fn lock(&self) -> MutexGuard<'_, PlaybackDriver> {
        self.0.lock()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.0.lock().subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_tick_advances_by_real_delta() {
        let mut playback = PlaybackDriver::new(10.0);
        let t0 = Instant::now();
        playback.play();

        assert_eq!(playback.tick(t0), 0.0);
        let dt = playback.tick(t0 + Duration::from_millis(500));
        assert!((dt - 0.5).abs() < 1e-9);
        assert!((playback.current_time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_pause_does_not_count_paused_time() {
        let mut playback = PlaybackDriver::new(10.0);
        let t0 = Instant::now();
        playback.play();
        playback.tick(t0);
        playback.tick(t0 + Duration::from_secs(1));
        playback.pause();

        assert_eq!(playback.tick(t0 + Duration::from_secs(5)), 0.0);
        playback.play();
        playback.tick(t0 + Duration::from_secs(6));
        playback.tick(t0 + Duration::from_millis(6250));
        assert!((playback.current_time() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_reaching_end_stops_and_signals() {
        let mut playback = PlaybackDriver::new(2.0);
        let mut status = playback.subscribe();
        let t0 = Instant::now();
        playback.play();
        playback.tick(t0);
        playback.tick(t0 + Duration::from_secs(3));

        assert!(!playback.is_playing());
        assert_eq!(playback.current_time(), 2.0);
        assert_eq!(*status.borrow_and_update(), PlaybackStatus::Ended);

        playback.play();
        assert_eq!(playback.current_time(), 0.0);
    }

    #[test]
    fn test_seek_and_duration_clamp() {
        let mut playback = PlaybackDriver::new(10.0);
        assert_eq!(playback.seek(-1.0), 0.0);
        assert_eq!(playback.seek(12.0), 10.0);
        playback.set_duration(4.0);
        assert_eq!(playback.current_time(), 4.0);
        assert_eq!(playback.seek(f64::NAN), 0.0);
    }

    #[test]
    fn test_restart_rewinds_and_plays() {
        let shared = SharedPlayback::new(PlaybackDriver::new(5.0));
        shared.lock().seek(3.0);
        shared.lock().restart();
        let playback = shared.lock();
        assert_eq!(playback.current_time(), 0.0);
        assert_eq!(playback.status(), PlaybackStatus::Playing);
    }
}
