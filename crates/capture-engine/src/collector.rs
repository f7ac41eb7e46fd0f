//! Pointer-sample collection during capture.

use std::time::Instant;

use cursorflow_common::{RateController, RecordingClock};
use cursorflow_project_model::{Bounds, PointerSample};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Turns raw host positions into normalized, capture-relative samples.
#[derive(Debug)]
pub struct PointerCollector {
    clock: RecordingClock,
    bounds: Bounds,
    rate: RateController,
    samples: Vec<PointerSample>,
    dropped_early: usize,
    throttled: usize,
}

impl PointerCollector {
    pub fn new(clock: RecordingClock, bounds: Bounds, rate_hz: u32) -> Self {
        Self {
            clock,
            bounds,
            rate: RateController::new(rate_hz),
            samples: Vec::new(),
            dropped_early: 0,
            throttled: 0,
        }
    }

    /// Record a position seen at `at`. Returns whether it was kept.
    pub fn push(&mut self, x: f64, y: f64, at: Instant) -> bool {
        let Some(time) = self.clock.offset_of(at) else {
            self.dropped_early += 1;
            return false;
        };
        if !self.rate.should_tick(at) {
            self.throttled += 1;
            return false;
        }
        let point = self.bounds.normalize(x, y);
        self.samples.push(PointerSample::new(point.x, point.y, time));
        true
    }

    pub fn samples(&self) -> &[PointerSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<PointerSample> {
        tracing::debug!(
            kept = self.samples.len(),
            dropped_early = self.dropped_early,
            throttled = self.throttled,
            "Pointer collection finished"
        );
        self.samples
    }
}

/// A collector running on its own task.
pub struct CollectorTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Vec<PointerSample>>,
}

impl CollectorTask {
    /// Drain `rx` into `collector` until the channel closes or
    /// [`CollectorTask::finish`] is called.
    pub fn spawn(mut rx: mpsc::Receiver<crate::RawPointerSample>, mut collector: PointerCollector) -> Self {
        let (stop, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    sample = rx.recv() => match sample {
                        Some(s) => {
                            collector.push(s.x, s.y, s.at);
                        }
                        None => break,
                    },
                    _ = &mut stop_rx => {
                        while let Ok(s) = rx.try_recv() {
                            collector.push(s.x, s.y, s.at);
                        }
                        break;
                    }
                }
            }
            collector.into_samples()
        });
        Self { stop, handle }
    }

    /// Stop collecting and return what was gathered.
    pub async fn finish(self) -> Vec<PointerSample> {
        let _ = self.stop.send(());
        match self.handle.await {
            Ok(samples) => samples,
            Err(e) => {
                tracing::warn!(error = %e, "Pointer collector task failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::RawPointerSample;

    fn collector(epoch: Instant) -> PointerCollector {
        PointerCollector::new(
            RecordingClock::from_epoch(epoch),
            Bounds::new(100.0, 50.0, 200.0, 100.0),
            60,
        )
    }

    #[test]
    fn test_samples_are_normalized_and_relative() {
        let epoch = Instant::now();
        let mut c = collector(epoch);
        assert!(c.push(200.0, 100.0, epoch + Duration::from_millis(500)));

        let s = c.samples()[0];
        assert_eq!(s.x, 0.5);
        assert_eq!(s.y, 0.5);
        assert!((s.time - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_samples_before_capture_start_are_dropped() {
        let epoch = Instant::now() + Duration::from_secs(1);
        let mut c = collector(epoch);
        assert!(!c.push(150.0, 60.0, epoch - Duration::from_millis(10)));
        assert!(c.is_empty());
    }

    #[test]
    fn test_fast_samples_are_throttled() {
        let epoch = Instant::now();
        let mut c = collector(epoch);
        assert!(c.push(0.0, 0.0, epoch));
        assert!(!c.push(0.0, 0.0, epoch + Duration::from_millis(5)));
        assert!(c.push(0.0, 0.0, epoch + Duration::from_millis(20)));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_out_of_bounds_positions_clamp() {
        let epoch = Instant::now();
        let mut c = collector(epoch);
        c.push(-40.0, 900.0, epoch);
        let s = c.samples()[0];
        assert_eq!((s.x, s.y), (0.0, 1.0));
    }

    #[tokio::test]
    async fn test_task_drains_buffered_samples_on_finish() {
        let epoch = Instant::now();
        let (tx, rx) = mpsc::channel(16);
        for i in 0..3u64 {
            tx.send(RawPointerSample {
                x: 200.0,
                y: 100.0,
                at: epoch + Duration::from_millis(100 * i),
            })
            .await
            .unwrap();
        }

        let task = CollectorTask::spawn(rx, collector(epoch));
        let samples = task.finish().await;
        assert_eq!(samples.len(), 3);
        drop(tx);
    }
}
