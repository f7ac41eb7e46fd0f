//! Cursor path smoothing for local preview.
//!
//! The processing service smooths the exported cursor itself; this module
//! reproduces the same path locally so the editor can draw it.

use cursorflow_project_model::{Point2D, PointerSample};

/// Smoothing factor used by the processing service.
pub const DEFAULT_EMA_ALPHA: f64 = 0.35;

/// Cursor smoothing engine.
pub struct CursorSmoother {
    algorithm: SmoothingAlgorithm,
}

/// Available smoothing algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingAlgorithm {
    /// Forward EMA pass followed by a backward pass over the result.
    ///
    /// `alpha` is in `[0.0, 1.0]`: the weight of the new sample. The second
    /// pass cancels the lag a single forward pass introduces.
    BidirectionalEma { alpha: f64 },

    /// Centered moving average over a window of N samples.
    MovingAverage { window: usize },

    /// Pass raw samples through.
    None,
}

impl CursorSmoother {
    pub fn new(algorithm: SmoothingAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Smoother matching the processing service (`smooth = true`).
    pub fn service_default() -> Self {
        Self::new(SmoothingAlgorithm::BidirectionalEma {
            alpha: DEFAULT_EMA_ALPHA,
        })
    }

    /// Smoother for an export's `smooth` flag.
    pub fn for_export(smooth: bool) -> Self {
        if smooth {
            Self::service_default()
        } else {
            Self::new(SmoothingAlgorithm::None)
        }
    }

    pub fn algorithm(&self) -> SmoothingAlgorithm {
        self.algorithm
    }

    /// Smooth a time-ordered sample sequence. Timestamps are preserved.
    pub fn smooth(&self, samples: &[PointerSample]) -> Vec<PointerSample> {
        match self.algorithm {
            SmoothingAlgorithm::BidirectionalEma { alpha } => smooth_bidirectional(samples, alpha),
            SmoothingAlgorithm::MovingAverage { window } => smooth_moving_average(samples, window),
            SmoothingAlgorithm::None => samples.to_vec(),
        }
    }

    /// Interpolated position at `time` (seconds).
    ///
    /// Clamps to the first sample before the path starts and to the last
    /// sample after it ends. `None` for an empty path.
    pub fn position_at(samples: &[PointerSample], time: f64) -> Option<Point2D> {
        let first = samples.first()?;
        let last = samples.last()?;

        if time <= first.time {
            return Some(Point2D::new(first.x, first.y));
        }
        if time >= last.time {
            return Some(Point2D::new(last.x, last.y));
        }

        // First sample strictly after `time`; never 0 and never len here.
        let upper = samples.partition_point(|s| s.time <= time);
        let a = &samples[upper - 1];
        let b = &samples[upper];

        let span = b.time - a.time;
        if span <= f64::EPSILON {
            return Some(Point2D::new(a.x, a.y));
        }

        Some(Point2D::lerp(
            &Point2D::new(a.x, a.y),
            &Point2D::new(b.x, b.y),
            (time - a.time) / span,
        ))
    }
}

fn smooth_bidirectional(samples: &[PointerSample], alpha: f64) -> Vec<PointerSample> {
    if samples.len() < 2 {
        return samples.to_vec();
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let mut result = samples.to_vec();

    for i in 1..result.len() {
        let prev = result[i - 1];
        let cur = &mut result[i];
        cur.x = alpha * cur.x + (1.0 - alpha) * prev.x;
        cur.y = alpha * cur.y + (1.0 - alpha) * prev.y;
    }

    for i in (0..result.len() - 1).rev() {
        let next = result[i + 1];
        let cur = &mut result[i];
        cur.x = alpha * cur.x + (1.0 - alpha) * next.x;
        cur.y = alpha * cur.y + (1.0 - alpha) * next.y;
    }

    result
}

fn smooth_moving_average(samples: &[PointerSample], window: usize) -> Vec<PointerSample> {
    if samples.is_empty() || window == 0 {
        return samples.to_vec();
    }

    let half = window / 2;
    (0..samples.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(samples.len());
            let slice = &samples[start..end];
            let count = slice.len() as f64;
            PointerSample {
                x: slice.iter().map(|s| s.x).sum::<f64>() / count,
                y: slice.iter().map(|s| s.y).sum::<f64>() / count,
                time: samples[i].time,
            }
        })
        .collect()
}
