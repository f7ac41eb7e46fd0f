//! Zoom events: timeline-anchored camera instructions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest duration any timeline item may have (seconds).
pub const MIN_ITEM_DURATION: f64 = 0.5;

/// Duration given to zooms created with [`ZoomEvent::new`].
pub const DEFAULT_ZOOM_DURATION: f64 = 2.0;

/// Magnification given to zooms created with [`ZoomEvent::new`].
pub const DEFAULT_ZOOM_SCALE: f64 = 1.5;

/// Stable identity of a zoom event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoomId(pub Uuid);

impl ZoomId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ZoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ZoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Move the virtual camera's focus to `(x, y)` (percent of the frame) and
/// magnify by `scale`, for `duration` seconds starting at `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomEvent {
    pub id: ZoomId,
    pub start_time: f64,
    pub duration: f64,
    /// Horizontal focus, `[0, 100]`.
    pub x: f64,
    /// Vertical focus, `[0, 100]`.
    pub y: f64,
    /// Magnification, `>= 1.0`.
    pub scale: f64,
}

impl ZoomEvent {
    /// A centered zoom at `start_time` with default duration and scale.
    pub fn new(start_time: f64) -> Self {
        Self {
            id: ZoomId::new(),
            start_time,
            duration: DEFAULT_ZOOM_DURATION,
            x: 50.0,
            y: 50.0,
            scale: DEFAULT_ZOOM_SCALE,
        }
        .sanitized()
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Clamp every field into its documented range.
    pub fn sanitized(mut self) -> Self {
        self.start_time = non_negative(self.start_time);
        self.duration = finite_or(self.duration, MIN_ITEM_DURATION).max(MIN_ITEM_DURATION);
        self.x = finite_or(self.x, 50.0).clamp(0.0, 100.0);
        self.y = finite_or(self.y, 50.0).clamp(0.0, 100.0);
        self.scale = finite_or(self.scale, 1.0).max(1.0);
        self
    }

    /// Apply a partial update, keeping the invariants.
    pub fn apply(&mut self, patch: &ZoomPatch) {
        if let Some(v) = patch.start_time {
            self.start_time = v;
        }
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = patch.x {
            self.x = v;
        }
        if let Some(v) = patch.y {
            self.y = v;
        }
        if let Some(v) = patch.scale {
            self.scale = v;
        }
        *self = self.clone().sanitized();
    }
}

/// Partial update for a zoom event. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomPatch {
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
}

pub(crate) fn non_negative(value: f64) -> f64 {
    finite_or(value, 0.0).max(0.0)
}

pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
