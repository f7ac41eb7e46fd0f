//! The virtual camera.
//!
//! Three springs (x, y, scale) chase a target transform. The target is the
//! neutral framing `(0, 0, content_scale)` when no zoom is active, and a
//! clamped pan/magnify derived from the zoom event otherwise. All three
//! axes are always stepped with the same [`PhysicsConfig`]; mixing physics
//! between axes makes the trajectory wobble.

use cursorflow_project_model::{PhysicsConfig, Size, ZoomEvent, ZoomId};
use serde::Serialize;

use crate::spring::SpringState;

/// A 2D camera transform: translate in pixels, then uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl CameraTransform {
    pub const IDENTITY: CameraTransform = CameraTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.3}px, {:.3}px) scale({:.4})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// Target transform for a zoom event on a stage of `stage` pixels.
///
/// The focus point's offset from the stage center is scaled and negated,
/// then each axis is clamped to `±(dim / 2)·(scale - 1)` so the magnified
/// content never exposes space outside the original frame.
pub fn compute_zoom_target(zoom: &ZoomEvent, stage: Size) -> CameraTransform {
    let scale = zoom.scale.max(1.0);
    let focus_x = (zoom.x - 50.0) / 100.0 * stage.width;
    let focus_y = (zoom.y - 50.0) / 100.0 * stage.height;

    let limit_x = (stage.width / 2.0) * (scale - 1.0);
    let limit_y = (stage.height / 2.0) * (scale - 1.0);

    CameraTransform {
        translate_x: (-focus_x * scale).clamp(-limit_x, limit_x),
        translate_y: (-focus_y * scale).clamp(-limit_y, limit_y),
        scale,
    }
}

/// What the current target was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveZoom {
    id: ZoomId,
    x: f64,
    y: f64,
    scale: f64,
}

impl ActiveZoom {
    fn of(zoom: &ZoomEvent) -> Self {
        Self {
            id: zoom.id,
            x: zoom.x,
            y: zoom.y,
            scale: zoom.scale,
        }
    }
}

/// Spring-driven camera following the active zoom event.
#[derive(Debug, Clone)]
pub struct CameraSimulator {
    x: SpringState,
    y: SpringState,
    scale: SpringState,
    user_physics: PhysicsConfig,
    content_scale: f64,
    stage: Size,
    active: Option<ActiveZoom>,
}

impl CameraSimulator {
    /// A camera resting at the neutral framing.
    pub fn new(stage: Size, user_physics: PhysicsConfig, content_scale: f64) -> Self {
        let content_scale = sanitize_scale(content_scale);
        Self {
            x: SpringState::at_rest(0.0),
            y: SpringState::at_rest(0.0),
            scale: SpringState::at_rest(content_scale),
            user_physics,
            content_scale,
            stage,
            active: None,
        }
    }

    /// Physics currently driving all three axes.
    pub fn physics(&self) -> PhysicsConfig {
        if self.active.is_some() {
            PhysicsConfig::ZOOM
        } else {
            self.user_physics
        }
    }

    pub fn active_zoom(&self) -> Option<ZoomId> {
        self.active.map(|a| a.id)
    }

    pub fn stage(&self) -> Size {
        self.stage
    }

    pub fn content_scale(&self) -> f64 {
        self.content_scale
    }

    pub fn set_user_physics(&mut self, physics: PhysicsConfig) {
        self.user_physics = physics;
    }

    /// Change the neutral scale. Retargets only while no zoom is active.
    pub fn set_content_scale(&mut self, content_scale: f64) {
        self.content_scale = sanitize_scale(content_scale);
        if self.active.is_none() {
            self.apply_target(self.neutral_target());
        }
    }

    /// Change the stage size and recompute the current zoom target.
    pub fn set_stage(&mut self, stage: Size, active: Option<&ZoomEvent>) {
        self.stage = stage;
        self.active = None;
        self.sync(active);
    }

    /// Report the zoom active at the current playback time.
    ///
    /// The target is recomputed only when the active zoom changes identity
    /// or focus/scale; otherwise the springs keep chasing the existing
    /// target. Returns whether a retarget happened.
    pub fn sync(&mut self, active: Option<&ZoomEvent>) -> bool {
        let next = active.map(ActiveZoom::of);
        if next == self.active && !(next.is_none() && self.neutral_drifted()) {
            return false;
        }

        let target = match active {
            Some(zoom) => compute_zoom_target(zoom, self.stage),
            None => self.neutral_target(),
        };
        tracing::debug!(
            zoom = ?next.map(|a| a.id),
            translate_x = target.translate_x,
            translate_y = target.translate_y,
            scale = target.scale,
            "Camera retargeted"
        );
        self.active = next;
        self.apply_target(target);
        true
    }

    /// Advance all axes by `dt` seconds with the shared physics.
    pub fn step(&mut self, dt: f64) {
        let physics = self.physics();
        self.x.step(&physics, dt);
        self.y.step(&physics, dt);
        self.scale.step(&physics, dt);
    }

    /// Run all axes to rest.
    pub fn settle(&mut self) {
        let physics = self.physics();
        self.x.settle(&physics);
        self.y.settle(&physics);
        self.scale.settle(&physics);
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled() && self.scale.is_settled()
    }

    /// Interpolated transform for rendering.
    pub fn current(&self) -> CameraTransform {
        CameraTransform {
            translate_x: self.x.position,
            translate_y: self.y.position,
            scale: self.scale.position,
        }
    }

    pub fn target(&self) -> CameraTransform {
        CameraTransform {
            translate_x: self.x.target,
            translate_y: self.y.target,
            scale: self.scale.target,
        }
    }

    fn neutral_target(&self) -> CameraTransform {
        CameraTransform {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: self.content_scale,
        }
    }

    fn neutral_drifted(&self) -> bool {
        self.target() != self.neutral_target()
    }

    fn apply_target(&mut self, target: CameraTransform) {
        self.x.set_target(target.translate_x);
        self.y.set_target(target.translate_y);
        self.scale.set_target(target.scale);
    }
}

fn sanitize_scale(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
