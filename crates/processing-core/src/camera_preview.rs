//! Headless camera sampling.
//!
//! Runs the camera simulator over a timeline at a fixed frame rate so
//! exporters and tests get a deterministic transform per frame without a
//! render loop.

use cursorflow_project_model::{PhysicsConfig, Size, TimelineStore};
use serde::Serialize;

use crate::camera::{CameraSimulator, CameraTransform};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraMotionFrame {
    pub time_secs: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl CameraMotionFrame {
    pub fn transform(&self) -> CameraTransform {
        CameraTransform {
            translate_x: self.translate_x,
            translate_y: self.translate_y,
            scale: self.scale,
        }
    }

    pub fn css_transform(&self) -> String {
        self.transform().css_transform()
    }
}

/// Simulate frame-by-frame camera transforms over the whole timeline.
///
/// Playback time and the simulator advance with the same fixed step of
/// `1 / sample_rate_fps`. The first frame is the resting neutral framing.
pub fn simulate_camera_motion(
    timeline: &TimelineStore,
    stage: Size,
    physics: PhysicsConfig,
    content_scale: f64,
    sample_rate_fps: f64,
) -> Vec<CameraMotionFrame> {
    let sample_rate_fps = sample_rate_fps.max(1.0);
    let step = 1.0 / sample_rate_fps;
    let duration_secs = timeline.duration();
    let frame_count = (duration_secs * sample_rate_fps).floor() as usize + 1;

    let mut camera = CameraSimulator::new(stage, physics, content_scale);
    let mut frames = Vec::with_capacity(frame_count);

    for index in 0..frame_count {
        let t = index as f64 * step;
        if index > 0 {
            camera.step(step);
        }
        camera.sync(timeline.active_zoom_at(t));

        let current = camera.current();
        frames.push(CameraMotionFrame {
            time_secs: t,
            translate_x: current.translate_x,
            translate_y: current.translate_y,
            scale: current.scale,
        });
    }

    frames
}
