//! Per-frame editor engine.
//!
//! Owns the timeline, the camera, and the interaction state, and shares
//! playback with whoever else needs to drive it (a recording session).
//! Hosts call [`EditorEngine::frame`] once per animation callback and read
//! the returned [`FrameUpdate`].

use std::time::Instant;

use cursorflow_common::{EditorDefaults, FlowError, FlowResult, FrameClock};
use cursorflow_processing_core::{
    compute_container_size, compute_fitted_size, CameraSimulator, CameraTransform, FittedSize,
    LayoutParams,
};
use cursorflow_project_model::{
    AspectRatio, Clip, ClipId, ClipKind, PhysicsConfig, PhysicsPreset, ProjectState, Size,
    TimelineStore, ZoomId,
};

use crate::interaction::{
    InteractionContext, InteractionOutcome, PointerCapture, PointerEvent, TimelineInteraction,
};
use crate::playback::{PlaybackDriver, SharedPlayback};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub time: f64,
    pub playing: bool,
    pub camera: CameraTransform,
    pub active_zoom: Option<ZoomId>,
    pub active_clip: Option<ClipId>,
}

pub struct EditorEngine {
    timeline: TimelineStore,
    playback: SharedPlayback,
    camera: CameraSimulator,
    /// Runs whether or not playback does, so seeks settle smoothly.
    camera_clock: FrameClock,
    interaction: TimelineInteraction,
    settings: ProjectState,
    defaults: EditorDefaults,
    /// Timeline revision the camera stage was last sized for.
    stage_revision: u64,
}

impl EditorEngine {
    /// Build an engine for a loaded (or fresh) project.
    pub fn new(project: ProjectState, defaults: EditorDefaults) -> Self {
        let timeline = project.to_timeline(defaults.min_timeline_secs);
        let playback = SharedPlayback::new(PlaybackDriver::new(timeline.duration()));
        let mut settings = project;
        settings.zooms.clear();
        settings.clips.clear();

        let mut engine = Self {
            camera: CameraSimulator::new(
                Size::new(defaults.base_width, defaults.base_width * 9.0 / 16.0),
                settings.physics_config,
                settings.content_scale,
            ),
            timeline,
            playback,
            camera_clock: FrameClock::new(),
            interaction: TimelineInteraction::new(defaults.pixels_per_second),
            settings,
            defaults,
            stage_revision: 0,
        };
        engine.refresh_stage();
        engine
    }

    /// Fresh project using the configured default preset.
    pub fn with_defaults(defaults: EditorDefaults) -> Self {
        let preset =
            PhysicsPreset::from_name(&defaults.default_preset).unwrap_or(PhysicsPreset::Smooth);
        let project = ProjectState {
            physics_config: preset.config(),
            preset_name: preset,
            ..Default::default()
        };
        Self::new(project, defaults)
    }

    pub fn timeline(&self) -> &TimelineStore {
        &self.timeline
    }

    /// Mutable timeline access for edits outside pointer interaction.
    pub fn timeline_mut(&mut self) -> &mut TimelineStore {
        &mut self.timeline
    }

    pub fn playback(&self) -> SharedPlayback {
        self.playback.clone()
    }

    pub fn camera(&self) -> &CameraSimulator {
        &self.camera
    }

    pub fn interaction(&self) -> &TimelineInteraction {
        &self.interaction
    }

    pub fn settings(&self) -> &ProjectState {
        &self.settings
    }

    /// Advance playback and the camera to `now`.
    pub fn frame(&mut self, now: Instant) -> FrameUpdate {
        if self.timeline.revision() != self.stage_revision {
            self.refresh_stage();
        }
        let (time, playing) = {
            let mut playback = self.playback.lock();
            playback.set_duration(self.timeline.duration());
            playback.tick(now);
            (playback.current_time(), playback.is_playing())
        };

        let active_zoom = self.timeline.active_zoom_at(time);
        self.camera.sync(active_zoom);
        let dt = self.camera_clock.tick(now);
        self.camera.step(dt);

        FrameUpdate {
            time,
            playing,
            camera: self.camera.current(),
            active_zoom: active_zoom.map(|z| z.id),
            active_clip: self.timeline.active_clip_at(time).map(|c| c.id),
        }
    }

    /// Feed a pointer event from the timeline strip.
    pub fn pointer(
        &mut self,
        event: PointerEvent,
        capture: &mut dyn PointerCapture,
    ) -> InteractionOutcome {
        let mut playback = self.playback.lock();
        let mut ctx = InteractionContext {
            timeline: &mut self.timeline,
            playback: &mut *playback,
            capture,
        };
        self.interaction.dispatch(event, &mut ctx)
    }

    pub fn current_time(&self) -> f64 {
        self.playback.lock().current_time()
    }

    pub fn seek(&mut self, time: f64) -> f64 {
        let mut playback = self.playback.lock();
        playback.set_duration(self.timeline.duration());
        playback.seek(time)
    }

    pub fn toggle_playback(&mut self) {
        let mut playback = self.playback.lock();
        playback.set_duration(self.timeline.duration());
        playback.toggle();
    }

    /// Add a default zoom at the playhead.
    pub fn add_zoom_at_playhead(&mut self) -> ZoomId {
        let at = self.current_time();
        self.timeline.add_zoom(at)
    }

    /// Split the clip under the playhead.
    ///
    /// A split too close to a clip edge, or with no clip under the playhead,
    /// is a [`FlowError::InvalidEdit`] and leaves the timeline untouched.
    pub fn split_at_playhead(&mut self) -> FlowResult<ClipId> {
        let at = self.current_time();
        self.timeline
            .split_clip(at)
            .ok_or_else(|| FlowError::invalid_edit(format!("cannot split at {at:.3}s")))
    }

    /// Append a finished recording as a video clip at the end of the clip
    /// track.
    pub fn add_recording(&mut self, clip: Clip) -> ClipId {
        let mut clip = clip;
        clip.start_time = self
            .timeline
            .clips()
            .iter()
            .map(|c| c.end_time())
            .fold(0.0, f64::max);
        let id = self.timeline.add_clip(clip);
        self.refresh_stage();
        id
    }

    pub fn apply_preset(&mut self, preset: PhysicsPreset) {
        self.settings.preset_name = preset;
        self.settings.physics_config = preset.config();
        self.camera.set_user_physics(self.settings.physics_config);
    }

    /// Use hand-tuned physics; the preset becomes `Custom`.
    pub fn set_custom_physics(&mut self, physics: PhysicsConfig) {
        self.settings.preset_name = PhysicsPreset::Custom;
        self.settings.physics_config = physics;
        self.camera.set_user_physics(physics);
    }

    pub fn set_content_scale(&mut self, content_scale: f64) {
        self.settings.content_scale = content_scale;
        self.camera.set_content_scale(content_scale);
        self.refresh_stage();
    }

    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.settings.aspect_ratio = aspect;
        self.refresh_stage();
    }

    pub fn set_show_window_frame(&mut self, show: bool) {
        self.settings.show_window_frame = show;
        self.refresh_stage();
    }

    /// Output container and the fitted content inside it.
    pub fn layout(&self) -> (Size, FittedSize) {
        let params = LayoutParams::new(
            self.defaults.base_width,
            self.defaults.window_header_height,
            self.settings.show_window_frame,
            self.settings.content_scale,
        );
        let native = self.content_native_size();
        let container = compute_container_size(self.settings.aspect_ratio, native, &params);
        let fitted = compute_fitted_size(
            container,
            native.unwrap_or(container),
            params.header_height,
        );
        (container, fitted)
    }

    /// Project snapshot including the current timeline.
    pub fn snapshot(&self) -> ProjectState {
        self.settings.clone().with_timeline(&self.timeline)
    }

    /// Native size of the first video clip that reports one.
    fn content_native_size(&self) -> Option<Size> {
        self.timeline
            .clips()
            .iter()
            .filter(|c| c.kind == ClipKind::Video)
            .find_map(|c| match (c.width, c.height) {
                (Some(w), Some(h)) if w > 0 && h > 0 => Some(Size::new(w as f64, h as f64)),
                _ => None,
            })
    }

    fn refresh_stage(&mut self) {
        self.stage_revision = self.timeline.revision();
        let (_, fitted) = self.layout();
        let stage = Size::new(fitted.width, fitted.content_height);
        if stage != self.camera.stage() {
            let time = self.current_time();
            let active = self.timeline.active_zoom_at(time);
            self.camera.set_stage(stage, active);
        }
    }
}
