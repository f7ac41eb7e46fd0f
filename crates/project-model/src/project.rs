//! The persisted editor snapshot.
//!
//! A project file is a single JSON document holding the editor's visual
//! settings and the full timeline. Clips whose media lives only in the
//! editing process are written without a source.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::physics::{PhysicsConfig, PhysicsPreset};
use crate::timeline::TimelineStore;
use crate::zoom::ZoomEvent;

/// Output frame aspect policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Follow the content's native aspect.
    #[default]
    Auto,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Classic4x3,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 6] = [
        AspectRatio::Auto,
        AspectRatio::Landscape16x9,
        AspectRatio::Portrait9x16,
        AspectRatio::Square,
        AspectRatio::Classic4x3,
        AspectRatio::Ultrawide21x9,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Auto => "Auto",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic4x3 => "4:3",
            AspectRatio::Ultrawide21x9 => "21:9",
        }
    }

    /// Parse a label such as `"16:9"` or `"auto"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(label))
    }
}

/// Snapshot of everything the editor persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectState {
    pub physics_config: PhysicsConfig,
    pub preset_name: PhysicsPreset,
    pub blur_enabled: bool,
    /// Backdrop color or wallpaper reference.
    pub background: String,
    /// Backdrop blur radius in pixels.
    pub background_blur: f64,
    pub show_camera: bool,
    /// Content magnification inside the frame, `> 0`.
    pub content_scale: f64,
    /// Corner radius of the content card in pixels.
    pub border_radius: f64,
    pub aspect_ratio: AspectRatio,
    pub show_window_frame: bool,
    pub show_keystrokes: bool,
    pub zooms: Vec<ZoomEvent>,
    pub clips: Vec<Clip>,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            physics_config: PhysicsPreset::Smooth.config(),
            preset_name: PhysicsPreset::Smooth,
            blur_enabled: false,
            background: "#1e1e2e".to_string(),
            background_blur: 0.0,
            show_camera: false,
            content_scale: 1.0,
            border_radius: 12.0,
            aspect_ratio: AspectRatio::Auto,
            show_window_frame: true,
            show_keystrokes: false,
            zooms: Vec::new(),
            clips: Vec::new(),
        }
    }
}

impl ProjectState {
    /// Capture the timeline's current contents into this snapshot.
    pub fn with_timeline(mut self, timeline: &TimelineStore) -> Self {
        self.zooms = timeline.zooms().to_vec();
        self.clips = timeline.clips().to_vec();
        self
    }

    /// Build a timeline store holding this snapshot's items.
    pub fn to_timeline(&self, min_duration: f64) -> TimelineStore {
        TimelineStore::with_items(min_duration, self.zooms.clone(), self.clips.clone())
    }

    /// Copy suitable for writing to disk: transient clip sources dropped.
    pub fn to_persisted(&self) -> Self {
        let mut state = self.clone();
        state.clips = self.clips.iter().map(Clip::persisted).collect();
        state
    }

    /// Reject values the editor cannot render.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if !(self.content_scale.is_finite() && self.content_scale > 0.0) {
            return Err(ProjectError::ValidationError {
                message: format!("contentScale must be positive, got {}", self.content_scale),
            });
        }
        if !self.physics_config.is_valid() {
            return Err(ProjectError::ValidationError {
                message: "physicsConfig values must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_persisted())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a project file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let state = Self::from_json(&json).map_err(|e| ProjectError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        state.validate()?;
        tracing::debug!(
            path = %path.display(),
            zooms = state.zooms.len(),
            clips = state.clips.len(),
            "Loaded project"
        );
        Ok(state)
    }

    /// Write the persisted form of this snapshot.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = self.to_json().map_err(|e| ProjectError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ProjectError::IoError { path, source: e })
    }
}

/// Errors when loading or saving a project.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
