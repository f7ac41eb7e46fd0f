//! Clips on the single editing track.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::zoom::{finite_or, non_negative, MIN_ITEM_DURATION};

/// Duration given to new title cards (seconds).
pub const DEFAULT_TITLE_DURATION: f64 = 3.0;

/// URI schemes that only live as long as the editing process.
const TRANSIENT_SCHEMES: [&str; 2] = ["blob:", "mem:"];

/// Stable identity of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Clip discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Video,
    Title,
}

/// Reference to the media backing a video clip.
///
/// In-process handles (`blob:`, `mem:`) are transient and never persisted;
/// anything else (file paths, http URLs) is durable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSource(pub String);

impl MediaSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_transient(&self) -> bool {
        TRANSIENT_SCHEMES
            .iter()
            .any(|scheme| self.0.starts_with(scheme))
    }
}

/// Visual style of a title card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleStyle {
    pub font_size: f64,
    pub font_weight: u16,
    /// Text color as hex string.
    pub color: String,
    /// Card background as hex string.
    pub background: String,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            font_size: 64.0,
            font_weight: 700,
            color: "#ffffff".to_string(),
            background: "#111111".to_string(),
        }
    }
}

/// A video or title segment on the clip track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    pub start_time: f64,
    pub duration: f64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MediaSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_style: Option<TitleStyle>,
}

impl Clip {
    /// A video clip backed by `source`.
    pub fn video(
        name: impl Into<String>,
        source: MediaSource,
        start_time: f64,
        duration: f64,
        native_size: Option<(u32, u32)>,
    ) -> Self {
        Self {
            id: ClipId::new(),
            start_time,
            duration,
            name: name.into(),
            kind: ClipKind::Video,
            source: Some(source),
            width: native_size.map(|(w, _)| w),
            height: native_size.map(|(_, h)| h),
            text: None,
            title_style: None,
        }
        .sanitized()
        .at_least_min_duration()
    }

    /// A title card showing `text`.
    pub fn title(text: impl Into<String>, style: TitleStyle, start_time: f64) -> Self {
        let text = text.into();
        Self {
            id: ClipId::new(),
            start_time,
            duration: DEFAULT_TITLE_DURATION,
            name: title_name(&text),
            kind: ClipKind::Title,
            source: None,
            width: None,
            height: None,
            text: Some(text),
            title_style: Some(style),
        }
        .sanitized()
        .at_least_min_duration()
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Repair invalid timing.
    ///
    /// A finite positive duration is kept as is, even below
    /// [`MIN_ITEM_DURATION`]: split tails may be shorter than the edit
    /// minimum and must survive updates and reloads unchanged.
    pub fn sanitized(mut self) -> Self {
        self.start_time = non_negative(self.start_time);
        if !(self.duration.is_finite() && self.duration > 0.0) {
            self.duration = MIN_ITEM_DURATION;
        }
        self
    }

    /// Raise the duration to the edit minimum.
    pub(crate) fn at_least_min_duration(mut self) -> Self {
        self.duration = self.duration.max(MIN_ITEM_DURATION);
        self
    }

    /// Apply a partial update, keeping the invariants.
    ///
    /// The duration minimum only applies when the patch sets a duration.
    pub fn apply(&mut self, patch: &ClipPatch) {
        if let Some(v) = patch.start_time {
            self.start_time = v;
        }
        if let Some(v) = patch.duration {
            self.duration = finite_or(v, MIN_ITEM_DURATION).max(MIN_ITEM_DURATION);
        }
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref text) = patch.text {
            self.text = Some(text.clone());
        }
        if let Some(ref style) = patch.title_style {
            self.title_style = Some(style.clone());
        }
        *self = self.clone().sanitized();
    }

    /// Copy suitable for persisting: transient media references are dropped.
    pub fn persisted(&self) -> Self {
        let mut clip = self.clone();
        if clip.source.as_ref().is_some_and(MediaSource::is_transient) {
            clip.source = None;
        }
        clip
    }
}

/// Partial update for a clip. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClipPatch {
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub title_style: Option<TitleStyle>,
}

fn title_name(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return "Title".to_string();
    }
    let mut name: String = first_line.chars().take(24).collect();
    if first_line.chars().count() > 24 {
        name.push('…');
    }
    name
}
