//! Capture host abstraction.
//!
//! The host owns the real capture surfaces: it lists what can be recorded,
//! hands out media streams, and optionally reports raw pointer positions.
//! Everything platform-specific lives behind these traits.

use std::time::Instant;

use cursorflow_common::FlowResult;
use cursorflow_project_model::{Bounds, MediaSource};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

/// Kinds of surface a host may offer for capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Screen,
    Window,
    Tab,
}

/// A capturable surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSource {
    pub id: String,
    pub name: String,
    pub kind: SourceKind,
}

/// Requested stream settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConstraints {
    pub fps: u32,
    /// Draw the system cursor into the media. Off when the processing
    /// service renders its own cursor from pointer samples.
    pub include_cursor: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            fps: 60,
            include_cursor: false,
        }
    }
}

/// Encoded media produced by a finished stream.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedMedia {
    /// Handle the editor can play back from.
    pub source: MediaSource,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub native_size: Option<(u32, u32)>,
    pub duration_secs: f64,
}

/// A raw pointer position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerSample {
    pub x: f64,
    pub y: f64,
    pub at: Instant,
}

/// One acquired capture stream.
#[async_trait::async_trait]
pub trait MediaStream: Send {
    /// Begin writing media.
    async fn start(&mut self) -> FlowResult<()>;

    /// Stop writing and return the encoded media.
    async fn stop(&mut self) -> FlowResult<CapturedMedia>;

    /// Release the underlying surface. Safe to call more than once.
    fn release(&mut self);

    /// Fault channel. Holds `Some(message)` once the stream has errored.
    fn faults(&self) -> watch::Receiver<Option<String>>;
}

/// Platform capture collaborator.
#[async_trait::async_trait]
pub trait CaptureHost: Send + Sync {
    /// Sources of the given kinds the user may pick from.
    async fn list_capture_sources(&self, kinds: &[SourceKind]) -> FlowResult<Vec<CaptureSource>>;

    /// Acquire a stream for `source`. A refused grant is
    /// [`cursorflow_common::FlowError::PermissionDenied`].
    async fn acquire_stream(
        &self,
        source: &CaptureSource,
        constraints: &StreamConstraints,
    ) -> FlowResult<Box<dyn MediaStream>>;

    /// Whether this host can report pointer positions.
    fn supports_pointer_tracking(&self) -> bool {
        false
    }

    /// Start reporting raw pointer positions. The channel closes when
    /// tracking stops.
    async fn start_pointer_tracking(&self) -> FlowResult<mpsc::Receiver<RawPointerSample>>;

    async fn stop_pointer_tracking(&self);

    /// Pixel rectangle of the capture surface, used to normalize pointer
    /// samples.
    fn viewport_bounds(&self) -> Bounds;
}
