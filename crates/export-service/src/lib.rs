//! Cursor Flow Export Service
//!
//! A finished recording is exported by a remote video processing service
//! that redraws the cursor from the collected pointer samples. This crate
//! holds the export options, the service seam with its HTTP client, and
//! the submit/poll/download/cleanup job pipeline.

pub mod http;
pub mod job;
pub mod options;
pub mod pipeline;
pub mod service;

pub use http::HttpProcessingClient;
pub use job::{JobId, JobState, JobStatus};
pub use options::{
    CursorColor, CursorStyle, CursorStyleInfo, EncoderSettings, ExportOptions, Quality,
};
pub use pipeline::{ExportPipeline, ExportProgress, ExportStage, ExportedVideo, ProgressCallback};
pub use service::VideoProcessingService;
