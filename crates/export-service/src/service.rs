//! Video processing service abstraction.

use cursorflow_capture_engine::CapturedMedia;
use cursorflow_common::FlowResult;
use cursorflow_project_model::PointerSample;

use crate::job::{JobId, JobState};
use crate::options::{CursorStyleInfo, ExportOptions};

/// Remote service that burns a cursor into a recording.
#[async_trait::async_trait]
pub trait VideoProcessingService: Send + Sync {
    /// Upload a recording and start a job.
    async fn submit(
        &self,
        media: &CapturedMedia,
        samples: &[PointerSample],
        options: &ExportOptions,
    ) -> FlowResult<JobId>;

    /// Upload a recording that has no pointer track and start a cursor
    /// detection job. The completed job's state carries the detected track.
    async fn detect(&self, media: &CapturedMedia) -> FlowResult<JobId>;

    async fn status(&self, job: &JobId) -> FlowResult<JobState>;

    /// Fetch the processed video of a completed job.
    async fn download(&self, job: &JobId) -> FlowResult<Vec<u8>>;

    /// Remove the job's files from the service.
    async fn cleanup(&self, job: &JobId) -> FlowResult<()>;

    /// Cursor styles the service can draw.
    async fn cursor_styles(&self) -> FlowResult<Vec<CursorStyleInfo>>;

    /// Whether the service is reachable.
    async fn health(&self) -> FlowResult<bool>;
}
