//! Export job pipeline: submit, poll, download, clean up.

use std::sync::Arc;
use std::time::Duration;

use cursorflow_capture_engine::{CaptureArtifact, CapturedMedia};
use cursorflow_common::{FlowError, FlowResult, ServiceConfig};
use cursorflow_project_model::PointerSample;

use crate::job::{JobId, JobState, JobStatus};
use crate::options::ExportOptions;
use crate::service::VideoProcessingService;

/// Progress callback for exports.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    /// Service-side progress [0.0, 1.0].
    pub progress: f64,

    pub stage: ExportStage,
}

/// Stages of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    /// Recovering the pointer track from the video.
    Detecting,
    Submitting,
    Processing,
    Downloading,
    Complete,
    Failed,
}

/// A processed video.
#[derive(Debug, Clone)]
pub struct ExportedVideo {
    pub job_id: JobId,
    pub data: Vec<u8>,
}

pub struct ExportPipeline {
    service: Arc<dyn VideoProcessingService>,
    poll_interval: Duration,
    max_polls: u32,
}

impl ExportPipeline {
    pub fn new(service: Arc<dyn VideoProcessingService>, poll_interval: Duration, max_polls: u32) -> Self {
        Self {
            service,
            poll_interval,
            max_polls: max_polls.max(1),
        }
    }

    pub fn from_config(service: Arc<dyn VideoProcessingService>, config: &ServiceConfig) -> Self {
        Self::new(
            service,
            Duration::from_millis(config.poll_interval_ms),
            config.max_polls,
        )
    }

    /// Export a finished recording with its pointer samples.
    pub async fn export_capture(
        &self,
        artifact: &CaptureArtifact,
        options: &ExportOptions,
        progress: Option<&ProgressCallback>,
    ) -> FlowResult<ExportedVideo> {
        self.export(&artifact.media, &artifact.pointer_samples, options, progress)
            .await
    }

    /// Run a full export job.
    ///
    /// Without pointer samples the service first detects the cursor in the
    /// video and that track is exported instead. Every job is cleaned up on
    /// the service whether it succeeds or fails once it has been submitted.
    pub async fn export(
        &self,
        media: &CapturedMedia,
        samples: &[PointerSample],
        options: &ExportOptions,
        progress: Option<&ProgressCallback>,
    ) -> FlowResult<ExportedVideo> {
        options.validate()?;

        let detected;
        let samples = if samples.is_empty() {
            detected = match self.detect_pointer_track(media, progress).await {
                Ok(track) => track,
                Err(e) => {
                    tracing::error!(error = %e, "Cursor detection failed");
                    report(progress, ExportStage::Failed, 0.0);
                    return Err(e);
                }
            };
            detected.as_slice()
        } else {
            samples
        };

        tracing::info!(
            samples = samples.len(),
            style = %options.cursor_style,
            quality = %options.quality,
            "Starting export"
        );
        report(progress, ExportStage::Submitting, 0.0);

        let job_id = match self.service.submit(media, samples, options).await {
            Ok(job_id) => job_id,
            Err(e) => {
                tracing::error!(error = %e, "Export submit failed");
                report(progress, ExportStage::Failed, 0.0);
                return Err(e);
            }
        };

        let result = self.await_and_download(&job_id, progress).await;

        if let Err(e) = self.service.cleanup(&job_id).await {
            tracing::warn!(job_id = %job_id, error = %e, "Failed to clean up export job");
        }

        match result {
            Ok(data) => {
                tracing::info!(job_id = %job_id, bytes = data.len(), "Export complete");
                report(progress, ExportStage::Complete, 1.0);
                Ok(ExportedVideo { job_id, data })
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Export failed");
                report(progress, ExportStage::Failed, 0.0);
                Err(e)
            }
        }
    }

    /// Recover a pointer track from the video itself.
    async fn detect_pointer_track(
        &self,
        media: &CapturedMedia,
        progress: Option<&ProgressCallback>,
    ) -> FlowResult<Vec<PointerSample>> {
        tracing::info!("No pointer samples collected, detecting the cursor in the video");
        report(progress, ExportStage::Detecting, 0.0);

        let job_id = self.service.detect(media).await?;
        let result = self.poll_until_done(&job_id, progress).await;
        if let Err(e) = self.service.cleanup(&job_id).await {
            tracing::warn!(job_id = %job_id, error = %e, "Failed to clean up detection job");
        }

        match result?.cursor_data {
            Some(track) if !track.is_empty() => {
                tracing::info!(job_id = %job_id, samples = track.len(), "Cursor detected");
                Ok(track)
            }
            _ => Err(FlowError::processing_failed("No cursor found in the video")),
        }
    }

    async fn await_and_download(
        &self,
        job_id: &JobId,
        progress: Option<&ProgressCallback>,
    ) -> FlowResult<Vec<u8>> {
        self.poll_until_done(job_id, progress).await?;
        report(progress, ExportStage::Downloading, 1.0);
        self.service.download(job_id).await
    }

    /// Poll until the job completes. Returns the completed state.
    async fn poll_until_done(
        &self,
        job_id: &JobId,
        progress: Option<&ProgressCallback>,
    ) -> FlowResult<JobState> {
        for attempt in 0..self.max_polls {
            let state = self.service.status(job_id).await?;
            let stage = match state.status {
                JobStatus::Completed => return Ok(state),
                JobStatus::Failed => {
                    let message = state
                        .error
                        .unwrap_or_else(|| "Processing failed".to_string());
                    return Err(FlowError::processing_failed(message));
                }
                JobStatus::Processing => ExportStage::Processing,
                JobStatus::Detecting => ExportStage::Detecting,
            };
            tracing::debug!(job_id = %job_id, attempt, progress = state.progress, ?stage, "Job running");
            report(progress, stage, state.fraction());
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(FlowError::processing_failed("timed out"))
    }
}

fn report(callback: Option<&ProgressCallback>, stage: ExportStage, progress: f64) {
    if let Some(cb) = callback {
        cb(ExportProgress { progress, stage });
    }
}
