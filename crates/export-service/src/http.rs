//! HTTP client for the video processing service.

use std::time::Duration;

use cursorflow_capture_engine::CapturedMedia;
use cursorflow_common::{FlowError, FlowResult, ServiceConfig};
use cursorflow_project_model::{serialize_samples, PointerSample};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::job::{JobId, JobState, SubmitResponse};
use crate::options::{CursorStyleInfo, ExportOptions};
use crate::service::VideoProcessingService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct HttpProcessingClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProcessingClient {
    pub fn new(base_url: impl Into<String>) -> FlowResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| FlowError::service(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> FlowResult<Self> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn video_part(media: &CapturedMedia) -> FlowResult<Part> {
        Part::bytes(media.data.clone())
            .file_name(media.file_name.clone())
            .mime_str(&media.mime_type)
            .map_err(|err| FlowError::service(format!("Invalid media type: {err}")))
    }

    fn build_form(
        media: &CapturedMedia,
        samples: &[PointerSample],
        options: &ExportOptions,
    ) -> FlowResult<Form> {
        let mut form = Form::new()
            .part("video", Self::video_part(media)?)
            .text("cursor_data", serialize_samples(samples)?);
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

#[derive(Debug, Deserialize)]
struct CursorStylesResponse {
    styles: Vec<CursorStyleInfo>,
}

/// Pull the service's `detail` message out of an error body.
fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|payload| {
            payload
                .get("detail")
                .and_then(|value| value.as_str())
                .map(|value| value.to_string())
        })
        .unwrap_or_else(|| format!("{status}: {body}"))
}

async fn check(response: reqwest::Response, what: &str) -> FlowResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(FlowError::service(format!(
        "{what} rejected: {}",
        error_detail(status, &body)
    )))
}

#[async_trait::async_trait]
impl VideoProcessingService for HttpProcessingClient {
    async fn submit(
        &self,
        media: &CapturedMedia,
        samples: &[PointerSample],
        options: &ExportOptions,
    ) -> FlowResult<JobId> {
        let form = Self::build_form(media, samples, options)?;
        let response = self
            .client
            .post(self.url("/api/process"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| FlowError::service(format!("Failed to submit video: {err}")))?;
        let payload: SubmitResponse = check(response, "Submit")
            .await?
            .json()
            .await
            .map_err(|err| FlowError::service(format!("Failed to parse submit response: {err}")))?;

        tracing::info!(job_id = %payload.job_id, bytes = media.data.len(), "Submitted export job");
        Ok(JobId::new(payload.job_id))
    }

    async fn detect(&self, media: &CapturedMedia) -> FlowResult<JobId> {
        let form = Form::new().part("video", Self::video_part(media)?);
        let response = self
            .client
            .post(self.url("/api/detect"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| FlowError::service(format!("Failed to submit detection: {err}")))?;
        let payload: SubmitResponse = check(response, "Detection")
            .await?
            .json()
            .await
            .map_err(|err| {
                FlowError::service(format!("Failed to parse detection response: {err}"))
            })?;

        tracing::info!(job_id = %payload.job_id, bytes = media.data.len(), "Submitted detection job");
        Ok(JobId::new(payload.job_id))
    }

    async fn status(&self, job: &JobId) -> FlowResult<JobState> {
        let response = self
            .client
            .get(self.url(&format!("/api/status/{job}")))
            .send()
            .await
            .map_err(|err| FlowError::service(format!("Failed to query job status: {err}")))?;
        check(response, "Status query")
            .await?
            .json()
            .await
            .map_err(|err| FlowError::service(format!("Failed to parse job status: {err}")))
    }

    async fn download(&self, job: &JobId) -> FlowResult<Vec<u8>> {
        let response = self
            .client
            .get(self.url(&format!("/api/download/{job}")))
            .send()
            .await
            .map_err(|err| FlowError::service(format!("Failed to download video: {err}")))?;
        check(response, "Download")
            .await?
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|err| FlowError::service(format!("Failed to read video bytes: {err}")))
    }

    async fn cleanup(&self, job: &JobId) -> FlowResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/cleanup/{job}")))
            .send()
            .await
            .map_err(|err| FlowError::service(format!("Failed to clean up job: {err}")))?;
        check(response, "Cleanup").await?;
        Ok(())
    }

    async fn cursor_styles(&self) -> FlowResult<Vec<CursorStyleInfo>> {
        let response = self
            .client
            .get(self.url("/api/cursor-styles"))
            .send()
            .await
            .map_err(|err| FlowError::service(format!("Failed to list cursor styles: {err}")))?;
        let payload: CursorStylesResponse = check(response, "Cursor style listing")
            .await?
            .json()
            .await
            .map_err(|err| FlowError::service(format!("Failed to parse cursor styles: {err}")))?;
        Ok(payload.styles)
    }

    async fn health(&self) -> FlowResult<bool> {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(err) if err.is_connect() || err.is_timeout() => {
                tracing::debug!(error = %err, "Processing service unreachable");
                Ok(false)
            }
            Err(err) => Err(FlowError::service(format!("Health check failed: {err}"))),
        }
    }
}
