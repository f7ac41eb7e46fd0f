//! Processing job identity and status.

use std::fmt;

use cursorflow_project_model::PointerSample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    /// A cursor detection job is running.
    Detecting,
    Completed,
    Failed,
}

/// Status report for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub status: JobStatus,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Pointer track found by a finished detection job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_data: Option<Vec<PointerSample>>,
}

impl JobState {
    pub fn processing(progress: u8) -> Self {
        Self {
            status: JobStatus::Processing,
            progress: progress.min(100),
            error: None,
            cursor_data: None,
        }
    }

    pub fn detecting(progress: u8) -> Self {
        Self {
            status: JobStatus::Detecting,
            ..Self::processing(progress)
        }
    }

    pub fn completed() -> Self {
        Self {
            status: JobStatus::Completed,
            progress: 100,
            error: None,
            cursor_data: None,
        }
    }

    /// A finished detection job carrying its pointer track.
    pub fn detected(samples: Vec<PointerSample>) -> Self {
        Self {
            cursor_data: Some(samples),
            ..Self::completed()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            progress: 0,
            error: Some(error.into()),
            cursor_data: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }

    /// Progress as a fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        f64::from(self.progress.min(100)) / 100.0
    }
}

/// Body of a successful submit or detect.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    pub job_id: String,
}
