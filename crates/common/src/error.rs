//! Error types shared across Cursor Flow crates.
//!
//! Collaborator failures (capture host, processing service, suggestion
//! service) are translated into one of these kinds at the orchestration
//! boundary before they reach the user.

/// Top-level error type for Cursor Flow operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Capture or camera access was refused. Recoverable; callers treat it
    /// as a silent no-op.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// No capturable surface was found.
    #[error("No capture source available: {message}")]
    SourceUnavailable { message: String },

    /// The capture stream failed mid-session.
    #[error("Recorder fault: {message}")]
    RecorderFault { message: String },

    /// The remote processing job reported failure.
    #[error("Processing failed: {message}")]
    ProcessingFailed { message: String },

    /// A timeline edit was requested at a degenerate point.
    #[error("Invalid edit: {message}")]
    InvalidEdit { message: String },

    /// A recording session is already running.
    #[error("Already active: {message}")]
    AlreadyActive { message: String },

    /// Transport-level failure while talking to an external service.
    #[error("Service error: {message}")]
    Service { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FlowError.
pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
        }
    }

    pub fn recorder_fault(msg: impl Into<String>) -> Self {
        Self::RecorderFault {
            message: msg.into(),
        }
    }

    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            message: msg.into(),
        }
    }

    pub fn invalid_edit(msg: impl Into<String>) -> Self {
        Self::InvalidEdit {
            message: msg.into(),
        }
    }

    pub fn already_active(msg: impl Into<String>) -> Self {
        Self::AlreadyActive {
            message: msg.into(),
        }
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Kinds that must not be reported to the user as failures.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. } | Self::InvalidEdit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_kinds() {
        assert!(FlowError::permission_denied("screen").is_silent());
        assert!(FlowError::invalid_edit("split at boundary").is_silent());
        assert!(!FlowError::recorder_fault("track ended").is_silent());
        assert!(!FlowError::processing_failed("ffmpeg exited 1").is_silent());
    }

    #[test]
    fn test_display_carries_service_message() {
        let err = FlowError::processing_failed("codec not found");
        assert_eq!(err.to_string(), "Processing failed: codec not found");
    }
}
