//! Error types for audiograb
//!
//! This module provides the error taxonomy for the service:
//! - Domain-specific error types (pipeline, artifact, job)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use crate::types::JobId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for audiograb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for audiograb
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "storage.temp_dir")
        key: Option<String>,
    },

    /// Submission rejected because the source URL is missing or malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Job lookup or state error
    #[error("job error: {0}")]
    Job(#[from] JobError),

    /// Background pipeline error (retrieval, locate, transcode)
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Artifact access error
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External tool execution failed (yt-dlp, ffmpeg)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// External tool did not finish within its time budget
    #[error("{tool} timed out after {}s", timeout.as_secs())]
    Timeout {
        /// Name of the tool that was running
        tool: String,
        /// The budget that was exceeded
        timeout: Duration,
    },

    /// Operation not supported (missing binary)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Job store errors
#[derive(Debug, Error)]
pub enum JobError {
    /// No job record with this id
    #[error("job {id} not found")]
    NotFound {
        /// The job ID that was not found
        id: JobId,
    },

    /// Attempted to leave a terminal state or set the title twice
    #[error("job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The job ID
        id: JobId,
        /// Current state
        from: String,
        /// Requested state
        to: String,
    },
}

/// Errors raised inside a job's background pipeline.
///
/// These never reach an HTTP caller directly; they are recorded on the job.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No video identifier could be extracted from the source URL
    #[error("could not extract a video id from {url}")]
    InvalidSource {
        /// The offending source URL
        url: String,
    },

    /// Every retrieval strategy failed
    #[error("all {attempts} retrieval strategies failed; last error: {reason}")]
    RetrievalFailed {
        /// Number of strategies attempted
        attempts: usize,
        /// The last strategy's failure reason
        reason: String,
    },

    /// The chain reported success but no output file was found
    #[error("downloaded file not found after retrieval")]
    OutputMissing {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// Transcoding to the target format failed
    #[error("transcoding {} failed: {reason}", file_label(input))]
    TranscodeFailed {
        /// Input media file
        input: PathBuf,
        /// Reason reported by the transcoder
        reason: String,
    },
}

/// File name only; job errors are shown to clients and must not expose
/// server paths
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "media".to_string())
}

/// Artifact store errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Unknown artifact
    #[error("file {id} not found")]
    NotFound {
        /// The job ID that was looked up
        id: JobId,
    },

    /// The retention window has elapsed
    #[error("file {id} has expired")]
    Expired {
        /// The job ID whose artifact expired
        id: JobId,
    },

    /// A record exists but its backing file is gone
    #[error("file {id} is no longer available")]
    FileMissing {
        /// The job ID whose file is missing
        id: JobId,
    },
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "invalid_input",
///     "message": "invalid input: a source URL is required"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "invalid_input")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::Config { .. } => 400,

            Error::Job(JobError::NotFound { .. }) => 404,
            Error::Artifact(_) => 404,

            Error::Job(JobError::InvalidTransition { .. }) => 409,

            Error::Pipeline(_) => 422,

            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,

            Error::ExternalTool(_) => 502,
            Error::Timeout { .. } => 504,

            Error::NotSupported(_) => 501,
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::Job(e) => match e {
                JobError::NotFound { .. } => "job_not_found",
                JobError::InvalidTransition { .. } => "invalid_transition",
            },
            Error::Pipeline(e) => match e {
                PipelineError::InvalidSource { .. } => "invalid_source",
                PipelineError::RetrievalFailed { .. } => "retrieval_failed",
                PipelineError::OutputMissing { .. } => "output_missing",
                PipelineError::TranscodeFailed { .. } => "transcode_failed",
            },
            Error::Artifact(e) => match e {
                ArtifactError::NotFound { .. } => "file_not_found",
                ArtifactError::Expired { .. } => "file_expired",
                ArtifactError::FileMissing { .. } => "file_missing",
            },
            Error::Io(_) => "io_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::Timeout { .. } => "timeout",
            Error::NotSupported(_) => "not_supported",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();

        // Server-side failures may carry paths or tool output; keep those in the logs.
        if error.status_code() >= 500 {
            return ApiError::new(code, "internal server error");
        }

        let details = match &error {
            Error::Job(JobError::NotFound { id })
            | Error::Artifact(ArtifactError::NotFound { id })
            | Error::Artifact(ArtifactError::Expired { id })
            | Error::Artifact(ArtifactError::FileMissing { id }) => Some(serde_json::json!({
                "task_id": id,
            })),
            Error::Job(JobError::InvalidTransition { id, from, to }) => Some(serde_json::json!({
                "task_id": id,
                "from": from,
                "to": to,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message: error.to_string(),
                details,
            },
        }
    }
}
