//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`convert`] - Job submission
//! - [`status`] - Job status polling
//! - [`download`] - Streaming finished files
//! - [`system`] - Liveness, events, OpenAPI

use crate::error::ApiError;
use crate::types::JobId;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

mod convert;
mod download;
mod status;
mod system;

pub use convert::*;
pub use download::*;
pub use status::*;
pub use system::*;

/// Parse a path id; anything that is not a UUID cannot name a job
fn parse_job_id(raw: &str, not_found_code: &str) -> Result<JobId, Response> {
    raw.parse::<JobId>().map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(not_found_code, format!("{raw} not found"))),
        )
            .into_response()
    })
}

/// Error code used for unknown task ids on status lookups
const JOB_NOT_FOUND: &str = "job_not_found";

/// Error code used for unknown file ids on downloads
const FILE_NOT_FOUND: &str = "file_not_found";

