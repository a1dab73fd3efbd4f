//! Job status handler.

use super::{JOB_NOT_FOUND, parse_job_id};
use crate::api::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /status/:taskId - Poll a job
#[utoipa::path(
    get,
    path = "/status/{taskId}",
    tag = "conversion",
    params(
        ("taskId" = String, Path, description = "Task ID returned by POST /convert")
    ),
    responses(
        (status = 200, description = "Current job view", body = crate::types::JobView),
        (status = 404, description = "Unknown task", body = crate::error::ApiError)
    )
)]
pub async fn get_status(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    let id = match parse_job_id(&task_id, JOB_NOT_FOUND) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.manager.status(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}
