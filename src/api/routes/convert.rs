//! Job submission handler.

use crate::api::AppState;
use crate::error::Error;
use crate::store::{download_url, status_url};
use crate::types::JobId;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of POST /convert
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Video URL to extract audio from (`youtubeUrl` accepted as an alias)
    #[serde(alias = "youtubeUrl")]
    pub source_url: Option<String>,
}

/// Response of POST /convert
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Always true on 200
    pub success: bool,
    /// Human-readable confirmation
    pub message: String,
    /// Identifier to poll
    pub task_id: JobId,
    /// Relative status URL for this job
    pub status_url: String,
    /// Relative URL the file will be served from once completed
    pub download_url: String,
}

/// POST /convert - Submit a conversion job
#[utoipa::path(
    post,
    path = "/convert",
    tag = "conversion",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Job accepted", body = ConvertResponse),
        (status = 400, description = "Missing or invalid source URL", body = crate::error::ApiError),
        (status = 503, description = "Service is shutting down", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Error::InvalidInput(rejection.body_text()).into_response();
        }
    };

    let source_url = request.source_url.unwrap_or_default();
    match state.manager.submit(&source_url).await {
        Ok(task_id) => (
            StatusCode::OK,
            Json(ConvertResponse {
                success: true,
                message: "Conversion started. Poll statusUrl until the job completes.".to_string(),
                task_id,
                status_url: status_url(task_id),
                download_url: download_url(task_id),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
