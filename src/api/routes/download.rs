//! File download handler.

use super::{FILE_NOT_FOUND, parse_job_id};
use crate::api::AppState;
use crate::error::{ArtifactError, Error};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /download/:fileId - Stream a finished MP3
#[utoipa::path(
    get,
    path = "/download/{fileId}",
    tag = "conversion",
    params(
        ("fileId" = String, Path, description = "Task ID of a completed job")
    ),
    responses(
        (status = 200, description = "The MP3 file", content_type = "audio/mpeg"),
        (status = 404, description = "Unknown, expired or missing file", body = crate::error::ApiError)
    )
)]
pub async fn download(State(state): State<AppState>, Path(file_id): Path<String>) -> Response {
    let id = match parse_job_id(&file_id, FILE_NOT_FOUND) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let artifact = match state.manager.resolve_download(id).await {
        Ok(artifact) => artifact,
        Err(e) => return e.into_response(),
    };

    // The sweeper may delete the file between resolve and open
    let file = match tokio::fs::File::open(&artifact.storage_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Error::Artifact(ArtifactError::FileMissing { id }).into_response();
        }
        Err(e) => return Error::Io(e).into_response(),
    };
    let length = file.metadata().await.ok().map(|m| m.len());

    tracing::info!(job_id = %id, filename = %artifact.download_filename, "serving download");

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.download_filename),
        );
    if let Some(length) = length {
        response = response.header(header::CONTENT_LENGTH, length);
    }

    match response.body(Body::from_stream(ReaderStream::new(file))) {
        Ok(response) => response,
        Err(e) => Error::Other(format!("failed to build download response: {e}")).into_response(),
    }
}
