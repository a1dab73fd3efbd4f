//! HTTP error response handling for the API
//!
//! Converts domain errors into HTTP responses with a status code and a JSON
//! error body.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArtifactError, JobError};
    use crate::types::JobId;

    async fn body_of(response: Response) -> ApiError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn job_not_found_is_404_with_task_id() {
        let id = JobId::new();
        let response = Error::Job(JobError::NotFound { id }).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let api_error = body_of(response).await;
        assert_eq!(api_error.error.code, "job_not_found");
        assert_eq!(
            api_error.error.details.unwrap()["task_id"],
            id.to_string()
        );
    }

    #[tokio::test]
    async fn expired_file_is_404() {
        let response = Error::Artifact(ArtifactError::Expired { id: JobId::new() }).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error.code, "file_expired");
    }

    #[tokio::test]
    async fn invalid_input_is_400_and_keeps_its_message() {
        let response = Error::InvalidInput("a source URL is required".into()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let api_error = body_of(response).await;
        assert_eq!(api_error.error.code, "invalid_input");
        assert!(api_error.error.message.contains("source URL is required"));
    }

    #[tokio::test]
    async fn server_errors_use_a_generic_message() {
        let response = Error::Other("disk layout leaked".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let api_error = body_of(response).await;
        assert_eq!(api_error.error.message, "internal server error");
    }

    #[tokio::test]
    async fn shutting_down_is_503() {
        let response = Error::ShuttingDown.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
