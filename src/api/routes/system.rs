//! System handlers: liveness, OpenAPI, events.

use crate::api::AppState;
use crate::types::{Capabilities, Event};
use axum::{
    Json,
    extract::State,
    response::{
        IntoResponse,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use utoipa::ToSchema;

/// Liveness probe payload
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceStatus {
    /// Always "online"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable summary
    pub message: String,
    /// Tools found at startup
    pub capabilities: Capabilities,
}

/// GET /status - Liveness and version
#[utoipa::path(
    get,
    path = "/status",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = ServiceStatus)
    )
)]
pub async fn service_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceStatus {
        status: "online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "audiograb is running".to_string(),
        capabilities: state.manager.capabilities(),
    })
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}

/// SSE event name for a job event
fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Queued { .. } => "queued",
        Event::TitleResolved { .. } => "title_resolved",
        Event::Attempt { .. } => "attempt",
        Event::Transcoding { .. } => "transcoding",
        Event::Completed { .. } => "completed",
        Event::Failed { .. } => "failed",
        Event::Expired { .. } => "expired",
        Event::Shutdown => "shutdown",
    }
}

/// GET /events - Server-sent events stream
#[utoipa::path(
    get,
    path = "/events",
    tag = "system",
    responses(
        (status = 200, description = "Server-sent events stream (text/event-stream)", content_type = "text/event-stream")
    )
)]
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = state.manager.subscribe();
    let stream = BroadcastStream::new(receiver);

    let sse_stream = stream.filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json_data) => Some(Ok(SseEvent::default()
                .event(event_name(&event))
                .data(json_data))),
            Err(e) => {
                tracing::warn!("Failed to serialize event to JSON: {}", e);
                None
            }
        },
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("SSE client lagged, skipped {} events", skipped);
            Some(Ok(SseEvent::default().event("error").data(format!(
                r#"{{"error":"lagged","skipped":{}}}"#,
                skipped
            ))))
        }
    });

    Sse::new(sse_stream).keep_alive(KeepAlive::default())
}
