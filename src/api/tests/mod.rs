use super::*;
use crate::manager::test_helpers::{
    FakeDownloader, FakeTranscoder, create_succeeding_manager, create_test_manager,
    wait_for_terminal,
};
use crate::types::{JobId, JobStatus};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;

mod convert;
mod status;
mod system;

/// Router over a manager whose downloader succeeds immediately
async fn succeeding_app() -> (Router, Arc<JobManager>, tempfile::TempDir) {
    let (manager, temp_dir) = create_succeeding_manager().await;
    let manager = Arc::new(manager);
    let app = create_router(manager.clone(), manager.get_config());
    (app, manager, temp_dir)
}

/// Router over a manager whose downloader always fails
async fn failing_app() -> (Router, Arc<JobManager>, tempfile::TempDir) {
    let (manager, temp_dir) = create_test_manager(
        Arc::new(FakeDownloader::failing()),
        Arc::new(FakeTranscoder::new()),
    )
    .await;
    let manager = Arc::new(manager);
    let app = create_router(manager.clone(), manager.get_config());
    (app, manager, temp_dir)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit through the router and return the task id
async fn submit_via_api(app: &Router, url: &str) -> JobId {
    let response = app
        .clone()
        .oneshot(post_json("/convert", serde_json::json!({ "sourceUrl": url })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["taskId"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap()
}

#[tokio::test]
async fn api_server_spawns() {
    let (manager, _temp_dir) = create_succeeding_manager().await;
    let manager = Arc::new(manager);

    let mut config = (*manager.get_config()).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let manager = manager.clone();
        async move { start_api_server(manager, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server exited early");
    api_handle.abort();
}

#[tokio::test]
async fn graceful_shutdown_stops_the_server() {
    let (manager, _temp_dir) = create_succeeding_manager().await;
    let manager = Arc::new(manager);

    let mut config = (*manager.get_config()).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server_with_shutdown(
        manager,
        Arc::new(config),
        async move {
            rx.await.ok();
        },
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn cors_headers_present_when_enabled() {
    let (manager, _temp_dir) = create_succeeding_manager().await;
    let manager = Arc::new(manager);

    let mut config = (*manager.get_config()).clone();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let app = create_router(manager, Arc::new(config));

    let request = Request::builder()
        .uri("/status")
        .header("Origin", "http://localhost:8080")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn cors_headers_absent_when_disabled() {
    let (manager, _temp_dir) = create_succeeding_manager().await;
    let manager = Arc::new(manager);

    let mut config = (*manager.get_config()).clone();
    config.server.api.cors_enabled = false;
    let app = create_router(manager, Arc::new(config));

    let request = Request::builder()
        .uri("/status")
        .header("Origin", "http://localhost:8080")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
