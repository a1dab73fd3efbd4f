use super::*;
use crate::types::Event;

#[tokio::test]
async fn service_status_reports_online() {
    let (app, _manager, _tmp) = succeeding_app().await;

    let response = app.oneshot(get_request("/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["capabilities"]["downloader"], "fake");
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let (app, _manager, _tmp) = succeeding_app().await;

    let response = app.oneshot(get_request("/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/convert"].is_object());
}

#[tokio::test]
async fn swagger_ui_only_when_enabled() {
    let (manager, _tmp) = create_succeeding_manager().await;
    let manager = Arc::new(manager);

    let app = create_router(manager.clone(), manager.get_config());
    let response = app.oneshot(get_request("/swagger-ui")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut config = (*manager.get_config()).clone();
    config.server.api.swagger_ui = true;
    let app = create_router(manager, Arc::new(config));
    let response = app.oneshot(get_request("/swagger-ui")).await.unwrap();
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_stream_is_sse() {
    let (app, manager, _tmp) = succeeding_app().await;

    let request = Request::builder()
        .uri("/events")
        .header("Accept", "text/event-stream")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(
        content_type.contains("text/event-stream"),
        "Content-Type should be text/event-stream, got: {content_type}"
    );

    let mut receiver = manager.subscribe();
    manager.emit_event(Event::Shutdown);
    let received = tokio::time::timeout(Duration::from_millis(100), receiver.recv()).await;
    assert!(matches!(received, Ok(Ok(Event::Shutdown))));
}
