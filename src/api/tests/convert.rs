use super::*;

#[tokio::test]
async fn convert_returns_task_and_urls() {
    let (app, _manager, _tmp) = succeeding_app().await;

    let response = app
        .oneshot(post_json(
            "/convert",
            serde_json::json!({ "sourceUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let task_id = body["taskId"].as_str().unwrap();
    assert!(task_id.parse::<JobId>().is_ok());
    assert_eq!(body["statusUrl"], format!("/status/{task_id}"));
    assert_eq!(body["downloadUrl"], format!("/download/{task_id}"));
}

#[tokio::test]
async fn legacy_youtube_url_field_is_accepted() {
    let (app, _manager, _tmp) = succeeding_app().await;

    let response = app
        .oneshot(post_json(
            "/convert",
            serde_json::json!({ "youtubeUrl": "https://youtu.be/dQw4w9WgXcQ" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_url_is_400() {
    let (app, manager, _tmp) = succeeding_app().await;

    let response = app
        .oneshot(post_json("/convert", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_input");
    assert!(manager.jobs.is_empty().await);
}

#[tokio::test]
async fn non_url_is_400() {
    let (app, manager, _tmp) = succeeding_app().await;

    let response = app
        .oneshot(post_json(
            "/convert",
            serde_json::json!({ "sourceUrl": "not-a-url" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(manager.jobs.is_empty().await);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (app, _manager, _tmp) = succeeding_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn convert_after_shutdown_is_503() {
    let (app, manager, _tmp) = succeeding_app().await;
    manager.shutdown().await.unwrap();

    let response = app
        .oneshot(post_json(
            "/convert",
            serde_json::json!({ "sourceUrl": "https://youtu.be/dQw4w9WgXcQ" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["error"]["code"], "shutting_down");
}
