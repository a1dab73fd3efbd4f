use super::*;

#[tokio::test]
async fn status_of_completed_job() {
    let (app, manager, _tmp) = succeeding_app().await;
    let id = submit_via_api(&app, "https://youtu.be/dQw4w9WgXcQ").await;
    wait_for_terminal(&manager, id).await;

    let response = app
        .oneshot(get_request(&format!("/status/{id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["taskId"], id.to_string());
    assert_eq!(body["status"], "completed");
    assert_eq!(body["title"], "Test Song (Official Audio)");
    assert_eq!(body["downloadUrl"], format!("/download/{id}"));
    assert!(body["error"].is_null());
    assert!(body["expiresAt"].is_string());
    assert!(body["created"].is_string());
}

#[tokio::test]
async fn status_of_failed_job_carries_error() {
    let (app, manager, _tmp) = failing_app().await;
    let id = submit_via_api(&app, "https://youtu.be/dQw4w9WgXcQ").await;
    let view = wait_for_terminal(&manager, id).await;
    assert_eq!(view.status, JobStatus::Failed);

    let response = app
        .oneshot(get_request(&format!("/status/{id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "failed");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("retrieval strategies failed")
    );
    assert!(body["downloadUrl"].is_null());
}

#[tokio::test]
async fn unknown_task_is_404() {
    let (app, _manager, _tmp) = succeeding_app().await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/status/{}", JobId::new())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "job_not_found");

    let response = app
        .oneshot(get_request("/status/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
