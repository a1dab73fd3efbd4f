use super::*;

#[tokio::test]
async fn submit_returns_pending_job_immediately() {
    let downloader = Arc::new(FakeDownloader::succeeding("mp3").with_delay(Duration::from_millis(200)));
    let (manager, _tmp) = create_test_manager(downloader, Arc::new(FakeTranscoder::new())).await;

    let id = manager
        .submit("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
        .unwrap();

    let view = manager.status(id).await.unwrap();
    assert_eq!(view.status, JobStatus::Pending);
    assert_eq!(view.title, format!("YouTube Video - {id}"));
    assert!(view.download_url.is_none());
    assert!(view.error.is_none());
}

#[tokio::test]
async fn submit_rejects_bad_urls_without_creating_jobs() {
    let (manager, _tmp) = create_succeeding_manager().await;

    for bad in ["", "   ", "not a url", "ftp://youtube.com/watch?v=x", "https://vimeo.com/123"] {
        let err = manager.submit(bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{bad:?} gave {err:?}");
    }
    assert!(manager.jobs.is_empty().await);
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_ids() {
    let (manager, _tmp) = create_succeeding_manager().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let m = manager.clone();
        handles.push(tokio::spawn(async move {
            m.submit("https://youtu.be/dQw4w9WgXcQ").await.unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(manager.jobs.len().await, 8);
}

#[tokio::test]
async fn submit_emits_queued_event() {
    let (manager, _tmp) = create_succeeding_manager().await;
    let mut events = manager.subscribe();

    let id = manager.submit("https://youtu.be/dQw4w9WgXcQ").await.unwrap();

    match events.recv().await.unwrap() {
        crate::types::Event::Queued { id: queued } => assert_eq!(queued, id),
        other => panic!("expected Queued, got {other:?}"),
    }
}
