//! Shared test helpers for creating JobManager instances with fake tools.

use crate::config::Config;
use crate::error::Error;
use crate::manager::JobManager;
use crate::retrieval::{MediaDownloader, ToolOutput};
use crate::transcode::Transcoder;
use crate::types::{JobId, JobStatus, JobView};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

/// Downloader that answers metadata lookups with a title and writes a fake
/// media file for retrieval calls, after failing the first `failures`
/// retrieval attempts.
pub(crate) struct FakeDownloader {
    title: Option<String>,
    extension: String,
    failures: usize,
    retrievals: AtomicUsize,
    delay: Duration,
    writes_output: bool,
}

impl FakeDownloader {
    /// Succeeds on the first strategy, producing `media.<extension>`
    pub(crate) fn succeeding(extension: &str) -> Self {
        Self {
            title: Some("Test Song (Official Audio)".to_string()),
            extension: extension.to_string(),
            failures: 0,
            retrievals: AtomicUsize::new(0),
            delay: Duration::ZERO,
            writes_output: true,
        }
    }

    /// Every call fails
    pub(crate) fn failing() -> Self {
        Self {
            title: None,
            failures: usize::MAX,
            ..Self::succeeding("mp3")
        }
    }

    /// Retrieval fails `failures` times before succeeding
    pub(crate) fn failing_first(failures: usize) -> Self {
        Self {
            failures,
            ..Self::succeeding("mp3")
        }
    }

    /// Exits successfully without producing any media file
    pub(crate) fn writing_nothing() -> Self {
        Self {
            writes_output: false,
            ..Self::succeeding("mp3")
        }
    }

    /// Sleep before every retrieval call
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of retrieval (non-metadata) calls made so far
    pub(crate) fn retrieval_calls(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaDownloader for FakeDownloader {
    async fn run(&self, args: &[String], _timeout: Duration) -> crate::Result<ToolOutput> {
        if args.iter().any(|a| a == "--dump-single-json") {
            return match &self.title {
                Some(title) => Ok(ToolOutput {
                    stdout: serde_json::json!({ "title": title }).to_string(),
                    stderr: String::new(),
                }),
                None => Err(Error::ExternalTool("metadata unavailable".into())),
            };
        }

        let n = self.retrievals.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if n <= self.failures {
            return Err(Error::ExternalTool(format!(
                "yt-dlp terminated with exit code 1: attempt {n} blocked"
            )));
        }

        if !self.writes_output {
            return Ok(ToolOutput::default());
        }

        let template = args
            .iter()
            .position(|a| a == "-o")
            .and_then(|i| args.get(i + 1))
            .ok_or_else(|| Error::Other("no output template".into()))?;
        let output = template.replace("%(ext)s", &self.extension);
        tokio::fs::write(&output, b"ID3fake-audio").await?;
        Ok(ToolOutput::default())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Transcoder that copies its input, optionally failing instead
pub(crate) struct FakeTranscoder {
    pub(crate) fail: bool,
    pub(crate) calls: AtomicUsize,
}

impl FakeTranscoder {
    pub(crate) fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn broken() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(&self, input: &Path, output: &Path, _timeout: Duration) -> crate::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Pipeline(crate::error::PipelineError::TranscodeFailed {
                input: input.to_path_buf(),
                reason: "unsupported codec".into(),
            }));
        }
        tokio::fs::copy(input, output).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Test configuration rooted in `root`, with a single mirror so chains stay short
pub(crate) fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.temp_dir = root.join("temp");
    config.storage.max_concurrent_jobs = 2;
    config.tools.search_path = false;
    config.retrieval.mirror_hosts = vec!["mirror.example".to_string()];
    config
}

/// Helper to create a JobManager with the given fake tools.
/// Returns the manager and the tempdir (which must be kept alive).
pub(crate) async fn create_test_manager(
    downloader: Arc<dyn MediaDownloader>,
    transcoder: Arc<dyn Transcoder>,
) -> (JobManager, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(temp_dir.path());
    let manager = JobManager::with_tools(config, downloader, transcoder)
        .await
        .unwrap();
    (manager, temp_dir)
}

/// Manager whose downloader succeeds with an mp3 on the first strategy
pub(crate) async fn create_succeeding_manager() -> (JobManager, tempfile::TempDir) {
    create_test_manager(
        Arc::new(FakeDownloader::succeeding("mp3")),
        Arc::new(FakeTranscoder::new()),
    )
    .await
}

/// Poll until the job leaves `pending`, panicking after five seconds
pub(crate) async fn wait_for_terminal(manager: &JobManager, id: JobId) -> JobView {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let view = manager.status(id).await.unwrap();
        if view.status != JobStatus::Pending {
            return view;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} still pending after 5s"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
