//! Job lifecycle management split into focused submodules.
//!
//! The `JobManager` struct and its methods are organized by domain:
//! - [`submit`] - Accepting conversion requests
//! - [`pipeline`] - The per-job background pipeline
//! - [`status`] - Status queries and download resolution
//! - [`sweeper`] - Periodic expiry of artifacts and stale jobs
//! - [`lifecycle`] - Shutdown coordination

mod lifecycle;
mod pipeline;
mod status;
mod submit;
mod sweeper;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use sweeper::SweepReport;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::retrieval::{CliDownloader, MediaDownloader, StrategyChain, UnavailableDownloader};
use crate::store::{ArtifactStore, JobStore};
use crate::transcode::{CliTranscoder, Transcoder, UnavailableTranscoder};
use crate::types::{Capabilities, Event};
use crate::utils::remove_dir_if_exists;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// External tools and the strategy chain built on top of them
#[derive(Clone)]
pub(crate) struct Toolchain {
    /// yt-dlp (or its stand-in)
    pub(crate) downloader: Arc<dyn MediaDownloader>,
    /// ffmpeg (or its stand-in)
    pub(crate) transcoder: Arc<dyn Transcoder>,
    /// Ordered retrieval strategies over `downloader`
    pub(crate) chain: StrategyChain,
}

/// Concurrency and shutdown state
#[derive(Clone)]
pub(crate) struct RunState {
    /// Bounds how many pipelines run external tools at once
    pub(crate) concurrent_limit: Arc<tokio::sync::Semaphore>,
    /// Tracks spawned pipelines so shutdown can wait for them
    pub(crate) tasks: tokio_util::task::TaskTracker,
    /// Set to false once shutdown starts
    pub(crate) accepting_new: Arc<AtomicBool>,
    /// Cancelled on shutdown; stops the sweeper
    pub(crate) shutdown: tokio_util::sync::CancellationToken,
}

/// Main service instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct JobManager {
    /// Job records. Public for integration tests to inspect state
    pub jobs: JobStore,
    /// Published artifacts. Public for integration tests to inspect state
    pub artifacts: ArtifactStore,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    pub(crate) tools: Toolchain,
    pub(crate) run_state: RunState,
}

impl JobManager {
    /// Create a new JobManager, discovering yt-dlp and ffmpeg.
    ///
    /// Explicitly configured binary paths win; otherwise `PATH` is searched
    /// (unless `tools.search_path` is off). A missing tool degrades to a
    /// stand-in that fails jobs with a clear message.
    pub async fn new(config: Config) -> Result<Self> {
        let downloader: Arc<dyn MediaDownloader> =
            if let Some(ref path) = config.tools.downloader_path {
                Arc::new(CliDownloader::new(path.clone()))
            } else if config.tools.search_path {
                CliDownloader::from_path()
                    .map(|h| Arc::new(h) as Arc<dyn MediaDownloader>)
                    .unwrap_or_else(|| Arc::new(UnavailableDownloader))
            } else {
                Arc::new(UnavailableDownloader)
            };

        let transcoder: Arc<dyn Transcoder> = if let Some(ref path) = config.tools.transcoder_path
        {
            Arc::new(CliTranscoder::new(path.clone()))
        } else if config.tools.search_path {
            CliTranscoder::from_path()
                .map(|h| Arc::new(h) as Arc<dyn Transcoder>)
                .unwrap_or_else(|| Arc::new(UnavailableTranscoder))
        } else {
            Arc::new(UnavailableTranscoder)
        };

        if !downloader.is_available() {
            tracing::warn!("yt-dlp not found; every conversion will fail until it is installed");
        }

        Self::with_tools(config, downloader, transcoder).await
    }

    /// Create a JobManager with explicit tool implementations
    pub async fn with_tools(
        config: Config,
        downloader: Arc<dyn MediaDownloader>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Result<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(config.temp_dir())
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create temp directory '{}': {}",
                        config.temp_dir().display(),
                        e
                    ),
                ))
            })?;

        // Work directories left by a previous run belong to jobs that no longer exist
        let work_root = config.storage.work_root();
        remove_dir_if_exists(&work_root).await?;
        tokio::fs::create_dir_all(&work_root).await?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        let chain = StrategyChain::from_config(
            downloader.clone(),
            &config.retrieval,
            config.tools.process_timeout,
        );

        tracing::info!(
            downloader = downloader.name(),
            transcoder = transcoder.name(),
            strategies = chain.strategies().len(),
            max_concurrent_jobs = config.storage.max_concurrent_jobs,
            "job manager initialized"
        );

        let run_state = RunState {
            concurrent_limit: Arc::new(tokio::sync::Semaphore::new(
                config.storage.max_concurrent_jobs,
            )),
            tasks: tokio_util::task::TaskTracker::new(),
            accepting_new: Arc::new(AtomicBool::new(true)),
            shutdown: tokio_util::sync::CancellationToken::new(),
        };

        Ok(Self {
            jobs: JobStore::new(),
            artifacts: ArtifactStore::new(config.storage.retention),
            event_tx,
            config: Arc::new(config),
            tools: Toolchain {
                downloader,
                transcoder,
                chain,
            },
            run_state,
        })
    }

    /// Subscribe to job events
    ///
    /// Each subscriber receives all events independently. A subscriber that
    /// falls more than 1000 events behind gets `RecvError::Lagged`.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Which tools were found and how many strategies the chain holds
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            downloader: self.tools.downloader.name().to_string(),
            transcoder: self.tools.transcoder.name().to_string(),
            strategies: self.tools.chain.strategies().len(),
        }
    }

    /// Send an event to all subscribers; dropped silently when nobody listens
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
