//! # audiograb
//!
//! HTTP service that turns a YouTube URL into a temporarily downloadable MP3.
//!
//! ## Design Philosophy
//!
//! audiograb is designed to be:
//! - **Resilient** - Retrieval walks an ordered chain of strategies and stops at the first success
//! - **Asynchronous** - Submission returns immediately; conversion runs in a background pipeline
//! - **Ephemeral** - Artifacts expire after a retention window and are swept from disk
//! - **Event-driven** - Consumers subscribe to job events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use audiograb::{Config, JobManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = JobManager::new(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = manager.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let id = manager.submit("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     println!("status: {:?}", manager.status(id).await?);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Job manager (decomposed into focused submodules)
pub mod manager;
/// Media retrieval through yt-dlp and its fallback strategies
pub mod retrieval;
/// In-memory job and artifact stores
pub mod store;
/// Audio transcoding through ffmpeg
pub mod transcode;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    ApiError, ArtifactError, Error, ErrorDetail, JobError, PipelineError, Result, ToHttpStatus,
};
pub use manager::{JobManager, SweepReport};
pub use retrieval::{
    CliDownloader, MediaDownloader, SourceVideo, Strategy, StrategyChain, ToolOutput,
    UnavailableDownloader,
};
pub use store::{Artifact, ArtifactStore, Job, JobStore};
pub use transcode::{CliTranscoder, Transcoder, UnavailableTranscoder};
pub use types::{
    AttemptOutcome, Capabilities, Event, JobId, JobStatus, JobView, StrategyAttempt,
};

use std::sync::Arc;

/// Run the service until a termination signal arrives.
///
/// Starts the expiry sweeper and the API server, then on signal stops
/// accepting connections and calls the manager's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use audiograb::{Config, JobManager, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let manager = JobManager::new(Config::default()).await?;
///
///     // Serve until SIGTERM/SIGINT
///     run_with_shutdown(manager).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(manager: JobManager) -> Result<()> {
    let sweeper = manager.start_sweeper();
    let config = manager.get_config();

    let served =
        api::start_api_server_with_shutdown(Arc::new(manager.clone()), config, wait_for_signal())
            .await;
    if let Err(e) = &served {
        tracing::error!(error = %e, "API server exited with error");
    }

    manager.shutdown().await?;
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "sweeper task did not exit cleanly");
    }
    served
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
