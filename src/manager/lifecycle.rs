//! Shutdown coordination.

use crate::error::Result;
use crate::types::Event;
use std::time::Duration;

use super::JobManager;

/// How long shutdown waits for in-flight pipelines
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

impl JobManager {
    /// Gracefully shut down the manager
    ///
    /// 1. Stops accepting new submissions
    /// 2. Stops the expiry sweeper
    /// 3. Waits (bounded) for in-flight pipelines
    /// 4. Emits [`Event::Shutdown`]
    ///
    /// Pipelines still running after the timeout are abandoned; their child
    /// processes are killed when the runtime drops them.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_with_timeout(SHUTDOWN_TIMEOUT).await
    }

    pub(crate) async fn shutdown_with_timeout(&self, timeout: Duration) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.run_state
            .accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);
        tracing::info!("Stopped accepting new jobs");

        self.run_state.shutdown.cancel();

        self.run_state.tasks.close();
        let in_flight = self.run_state.tasks.len();
        if in_flight > 0 {
            tracing::info!(in_flight, "Waiting for in-flight pipelines");
        }

        match tokio::time::timeout(timeout, self.run_state.tasks.wait()).await {
            Ok(()) => tracing::info!("All pipelines finished"),
            Err(_) => tracing::warn!(
                remaining = self.run_state.tasks.len(),
                "Timeout waiting for pipelines, proceeding with shutdown"
            ),
        }

        self.emit_event(Event::Shutdown);
        tracing::info!("Graceful shutdown complete");
        Ok(())
    }
}
