//! Periodic expiry of artifacts and stale job records.

use crate::types::{Event, JobId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tokio::time::MissedTickBehavior;

use super::JobManager;

/// What one sweep pass removed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired artifacts deleted (file and record)
    pub artifacts_evicted: usize,
    /// Job records dropped, including those of evicted artifacts
    pub jobs_removed: usize,
}

impl JobManager {
    /// Run one sweep pass now
    pub async fn sweep_once(&self) -> SweepReport {
        self.sweep_at(Utc::now()).await
    }

    /// Run one sweep pass as if the clock read `now`.
    ///
    /// Evicts expired artifacts together with their jobs, then drops terminal
    /// jobs without an artifact once `job_retention` has passed since they
    /// finished. Running it twice in a row removes nothing the second time.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let evicted = self.artifacts.evict_expired(now).await;
        let mut jobs_removed = 0;
        for id in &evicted {
            if self.jobs.remove(*id).await.is_some() {
                jobs_removed += 1;
            }
            self.emit_event(Event::Expired { id: *id });
        }

        let keep: HashSet<JobId> = self.artifacts.ids().await.into_iter().collect();
        let stale = self
            .jobs
            .remove_stale(now, self.config.storage.job_retention, &keep)
            .await;
        jobs_removed += stale.len();

        SweepReport {
            artifacts_evicted: evicted.len(),
            jobs_removed,
        }
    }

    /// Start the background sweeper; it stops when shutdown begins
    pub fn start_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        let period = self.config.storage.sweep_interval;
        let shutdown = self.run_state.shutdown.clone();

        tracing::info!(interval_secs = period.as_secs(), "expiry sweeper started");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::info!("expiry sweeper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let report = manager.sweep_once().await;
                        if report == SweepReport::default() {
                            tracing::debug!("sweep found nothing to remove");
                        } else {
                            tracing::info!(
                                artifacts_evicted = report.artifacts_evicted,
                                jobs_removed = report.jobs_removed,
                                "sweep complete"
                            );
                        }
                    }
                }
            }
        })
    }
}
