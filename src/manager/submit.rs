//! Accepting conversion requests.

use crate::error::{Error, Result};
use crate::retrieval::{placeholder_title, validate_source_url};
use crate::store::Job;
use crate::types::{Event, JobId};
use std::sync::atomic::Ordering;

use super::JobManager;

impl JobManager {
    /// Accept a conversion request and start its pipeline in the background.
    ///
    /// Returns as soon as the job is recorded; the caller polls
    /// [`JobManager::status`] for progress.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if the URL is empty, malformed, or not on a
    ///   supported host
    /// - [`Error::ShuttingDown`] once shutdown has started
    pub async fn submit(&self, source_url: &str) -> Result<JobId> {
        validate_source_url(source_url)?;

        if !self.run_state.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let id = JobId::new();
        let source_url = source_url.trim().to_string();
        self.jobs
            .insert(Job::new(id, source_url.clone(), placeholder_title(&id.to_string())))
            .await;

        tracing::info!(job_id = %id, %source_url, "job accepted");
        self.emit_event(Event::Queued { id });

        self.spawn_pipeline(id, source_url);
        Ok(id)
    }

    /// Whether new submissions are accepted
    pub fn is_accepting(&self) -> bool {
        self.run_state.accepting_new.load(Ordering::SeqCst)
    }
}
