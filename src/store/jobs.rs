//! Job records and their state machine

use crate::error::{Error, JobError, Result};
use crate::types::{JobId, JobStatus, JobView};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::artifacts::{Artifact, expiry_after};

/// A submitted conversion job
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    /// Job identifier
    pub id: JobId,
    /// URL as submitted
    pub source_url: String,
    /// Current status
    pub status: JobStatus,
    /// Placeholder until metadata resolves it
    pub title: String,
    /// Whether `title` has already been replaced
    pub title_resolved: bool,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Time of the terminal transition
    pub finished_at: Option<DateTime<Utc>>,
    /// Failure reason (failed jobs only)
    pub error: Option<String>,
}

impl Job {
    /// A fresh pending job
    pub fn new(id: JobId, source_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            status: JobStatus::Pending,
            title: title.into(),
            title_resolved: false,
            created_at: Utc::now(),
            finished_at: None,
            error: None,
        }
    }

    /// Status view, taking download details from `artifact` when completed
    pub fn view(&self, artifact: Option<&Artifact>) -> JobView {
        let artifact = artifact.filter(|_| self.status == JobStatus::Completed);
        JobView {
            task_id: self.id,
            status: self.status,
            title: self.title.clone(),
            created: self.created_at,
            download_url: artifact.map(|a| super::download_url(a.job_id)),
            error: self.error.clone(),
            expires_at: artifact.map(|a| a.expires_at),
        }
    }
}

/// How a pipeline ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// Artifact published
    Completed,
    /// Pipeline failed with this message
    Failed(String),
}

impl JobOutcome {
    fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Completed => JobStatus::Completed,
            JobOutcome::Failed(_) => JobStatus::Failed,
        }
    }
}

/// Registry of jobs, keyed by id
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job
    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id, job);
    }

    /// Snapshot of a job
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Replace the placeholder title. Only the first call on a pending job
    /// takes effect; returns whether this one did.
    pub async fn set_title(&self, id: JobId, title: &str) -> bool {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Pending && !job.title_resolved => {
                job.title = title.to_string();
                job.title_resolved = true;
                true
            }
            _ => false,
        }
    }

    /// Move a pending job to its terminal state.
    ///
    /// Fails with [`JobError::InvalidTransition`] if the job already left
    /// `pending`, and [`JobError::NotFound`] if it was removed meanwhile.
    pub async fn finish(&self, id: JobId, outcome: JobOutcome) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or(Error::Job(JobError::NotFound { id }))?;

        let target = outcome.status();
        if job.status.is_terminal() {
            return Err(Error::Job(JobError::InvalidTransition {
                id,
                from: job.status.to_string(),
                to: target.to_string(),
            }));
        }

        job.status = target;
        job.finished_at = Some(Utc::now());
        if let JobOutcome::Failed(message) = outcome {
            job.error = Some(message);
        }
        Ok(())
    }

    /// Drop a job record
    pub async fn remove(&self, id: JobId) -> Option<Job> {
        self.jobs.write().await.remove(&id)
    }

    /// Drop every terminal job finished at least `retention` before `now`,
    /// except those listed in `keep`.
    pub async fn remove_stale(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
        keep: &HashSet<JobId>,
    ) -> Vec<JobId> {
        let mut jobs = self.jobs.write().await;
        let stale: Vec<JobId> = jobs
            .values()
            .filter(|job| !keep.contains(&job.id))
            .filter(|job| {
                job.finished_at
                    .is_some_and(|finished| expiry_after(finished, retention) <= now)
            })
            .map(|job| job.id)
            .collect();

        for id in &stale {
            jobs.remove(id);
        }
        stale
    }

    /// Number of tracked jobs
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether no jobs are tracked
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Number of jobs still pending
    pub async fn pending_count(&self) -> usize {
        self.jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == JobStatus::Pending)
            .count()
    }
}
