//! Published files and their expiry

use crate::error::{ArtifactError, Error, Result};
use crate::types::{JobId, JobStatus, JobView};
use crate::utils::{remove_file_if_exists, sanitize_title};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// A downloadable file owned by the store until it expires
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Job that produced the file
    pub job_id: JobId,
    /// Where the file lives; owned exclusively by this record
    pub storage_path: PathBuf,
    /// Filename offered to clients (`<sanitized title>.mp3`)
    pub download_filename: String,
    /// Title at publish time, unsanitized
    pub display_title: String,
    /// When the file became downloadable
    pub published_at: DateTime<Utc>,
    /// First instant at which the file is no longer served
    pub expires_at: DateTime<Utc>,
}

impl Artifact {
    /// Whether `now` is at or past the expiry instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Completed-job view for when the job record itself is gone.
    ///
    /// The submission time went with the job record, so `created` reports
    /// when the file was published.
    pub fn completed_view(&self) -> JobView {
        JobView {
            task_id: self.job_id,
            status: JobStatus::Completed,
            title: self.display_title.clone(),
            created: self.published_at,
            download_url: Some(super::download_url(self.job_id)),
            error: None,
            expires_at: Some(self.expires_at),
        }
    }
}

/// Registry of published artifacts, keyed by job id
#[derive(Clone)]
pub struct ArtifactStore {
    artifacts: Arc<RwLock<HashMap<JobId, Artifact>>>,
    retention: Duration,
}

impl ArtifactStore {
    /// Create an empty store whose artifacts live for `retention`
    pub fn new(retention: Duration) -> Self {
        Self {
            artifacts: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Register `storage_path` as the artifact for `job_id`, expiring after
    /// the configured retention.
    pub async fn publish(&self, job_id: JobId, storage_path: PathBuf, title: &str) -> Artifact {
        let now = Utc::now();
        let expires_at = expiry_after(now, self.retention);
        self.publish_with_expiry(job_id, storage_path, title, now, expires_at)
            .await
    }

    /// Register an artifact with explicit timestamps
    pub async fn publish_with_expiry(
        &self,
        job_id: JobId,
        storage_path: PathBuf,
        title: &str,
        published_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Artifact {
        let artifact = Artifact {
            job_id,
            storage_path,
            download_filename: format!("{}.mp3", sanitize_title(title)),
            display_title: title.to_string(),
            published_at,
            expires_at,
        };

        self.artifacts
            .write()
            .await
            .insert(job_id, artifact.clone());

        info!(
            job_id = %job_id,
            filename = %artifact.download_filename,
            expires_at = %artifact.expires_at,
            "artifact published"
        );
        artifact
    }

    /// Look up a servable artifact.
    ///
    /// An expired artifact is evicted (file, then record) and reported as
    /// [`ArtifactError::Expired`]. If the file cannot be deleted the record
    /// stays for the sweeper; the result is still `Expired`. A record whose file has vanished is
    /// dropped and reported as [`ArtifactError::FileMissing`].
    pub async fn resolve(&self, job_id: JobId) -> Result<Artifact> {
        let artifact = self
            .peek(job_id)
            .await
            .ok_or(Error::Artifact(ArtifactError::NotFound { id: job_id }))?;

        if artifact.is_expired(Utc::now()) {
            match remove_file_if_exists(&artifact.storage_path).await {
                Ok(_) => {
                    self.artifacts.write().await.remove(&job_id);
                    debug!(job_id = %job_id, "expired artifact evicted on access");
                }
                Err(e) => warn!(
                    job_id = %job_id,
                    error = %e,
                    "failed to delete expired artifact file; sweeper will retry"
                ),
            }
            return Err(Error::Artifact(ArtifactError::Expired { id: job_id }));
        }

        if !tokio::fs::try_exists(&artifact.storage_path)
            .await
            .unwrap_or(false)
        {
            self.artifacts.write().await.remove(&job_id);
            warn!(
                job_id = %job_id,
                path = ?artifact.storage_path,
                "artifact file disappeared before expiry; record dropped"
            );
            return Err(Error::Artifact(ArtifactError::FileMissing { id: job_id }));
        }

        Ok(artifact)
    }

    /// Side-effect-free lookup
    pub async fn peek(&self, job_id: JobId) -> Option<Artifact> {
        self.artifacts.read().await.get(&job_id).cloned()
    }

    /// Remove every artifact expired at `now`, file first.
    ///
    /// Already-missing files are fine. An artifact whose file cannot be
    /// deleted keeps its record so the next pass retries it.
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> Vec<JobId> {
        let expired: Vec<Artifact> = self
            .artifacts
            .read()
            .await
            .values()
            .filter(|a| a.is_expired(now))
            .cloned()
            .collect();

        let mut evicted = Vec::with_capacity(expired.len());
        for artifact in expired {
            match remove_file_if_exists(&artifact.storage_path).await {
                Ok(_) => evicted.push(artifact.job_id),
                Err(e) => warn!(
                    job_id = %artifact.job_id,
                    error = %e,
                    "failed to delete expired artifact file; will retry"
                ),
            }
        }

        if !evicted.is_empty() {
            let mut artifacts = self.artifacts.write().await;
            for id in &evicted {
                artifacts.remove(id);
            }
        }
        evicted
    }

    /// Number of registered artifacts
    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    /// Whether no artifacts are registered
    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }

    /// Ids of every registered artifact
    pub async fn ids(&self) -> Vec<JobId> {
        self.artifacts.read().await.keys().copied().collect()
    }
}

/// `now + retention`, saturating at the far future
pub(crate) fn expiry_after(now: DateTime<Utc>, retention: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(retention)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
