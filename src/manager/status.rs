//! Status queries and download resolution.

use crate::error::{ArtifactError, Error, JobError, Result};
use crate::store::Artifact;
use crate::types::{Event, JobId, JobView};

use super::JobManager;

impl JobManager {
    /// Current view of a job.
    ///
    /// The job record answers first. When it is gone but the artifact is
    /// still registered, a `completed` view is built from the artifact.
    pub async fn status(&self, id: JobId) -> Result<JobView> {
        let artifact = self.artifacts.peek(id).await;

        if let Some(job) = self.jobs.get(id).await {
            return Ok(job.view(artifact.as_ref()));
        }

        artifact
            .map(|a| a.completed_view())
            .ok_or(Error::Job(JobError::NotFound { id }))
    }

    /// Artifact to stream for a download request.
    ///
    /// When the artifact turns out expired or its file is gone, the job
    /// record goes with it.
    pub async fn resolve_download(&self, id: JobId) -> Result<Artifact> {
        match self.artifacts.resolve(id).await {
            Err(Error::Artifact(ArtifactError::Expired { id })) => {
                self.jobs.remove(id).await;
                self.emit_event(Event::Expired { id });
                Err(Error::Artifact(ArtifactError::Expired { id }))
            }
            Err(Error::Artifact(ArtifactError::FileMissing { id })) => {
                self.jobs.remove(id).await;
                Err(Error::Artifact(ArtifactError::FileMissing { id }))
            }
            other => other,
        }
    }
}
