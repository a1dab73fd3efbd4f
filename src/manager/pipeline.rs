//! The per-job background pipeline: metadata, retrieval, locate,
//! transcode-or-move, publish.

use crate::error::{Error, PipelineError, Result};
use crate::retrieval::strategy::{OUTPUT_STEM, TARGET_FORMAT};
use crate::retrieval::{SourceVideo, fetch_metadata};
use crate::store::{Artifact, JobOutcome};
use crate::types::{Event, JobId};
use crate::utils::{
    has_extension, locate_output, move_file, redact, remove_dir_if_exists, remove_file_if_exists,
};
use std::path::Path;

use super::JobManager;

impl JobManager {
    /// Spawn the pipeline for `id` on the manager's task tracker
    pub(crate) fn spawn_pipeline(&self, id: JobId, source_url: String) {
        let manager = self.clone();
        self.run_state.tasks.spawn(async move {
            manager.run_pipeline(id, source_url).await;
        });
    }

    /// Run the pipeline and write the job's terminal state exactly once
    async fn run_pipeline(&self, id: JobId, source_url: String) {
        let work_dir = self.config.storage.work_root().join(id.to_string());

        let result = match self.run_state.concurrent_limit.clone().acquire_owned().await {
            Ok(_permit) => self.process(id, &source_url, &work_dir).await,
            Err(_) => Err(Error::ShuttingDown),
        };

        if let Err(e) = remove_dir_if_exists(&work_dir).await {
            tracing::warn!(job_id = %id, error = %e, "failed to remove work directory");
        }

        match result {
            Ok(artifact) => {
                if let Err(e) = self.jobs.finish(id, JobOutcome::Completed).await {
                    tracing::warn!(job_id = %id, error = %e, "could not mark job completed");
                    return;
                }
                tracing::info!(
                    job_id = %id,
                    filename = %artifact.download_filename,
                    "job completed"
                );
                self.emit_event(Event::Completed {
                    id,
                    download_filename: artifact.download_filename,
                    expires_at: artifact.expires_at,
                });
            }
            Err(e) => {
                let message = redact(&e.to_string(), self.config.retrieval.proxy_url.as_deref());
                if let Err(e) = self
                    .jobs
                    .finish(id, JobOutcome::Failed(message.clone()))
                    .await
                {
                    tracing::warn!(job_id = %id, error = %e, "could not mark job failed");
                    return;
                }
                tracing::error!(job_id = %id, error = %message, "job failed");
                self.emit_event(Event::Failed { id, error: message });
            }
        }
    }

    async fn process(&self, id: JobId, source_url: &str, work_dir: &Path) -> Result<Artifact> {
        let source = SourceVideo::parse(source_url)?;

        let metadata = fetch_metadata(
            self.tools.downloader.as_ref(),
            &source,
            &self.config.retrieval,
            self.config.tools.metadata_timeout,
        )
        .await;
        if self.jobs.set_title(id, &metadata.title).await {
            self.emit_event(Event::TitleResolved {
                id,
                title: metadata.title.clone(),
            });
        }

        let event_tx = self.event_tx.clone();
        let media = self
            .tools
            .chain
            .retrieve(&source, work_dir, move |attempt| {
                event_tx
                    .send(Event::Attempt {
                        id,
                        attempt: attempt.clone(),
                    })
                    .ok();
            })
            .await?;
        tracing::debug!(job_id = %id, strategy = %media.strategy, attempts = media.attempts.len(), "media retrieved");

        let raw = locate_output(
            work_dir,
            OUTPUT_STEM,
            &self.config.retrieval.candidate_extensions,
        )
        .await
        .ok_or_else(|| {
            tracing::warn!(
                job_id = %id,
                dir = ?work_dir,
                strategy = %media.strategy,
                "retrieval reported success but left no media file"
            );
            Error::Pipeline(PipelineError::OutputMissing {
                dir: work_dir.to_path_buf(),
            })
        })?;

        let destination = self.config.temp_dir().join(format!("{id}.{TARGET_FORMAT}"));
        if has_extension(&raw, TARGET_FORMAT) {
            move_file(&raw, &destination).await?;
        } else {
            tracing::info!(job_id = %id, input = ?raw, "transcoding to {}", TARGET_FORMAT);
            self.emit_event(Event::Transcoding { id });
            if let Err(e) = self
                .tools
                .transcoder
                .transcode(&raw, &destination, self.config.tools.process_timeout)
                .await
            {
                tracing::warn!(job_id = %id, input = ?raw, error = %e, "transcode failed");
                remove_file_if_exists(&destination).await.ok();
                return Err(e);
            }
        }

        let title = self
            .jobs
            .get(id)
            .await
            .map(|job| job.title)
            .unwrap_or(metadata.title);

        Ok(self.artifacts.publish(id, destination, &title).await)
    }
}
