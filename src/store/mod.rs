//! In-memory job and artifact stores
//!
//! Both stores are cheap to clone (`Arc<RwLock<HashMap<..>>>` inside) and
//! every mutation happens under the write lock. Records are lost on restart;
//! only artifact files live on disk.

mod artifacts;
mod jobs;

pub use artifacts::{Artifact, ArtifactStore};
pub use jobs::{Job, JobOutcome, JobStore};

use crate::types::JobId;

/// Relative URL a completed job's file is served from
pub fn download_url(id: JobId) -> String {
    format!("/download/{id}")
}

/// Relative URL a job's status is served from
pub fn status_url(id: JobId) -> String {
    format!("/status/{id}")
}
