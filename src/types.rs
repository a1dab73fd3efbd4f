//! Core types for audiograb

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a conversion job (and the artifact it produces)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random JobId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Job status
///
/// `Pending` is the only non-terminal state. A job leaves it exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, pipeline running or waiting for a slot
    Pending,
    /// Artifact published and downloadable
    Completed,
    /// Pipeline failed; `error` explains why
    Failed,
}

impl JobStatus {
    /// Whether this status can no longer change
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a job, as returned by status queries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    /// Job identifier
    pub task_id: JobId,
    /// Current status
    pub status: JobStatus,
    /// Video title, or the placeholder until metadata arrives
    pub title: String,
    /// When the job was submitted. A view built from the artifact after the
    /// job record is gone reports the publish time instead.
    pub created: DateTime<Utc>,
    /// Relative download URL once completed
    pub download_url: Option<String>,
    /// Failure reason once failed
    pub error: Option<String>,
    /// When the download stops being available (completed jobs only)
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outcome of a single retrieval strategy attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The strategy produced media; the chain stops here
    Success,
    /// The strategy failed; the chain moves on
    Failure {
        /// Why it failed (exit status, timeout, spawn error)
        reason: String,
    },
}

/// One execution of a retrieval strategy (diagnostics only, never persisted)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StrategyAttempt {
    /// 1-based position in the chain
    pub position: usize,
    /// Strategy name (e.g. "direct", "mirror:yewtu.be")
    pub strategy: String,
    /// What happened
    pub outcome: AttemptOutcome,
}

impl StrategyAttempt {
    /// Whether this attempt succeeded
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success)
    }
}

/// Event emitted during a job's lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Job accepted
    Queued {
        /// Job ID
        id: JobId,
    },

    /// Metadata lookup finished and the title was set
    TitleResolved {
        /// Job ID
        id: JobId,
        /// Resolved title (or placeholder)
        title: String,
    },

    /// A retrieval strategy finished
    Attempt {
        /// Job ID
        id: JobId,
        /// The attempt record
        attempt: StrategyAttempt,
    },

    /// Raw media is being converted to the target format
    Transcoding {
        /// Job ID
        id: JobId,
    },

    /// Job completed and its artifact is downloadable
    Completed {
        /// Job ID
        id: JobId,
        /// Filename the client will receive
        download_filename: String,
        /// Artifact expiry
        expires_at: DateTime<Utc>,
    },

    /// Job failed
    Failed {
        /// Job ID
        id: JobId,
        /// Error message
        error: String,
    },

    /// Artifact (and job record) removed after its retention window
    Expired {
        /// Job ID
        id: JobId,
    },

    /// Service is shutting down
    Shutdown,
}

/// Which external tools were found at startup
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    /// Downloader handler name
    pub downloader: String,
    /// Transcoder handler name
    pub transcoder: String,
    /// Number of retrieval strategies in the chain
    pub strategies: usize,
}
