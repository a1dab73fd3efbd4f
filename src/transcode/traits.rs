//! Transcoder trait

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Converts one media file into an mp3
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Write `output` as mp3 from `input`, killing the process after `timeout`.
    ///
    /// `output` is overwritten if it exists. `input` is left in place.
    async fn transcode(&self, input: &Path, output: &Path, timeout: Duration) -> crate::Result<()>;

    /// Whether a real binary backs this handler
    fn is_available(&self) -> bool {
        true
    }

    /// Handler name for logging and capability reporting
    fn name(&self) -> &'static str;
}
