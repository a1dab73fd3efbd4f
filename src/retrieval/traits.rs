//! Traits and types for the external downloader

use async_trait::async_trait;
use std::time::Duration;

/// Captured output of a finished external process
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

/// Trait for the media downloader collaborator (yt-dlp)
///
/// One call is one process invocation. A non-zero exit status, a timeout or
/// a spawn failure is returned as an error; callers decide whether that is
/// fatal.
///
/// # Examples
///
/// ```no_run
/// use audiograb::retrieval::{CliDownloader, MediaDownloader};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = CliDownloader::from_path().expect("yt-dlp not found in PATH");
/// let output = downloader
///     .run(&["--version".to_string()], Duration::from_secs(10))
///     .await?;
/// println!("yt-dlp {}", output.stdout.trim());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Run the downloader with `args`, killing it after `timeout`
    async fn run(&self, args: &[String], timeout: Duration) -> crate::Result<ToolOutput>;

    /// Whether a real binary backs this handler
    fn is_available(&self) -> bool {
        true
    }

    /// Handler name for logging and capability reporting
    fn name(&self) -> &'static str;
}
