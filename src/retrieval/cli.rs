//! yt-dlp backed downloader

use super::traits::{MediaDownloader, ToolOutput};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Downloader that shells out to the `yt-dlp` binary
///
/// # Examples
///
/// ```no_run
/// use audiograb::retrieval::CliDownloader;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let downloader = CliDownloader::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let downloader = CliDownloader::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct CliDownloader {
    binary_path: PathBuf,
}

impl CliDownloader {
    /// Create a handler with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }
}

#[async_trait]
impl MediaDownloader for CliDownloader {
    async fn run(&self, args: &[String], timeout: Duration) -> crate::Result<ToolOutput> {
        crate::utils::run_tool(&self.binary_path, "yt-dlp", args, timeout).await
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
