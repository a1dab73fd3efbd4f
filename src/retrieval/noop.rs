//! Stand-in used when no downloader binary is available

use super::traits::{MediaDownloader, ToolOutput};
use async_trait::async_trait;
use std::time::Duration;

/// Downloader that fails every call with [`crate::Error::NotSupported`]
///
/// Lets the service start (and report its capabilities) on hosts without
/// yt-dlp; every job then fails with a clear message instead of a spawn error.
pub struct UnavailableDownloader;

#[async_trait]
impl MediaDownloader for UnavailableDownloader {
    async fn run(&self, _args: &[String], _timeout: Duration) -> crate::Result<ToolOutput> {
        Err(crate::Error::NotSupported(
            "yt-dlp binary not found; set tools.downloader_path".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
