//! ffmpeg backed transcoder

use super::traits::Transcoder;
use crate::error::{Error, PipelineError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Transcoder that shells out to the `ffmpeg` binary
pub struct CliTranscoder {
    binary_path: PathBuf,
}

impl CliTranscoder {
    /// Create a handler with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find ffmpeg in PATH
    pub fn from_path() -> Option<Self> {
        which::which("ffmpeg").ok().map(Self::new)
    }

    fn build_args(input: &Path, output: &Path) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push(input.to_string_lossy().into_owned());
        args.extend(
            ["-vn", "-codec:a", "libmp3lame", "-q:a", "0"]
                .iter()
                .map(|s| s.to_string()),
        );
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl Transcoder for CliTranscoder {
    async fn transcode(&self, input: &Path, output: &Path, timeout: Duration) -> crate::Result<()> {
        let args = Self::build_args(input, output);
        debug!(?input, ?output, "running ffmpeg");

        crate::utils::run_tool(&self.binary_path, "ffmpeg", &args, timeout)
            .await
            .map(|_| ())
            .map_err(|e| {
                Error::Pipeline(PipelineError::TranscodeFailed {
                    input: input.to_path_buf(),
                    reason: e.to_string(),
                })
            })
    }

    fn name(&self) -> &'static str {
        "cli-ffmpeg"
    }
}
