//! Stand-in used when no ffmpeg binary is available

use super::traits::Transcoder;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Transcoder that fails every call with [`crate::Error::NotSupported`]
///
/// Jobs whose retrieval already produced an mp3 never reach it.
pub struct UnavailableTranscoder;

#[async_trait]
impl Transcoder for UnavailableTranscoder {
    async fn transcode(&self, _input: &Path, _output: &Path, _timeout: Duration) -> crate::Result<()> {
        Err(crate::Error::NotSupported(
            "transcoding requires the ffmpeg binary; set tools.transcoder_path".into(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
