//! Source URL validation and video id extraction

use crate::error::{Error, PipelineError, Result};
use url::Url;

/// A validated source URL plus the opaque video id extracted from it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceVideo {
    /// The URL exactly as submitted
    pub url: String,
    /// Upstream video identifier
    pub video_id: String,
}

impl SourceVideo {
    /// Extract the video id from an already-validated URL.
    ///
    /// Fails with [`PipelineError::InvalidSource`] when the URL carries no id
    /// (e.g. `https://www.youtube.com/`).
    pub fn parse(source_url: &str) -> Result<Self> {
        let invalid = || {
            Error::Pipeline(PipelineError::InvalidSource {
                url: source_url.to_string(),
            })
        };

        let url = Url::parse(source_url.trim()).map_err(|_| invalid())?;
        let video_id = extract_video_id(&url).ok_or_else(invalid)?;

        Ok(Self {
            url: source_url.trim().to_string(),
            video_id,
        })
    }
}

/// Check that a submission looks like a supported video URL.
///
/// Only the shape is checked here; whether a video id can be extracted is
/// decided later by [`SourceVideo::parse`] inside the pipeline.
pub fn validate_source_url(source_url: &str) -> Result<Url> {
    let trimmed = source_url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("a source URL is required".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|_| Error::InvalidInput(format!("not a valid URL: {trimmed}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidInput(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if is_supported_host(host) => Ok(url),
        _ => Err(Error::InvalidInput(format!(
            "not a supported video URL: {trimmed}"
        ))),
    }
}

fn is_supported_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com")
}

fn extract_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    }?;

    is_video_id(&candidate).then_some(candidate)
}

fn is_video_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
