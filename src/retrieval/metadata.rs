//! Best-effort title lookup

use super::source::SourceVideo;
use super::strategy::{network_args, watch_url};
use super::traits::MediaDownloader;
use crate::config::RetrievalConfig;
use crate::utils::redact;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Metadata the service cares about
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoMetadata {
    /// Video title, or the placeholder when lookup failed
    pub title: String,
}

#[derive(Deserialize)]
struct InfoJson {
    title: Option<String>,
}

/// Title shown until (or instead of) a real one
pub fn placeholder_title(video_id: &str) -> String {
    format!("YouTube Video - {video_id}")
}

/// Look up the video title. Never fails: returns the placeholder when every
/// lookup attempt errors or yields no title.
pub async fn fetch_metadata(
    downloader: &dyn MediaDownloader,
    source: &SourceVideo,
    params: &RetrievalConfig,
    timeout: Duration,
) -> VideoMetadata {
    for (name, args) in lookup_attempts(source, params) {
        match downloader.run(&args, timeout).await {
            Ok(output) => match parse_title(&output.stdout) {
                Some(title) => {
                    info!(video_id = %source.video_id, lookup = name, %title, "title resolved");
                    return VideoMetadata { title };
                }
                None => {
                    debug!(video_id = %source.video_id, lookup = name, "no title in metadata output");
                }
            },
            Err(e) => {
                let reason = redact(&e.to_string(), params.proxy_url.as_deref());
                debug!(video_id = %source.video_id, lookup = name, %reason, "metadata lookup failed");
            }
        }
    }

    info!(video_id = %source.video_id, "metadata unavailable, using placeholder title");
    VideoMetadata {
        title: placeholder_title(&source.video_id),
    }
}

fn lookup_attempts(source: &SourceVideo, params: &RetrievalConfig) -> Vec<(&'static str, Vec<String>)> {
    let base = |url: String, extra: &[&str]| {
        let mut args: Vec<String> = ["--dump-single-json", "--no-warnings", "--no-playlist"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.extend(network_args(params, false));
        args.extend(extra.iter().map(|s| s.to_string()));
        args.push(url);
        args
    };

    let mut attempts = vec![("direct", base(source.url.clone(), &[]))];
    if let Some(host) = params.mirror_hosts.first() {
        attempts.push(("mirror", base(watch_url(host, &source.video_id), &[])));
    }
    attempts.push((
        "fallback",
        base(
            source.url.clone(),
            &[
                "--skip-download",
                "--prefer-free-formats",
                "--youtube-skip-dash-manifest",
            ],
        ),
    ));
    attempts
}

fn parse_title(stdout: &str) -> Option<String> {
    let info: InfoJson = serde_json::from_str(stdout.trim()).ok()?;
    info.title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
