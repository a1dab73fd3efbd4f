//! Retrieval strategy descriptors
//!
//! A [`Strategy`] is pure data: a name, where to point the downloader, and
//! the extra flags that distinguish it. Adding or reordering strategies is a
//! change to [`default_strategies`], not to the attempt loop.

use super::source::SourceVideo;
use crate::config::RetrievalConfig;
use std::path::{Path, PathBuf};

/// File stem every strategy writes to inside the job's work directory
pub const OUTPUT_STEM: &str = "media";

/// Target audio format requested from the downloader
pub const TARGET_FORMAT: &str = "mp3";

/// Where a strategy points the downloader
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyTarget {
    /// The submitted URL, unchanged
    Original,
    /// `https://<host>/watch?v=<video id>`
    Host(String),
}

/// One named, fully-parameterized retrieval attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strategy {
    /// Name used in logs and attempt records
    pub name: String,
    /// URL the downloader is pointed at
    pub target: StrategyTarget,
    /// Flags specific to this strategy
    pub extra_args: Vec<String>,
}

impl Strategy {
    /// Original URL through the egress proxy
    pub fn direct() -> Self {
        Self {
            name: "direct".to_string(),
            target: StrategyTarget::Original,
            extra_args: Vec::new(),
        }
    }

    /// Alternate front-end mirror
    pub fn mirror(host: &str) -> Self {
        Self {
            name: format!("mirror:{host}"),
            target: StrategyTarget::Host(host.to_string()),
            extra_args: Vec::new(),
        }
    }

    /// Original URL asking for any usable audio format
    pub fn generic_format() -> Self {
        Self {
            name: "generic-format".to_string(),
            target: StrategyTarget::Original,
            extra_args: args([
                "--format",
                "bestaudio[ext=m4a]/bestaudio/best",
                "--no-playlist",
                "--extractor-args",
                "youtube:skip_webpage=True",
            ]),
        }
    }

    /// Same upstream on an alternate domain
    pub fn alternate_domain(domain: &str) -> Self {
        Self {
            name: "alternate-domain".to_string(),
            target: StrategyTarget::Host(domain.to_string()),
            extra_args: args(["--no-playlist"]),
        }
    }

    /// Last-resort alternate front-end
    pub fn frontend(host: &str) -> Self {
        Self {
            name: format!("frontend:{host}"),
            target: StrategyTarget::Host(host.to_string()),
            extra_args: args(["--no-playlist", "--force-ipv4"]),
        }
    }

    /// URL handed to the downloader for `source`
    pub fn target_url(&self, source: &SourceVideo) -> String {
        match &self.target {
            StrategyTarget::Original => source.url.clone(),
            StrategyTarget::Host(host) => watch_url(host, &source.video_id),
        }
    }

    /// Full downloader argument list for one attempt
    pub fn build_args(
        &self,
        source: &SourceVideo,
        work_dir: &Path,
        params: &RetrievalConfig,
    ) -> Vec<String> {
        let mut out = args(["--extract-audio", "--audio-format", TARGET_FORMAT]);
        out.push("--audio-quality".to_string());
        out.push(params.audio_quality.clone());
        out.extend(args(["--no-warnings", "--ignore-errors"]));
        out.extend(network_args(params, true));
        out.extend(self.extra_args.iter().cloned());
        out.push("-o".to_string());
        out.push(output_template(work_dir).to_string_lossy().into_owned());
        out.push(self.target_url(source));
        out
    }
}

/// The standard ordered chain: direct, each mirror, generic format,
/// alternate domain, final front-end.
pub fn default_strategies(params: &RetrievalConfig) -> Vec<Strategy> {
    let mut strategies = vec![Strategy::direct()];
    strategies.extend(params.mirror_hosts.iter().map(|h| Strategy::mirror(h)));
    strategies.push(Strategy::generic_format());
    strategies.push(Strategy::alternate_domain(&params.alternate_domain));
    strategies.push(Strategy::frontend(&params.frontend_host));
    strategies
}

/// `<work_dir>/media.%(ext)s`; the downloader fills in the extension
pub fn output_template(work_dir: &Path) -> PathBuf {
    work_dir.join(format!("{OUTPUT_STEM}.%(ext)s"))
}

/// `https://<host>/watch?v=<id>`
pub fn watch_url(host: &str, video_id: &str) -> String {
    format!("https://{host}/watch?v={video_id}")
}

/// Flags shared by every upstream request: certificate/geo bypass, proxy,
/// optional rate limit and user agent.
pub(crate) fn network_args(params: &RetrievalConfig, with_rate_limit: bool) -> Vec<String> {
    let mut out = args(["--no-check-certificate", "--geo-bypass"]);
    if let Some(proxy) = &params.proxy_url {
        out.push("--proxy".to_string());
        out.push(proxy.clone());
    }
    if with_rate_limit && let Some(limit) = &params.rate_limit {
        out.push("--limit-rate".to_string());
        out.push(limit.clone());
    }
    out.push("--user-agent".to_string());
    out.push(params.user_agent.clone());
    out
}

fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
