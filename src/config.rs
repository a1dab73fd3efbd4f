//! Configuration types for audiograb

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Local storage and retention settings
///
/// Groups settings for where media lands and how long it stays.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for work files and published artifacts (default: "./temp")
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// How long a published artifact stays downloadable (default: 1 hour)
    #[serde(default = "default_retention", with = "duration_serde")]
    pub retention: Duration,

    /// How long a finished job without an artifact stays queryable (default: 1 hour)
    #[serde(default = "default_retention", with = "duration_serde")]
    pub job_retention: Duration,

    /// Interval between expiry sweeps (default: 15 minutes)
    #[serde(default = "default_sweep_interval", with = "duration_serde")]
    pub sweep_interval: Duration,

    /// Maximum pipelines running external tools at once (default: 4)
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            retention: default_retention(),
            job_retention: default_retention(),
            sweep_interval: default_sweep_interval(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

impl StorageConfig {
    /// Directory holding per-job scratch directories
    pub fn work_root(&self) -> PathBuf {
        self.temp_dir.join("work")
    }
}

/// External tool paths and time budgets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub downloader_path: Option<PathBuf>,

    /// Path to ffmpeg executable (auto-detected if None)
    #[serde(default)]
    pub transcoder_path: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Wall-clock budget for one retrieval strategy or transcode (default: 10 minutes)
    #[serde(default = "default_process_timeout", with = "duration_serde")]
    pub process_timeout: Duration,

    /// Wall-clock budget for one metadata lookup (default: 60 seconds)
    #[serde(default = "default_metadata_timeout", with = "duration_serde")]
    pub metadata_timeout: Duration,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            downloader_path: None,
            transcoder_path: None,
            search_path: true,
            process_timeout: default_process_timeout(),
            metadata_timeout: default_metadata_timeout(),
        }
    }
}

/// Retrieval strategy parameters
///
/// These feed the ordered strategy list built by
/// [`StrategyChain::from_config`](crate::retrieval::StrategyChain::from_config).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Egress proxy URL passed to the downloader (None = direct)
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// User agent presented upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Download rate limit in yt-dlp syntax, e.g. "500K" (None = unlimited)
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<String>,

    /// Audio quality passed to `--audio-quality` (default: "0", best VBR)
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,

    /// Alternate front-end mirrors, tried in this order
    #[serde(default = "default_mirror_hosts")]
    pub mirror_hosts: Vec<String>,

    /// Alternate domain for the same upstream (default: "music.youtube.com")
    #[serde(default = "default_alternate_domain")]
    pub alternate_domain: String,

    /// Final alternate front-end (default: "piped.video")
    #[serde(default = "default_frontend_host")]
    pub frontend_host: String,

    /// Extensions probed after retrieval, in preference order (target format first)
    #[serde(default = "default_candidate_extensions")]
    pub candidate_extensions: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            user_agent: default_user_agent(),
            rate_limit: default_rate_limit(),
            audio_quality: default_audio_quality(),
            mirror_hosts: default_mirror_hosts(),
            alternate_domain: default_alternate_domain(),
            frontend_host: default_frontend_host(),
            candidate_extensions: default_candidate_extensions(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Main configuration for [`JobManager`](crate::JobManager) and the API server
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage and retention
    #[serde(default)]
    pub storage: StorageConfig,

    /// External tools
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Retrieval strategy parameters
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// API server
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Temporary directory
    pub fn temp_dir(&self) -> &PathBuf {
        &self.storage.temp_dir
    }

    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("cannot parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall the service
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_concurrent_jobs == 0 {
            return Err(config_error(
                "max_concurrent_jobs must be at least 1",
                "storage.max_concurrent_jobs",
            ));
        }
        if self.tools.process_timeout.is_zero() {
            return Err(config_error(
                "process_timeout must be non-zero",
                "tools.process_timeout",
            ));
        }
        if self.tools.metadata_timeout.is_zero() {
            return Err(config_error(
                "metadata_timeout must be non-zero",
                "tools.metadata_timeout",
            ));
        }
        if self.storage.sweep_interval.is_zero() {
            return Err(config_error(
                "sweep_interval must be non-zero",
                "storage.sweep_interval",
            ));
        }
        if self.retrieval.candidate_extensions.is_empty() {
            return Err(config_error(
                "at least one candidate extension is required",
                "retrieval.candidate_extensions",
            ));
        }
        if let Some(proxy) = &self.retrieval.proxy_url
            && url::Url::parse(proxy).is_err()
        {
            // Never echo the value: proxy URLs carry credentials.
            return Err(config_error("proxy_url is not a valid URL", "retrieval.proxy_url"));
        }
        Ok(())
    }

    /// Apply deployment overrides read through `lookup` (normally
    /// `std::env::var`), then re-validate.
    ///
    /// - `PORT`: listen port; the bind host is kept
    /// - `AUDIOGRAB_PROXY_URL`: egress proxy; empty clears it
    /// - `AUDIOGRAB_TEMP_DIR`: storage root
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| config_error("PORT must be a port number", "server.api.bind_address"))?;
            self.server.api.bind_address.set_port(port);
        }
        if let Some(proxy) = lookup("AUDIOGRAB_PROXY_URL") {
            let proxy = proxy.trim();
            self.retrieval.proxy_url = (!proxy.is_empty()).then(|| proxy.to_string());
        }
        if let Some(dir) = lookup("AUDIOGRAB_TEMP_DIR")
            && !dir.trim().is_empty()
        {
            self.storage.temp_dir = PathBuf::from(dir.trim());
        }
        self.validate()
    }
}

fn config_error(message: &str, key: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("./temp")
}

fn default_retention() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_max_concurrent_jobs() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_process_timeout() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_metadata_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_rate_limit() -> Option<String> {
    Some("500K".to_string())
}

fn default_audio_quality() -> String {
    "0".to_string()
}

fn default_mirror_hosts() -> Vec<String> {
    vec![
        "yewtu.be".into(),
        "invidious.snopyta.org".into(),
        "vid.puffyan.us".into(),
        "invidious.kavin.rocks".into(),
        "invidious.namazso.eu".into(),
        "inv.riverside.rocks".into(),
    ]
}

fn default_alternate_domain() -> String {
    "music.youtube.com".to_string()
}

fn default_frontend_host() -> String {
    "piped.video".to_string()
}

fn default_candidate_extensions() -> Vec<String> {
    vec![
        "mp3".into(),
        "m4a".into(),
        "webm".into(),
        "opus".into(),
        "mp4".into(),
    ]
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
