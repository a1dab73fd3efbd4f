//! Media retrieval through yt-dlp
//!
//! This module owns everything that talks to the upstream video host:
//! - [`source`]: URL validation and video id extraction
//! - [`strategy`]: the ordered list of retrieval strategies, as data
//! - [`chain`]: the attempt loop that stops at the first success
//! - [`metadata`]: best-effort title lookup
//!
//! The downloader itself sits behind the [`MediaDownloader`] trait with a
//! CLI implementation and an unavailable fallback.

pub mod chain;
pub mod cli;
pub mod metadata;
pub mod noop;
pub mod source;
pub mod strategy;
pub mod traits;

pub use chain::{RetrievedMedia, StrategyChain};
pub use cli::CliDownloader;
pub use metadata::{VideoMetadata, fetch_metadata, placeholder_title};
pub use noop::UnavailableDownloader;
pub use source::{SourceVideo, validate_source_url};
pub use strategy::{Strategy, StrategyTarget, default_strategies};
pub use traits::{MediaDownloader, ToolOutput};
