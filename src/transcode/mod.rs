//! Conversion of raw media to the target audio format
//!
//! Retrieval usually yields an mp3 already (yt-dlp post-processes with its own
//! ffmpeg call), but some strategies hand back m4a/webm/opus. Those go through
//! a [`Transcoder`]:
//!
//! - [`CliTranscoder`]: runs the external `ffmpeg` binary
//! - [`UnavailableTranscoder`]: stand-in when ffmpeg cannot be found
//!
//! ```no_run
//! use audiograb::transcode::{CliTranscoder, Transcoder};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ffmpeg = CliTranscoder::from_path().expect("ffmpeg not found in PATH");
//! ffmpeg
//!     .transcode(Path::new("media.m4a"), Path::new("out.mp3"), Duration::from_secs(600))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod cli;
mod noop;
mod traits;

pub use cli::CliTranscoder;
pub use noop::UnavailableTranscoder;
pub use traits::Transcoder;
