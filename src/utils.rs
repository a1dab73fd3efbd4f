//! Utility functions for external processes, file operations and filenames

use crate::error::{Error, Result};
use crate::retrieval::ToolOutput;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Longest sanitized title kept in a download filename
const MAX_TITLE_CHARS: usize = 150;

/// Fallback stem when a title sanitizes to nothing
const FALLBACK_TITLE: &str = "audio";

/// Longest stderr excerpt carried in an error message
const MAX_STDERR_EXCERPT: usize = 300;

/// Run an external tool to completion, killing it if `timeout` elapses.
///
/// A non-zero exit status becomes [`Error::ExternalTool`] carrying the last
/// line of stderr; a timeout becomes [`Error::Timeout`].
pub(crate) async fn run_tool(
    binary: &Path,
    tool: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ToolOutput> {
    let child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(Error::ExternalTool(format!("failed to execute {tool}: {e}")));
        }
        Err(_) => {
            return Err(Error::Timeout {
                tool: tool.to_string(),
                timeout,
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let status = output
            .status
            .code()
            .map(|c| format!("exit code {c}"))
            .unwrap_or_else(|| "a signal".to_string());
        return Err(Error::ExternalTool(format!(
            "{tool} terminated with {status}: {}",
            stderr_excerpt(&stderr)
        )));
    }

    Ok(ToolOutput { stdout, stderr })
}

/// Last non-empty stderr line, truncated
pub(crate) fn stderr_excerpt(stderr: &str) -> String {
    let line = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no error output");
    line.chars().take(MAX_STDERR_EXCERPT).collect()
}

/// Turn a free-form title into a filename stem that is safe on disk and in a
/// `Content-Disposition` header.
///
/// Keeps ASCII letters, digits, underscores and whitespace; whitespace runs
/// collapse to a single space. The result is deterministic and never empty.
///
/// # Examples
///
/// ```
/// use audiograb::utils::sanitize_title;
///
/// assert_eq!(
///     sanitize_title("AC/DC - Back in Black (Official)"),
///     "ACDC Back in Black Official"
/// );
/// assert_eq!(sanitize_title("???"), "audio");
/// ```
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    let truncated = truncated.trim_end();

    if truncated.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        truncated.to_string()
    }
}

/// Find the first `<dir>/<stem>.<ext>` that exists, probing `extensions` in order.
pub async fn locate_output(dir: &Path, stem: &str, extensions: &[String]) -> Option<PathBuf> {
    for ext in extensions {
        let candidate = dir.join(format!("{stem}.{ext}"));
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Some(candidate);
        }
    }
    None
}

/// Whether `path` already has extension `ext` (case-insensitive)
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Move a file, falling back to copy + delete when a rename crosses filesystems
pub async fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if tokio::fs::rename(source, dest).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(source, dest).await?;
    tokio::fs::remove_file(source).await?;
    Ok(())
}

/// Empty a directory, creating it if needed
pub async fn reset_dir(dir: &Path) -> Result<()> {
    remove_dir_if_exists(dir).await?;
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Remove a directory tree; a missing directory is not an error
pub async fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Remove a file. Returns `false` if it was already gone.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Replace every occurrence of `secret` in `text`
#[must_use]
pub fn redact(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, "<redacted>"),
        _ => text.to_string(),
    }
}
