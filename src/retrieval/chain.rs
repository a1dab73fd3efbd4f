//! Ordered fallback over retrieval strategies

use super::source::SourceVideo;
use super::strategy::{Strategy, default_strategies};
use super::traits::MediaDownloader;
use crate::config::RetrievalConfig;
use crate::error::{Error, PipelineError, Result};
use crate::types::{AttemptOutcome, StrategyAttempt};
use crate::utils::{redact, reset_dir};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a successful chain run
#[derive(Clone, Debug)]
pub struct RetrievedMedia {
    /// Name of the strategy that produced the media
    pub strategy: String,
    /// Every attempt made, in order; the last one succeeded
    pub attempts: Vec<StrategyAttempt>,
}

/// Runs strategies in order until one succeeds
#[derive(Clone)]
pub struct StrategyChain {
    downloader: Arc<dyn MediaDownloader>,
    strategies: Vec<Strategy>,
    params: RetrievalConfig,
    timeout: Duration,
}

impl StrategyChain {
    /// Create a chain with an explicit strategy list
    pub fn new(
        downloader: Arc<dyn MediaDownloader>,
        strategies: Vec<Strategy>,
        params: RetrievalConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            downloader,
            strategies,
            params,
            timeout,
        }
    }

    /// Create a chain with the standard strategy order
    pub fn from_config(
        downloader: Arc<dyn MediaDownloader>,
        params: &RetrievalConfig,
        timeout: Duration,
    ) -> Self {
        Self::new(downloader, default_strategies(params), params.clone(), timeout)
    }

    /// Strategies in the order they are tried
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Try each strategy until one exits successfully.
    ///
    /// `work_dir` is emptied before every attempt so partial output from a
    /// failed strategy never reaches the next one. `on_attempt` sees every
    /// attempt as it finishes.
    pub async fn retrieve(
        &self,
        source: &SourceVideo,
        work_dir: &Path,
        mut on_attempt: impl FnMut(&StrategyAttempt) + Send,
    ) -> Result<RetrievedMedia> {
        let total = self.strategies.len();
        let mut attempts = Vec::with_capacity(total);
        let secret = self.params.proxy_url.as_deref();

        info!(
            video_id = %source.video_id,
            strategies = total,
            "starting retrieval"
        );

        for (i, strategy) in self.strategies.iter().enumerate() {
            reset_dir(work_dir).await?;

            debug!(
                video_id = %source.video_id,
                attempt = i + 1,
                total,
                strategy = %strategy.name,
                "trying strategy {}/{}",
                i + 1,
                total
            );

            let args = strategy.build_args(source, work_dir, &self.params);
            let outcome = match self.downloader.run(&args, self.timeout).await {
                Ok(_) => AttemptOutcome::Success,
                Err(e) => AttemptOutcome::Failure {
                    reason: redact(&e.to_string(), secret),
                },
            };

            let attempt = StrategyAttempt {
                position: i + 1,
                strategy: strategy.name.clone(),
                outcome,
            };
            on_attempt(&attempt);

            match &attempt.outcome {
                AttemptOutcome::Success => {
                    info!(
                        video_id = %source.video_id,
                        attempt = i + 1,
                        strategy = %strategy.name,
                        "retrieval succeeded"
                    );
                    attempts.push(attempt);
                    return Ok(RetrievedMedia {
                        strategy: strategy.name.clone(),
                        attempts,
                    });
                }
                AttemptOutcome::Failure { reason } => {
                    warn!(
                        video_id = %source.video_id,
                        attempt = i + 1,
                        strategy = %strategy.name,
                        %reason,
                        "strategy failed"
                    );
                }
            }
            attempts.push(attempt);
        }

        let reason = attempts
            .last()
            .and_then(|a| match &a.outcome {
                AttemptOutcome::Failure { reason } => Some(reason.clone()),
                AttemptOutcome::Success => None,
            })
            .unwrap_or_else(|| "no retrieval strategies configured".to_string());

        Err(Error::Pipeline(PipelineError::RetrievalFailed {
            attempts: attempts.len(),
            reason,
        }))
    }
}
