//! Per-article sector scoring with retry and zero fallback.
//!
//! One backend call per attempt. Recoverable failures are retried:
//! rate limiting waits `attempt × rate_limit_backoff`, everything else waits
//! the fixed `retry_delay`. Authentication failure is returned immediately as
//! a fatal error. When every attempt fails the article gets an all-zero map
//! tagged [`ScoreSource::Fallback`], which callers must read as "no
//! information" rather than neutral sentiment.

use crate::application::sentiment::prompt::ScoringPrompt;
use crate::domain::article::Article;
use crate::domain::errors::ScoringError;
use crate::domain::ports::SentimentBackend;
use crate::domain::scores::SectorScores;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed wait after transport, timeout, API and format errors.
    pub retry_delay: Duration,
    /// Unit of the linear rate-limit backoff.
    pub rate_limit_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            rate_limit_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following a failed 1-based `attempt`, or
    /// `None` when the failure must not be retried.
    pub fn delay_after(&self, error: &ScoringError, attempt: u32) -> Option<Duration> {
        if error.is_fatal() || attempt >= self.max_attempts {
            return None;
        }
        if error.is_rate_limit() {
            Some(self.rate_limit_backoff * attempt)
        } else {
            Some(self.retry_delay)
        }
    }
}

/// Where an article's scores came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSource {
    Backend { attempts: u32 },
    /// Every attempt failed; the scores are all zero and carry no information.
    Fallback { attempts: u32, last_error: ScoringError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleScore {
    pub scores: SectorScores,
    pub source: ScoreSource,
}

impl ArticleScore {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ScoreSource::Fallback { .. })
    }
}

pub struct SentimentScorer {
    backend: Arc<dyn SentimentBackend>,
    policy: RetryPolicy,
    metrics: Option<Metrics>,
}

impl SentimentScorer {
    pub fn new(backend: Arc<dyn SentimentBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn score_article(&self, article: &Article) -> Result<ArticleScore, ScoringError> {
        self.score(&article.scoring_text(), &article.source, &article.published)
            .await
    }

    /// Scores one article text across all sectors.
    ///
    /// # Errors
    /// Only fatal backend errors (authentication) are returned; every other
    /// failure ends in a zero fallback.
    pub async fn score(
        &self,
        article_text: &str,
        source: &str,
        date: &str,
    ) -> Result<ArticleScore, ScoringError> {
        let prompt = ScoringPrompt::build(article_text, source, date);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = self
                .backend
                .complete_json(&prompt)
                .await
                .and_then(|body| SectorScores::from_backend_json(&body));

            let err = match result {
                Ok(scores) => {
                    self.record("success");
                    return Ok(ArticleScore {
                        scores,
                        source: ScoreSource::Backend { attempts: attempt },
                    });
                }
                Err(err) => err,
            };

            if err.is_fatal() {
                error!(
                    "SentimentScorer: {} authentication failed, check the API key: {}",
                    self.backend.name(),
                    err
                );
                return Err(err);
            }

            match self.policy.delay_after(&err, attempt) {
                Some(delay) if attempt < max_attempts => {
                    warn!(
                        "SentimentScorer: {} (attempt {}/{}), retrying in {:?}",
                        err, attempt, max_attempts, delay
                    );
                    self.record("retry");
                    tokio::time::sleep(delay).await;
                }
                _ => {
                    warn!(
                        "SentimentScorer: giving up after {} attempts [{}], scoring 0 (NO INFORMATION): {}",
                        attempt, source, err
                    );
                    self.record("fallback");
                    return Ok(ArticleScore {
                        scores: SectorScores::zero(),
                        source: ScoreSource::Fallback {
                            attempts: attempt,
                            last_error: err,
                        },
                    });
                }
            }
        }
    }

    fn record(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_scoring(outcome);
            if outcome != "retry" {
                metrics.articles_scored_total.inc();
            }
        }
    }
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("backend", &self.backend.name())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Logs a one-line summary of a scored article.
pub fn log_article_score(index: usize, total: usize, article: &Article, score: &ArticleScore) {
    match &score.source {
        ScoreSource::Backend { attempts } => info!(
            "SentimentScorer: ({}/{}) [{}] scored in {} attempt(s): {}",
            index, total, article.source, attempts, score.scores.summary()
        ),
        ScoreSource::Fallback { last_error, .. } => warn!(
            "SentimentScorer: ({}/{}) [{}] {} degraded to zero: {}",
            index, total, article.source, article.link, last_error
        ),
    }
}
