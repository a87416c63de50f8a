//! Crowd aggregation
//!
//! Phase 1 scores every article once, keyed by link. Phase 2 replays each
//! agent's selection and bias over the cached scores and sums the reactions
//! into one scorechart. Phase 2 never starts before phase 1 has finished, and
//! the running total is only touched sequentially.

use crate::application::agents::investor_agent::InvestorAgent;
use crate::application::sentiment::scorer::{ArticleScore, SentimentScorer, log_article_score};
use crate::domain::article::Article;
use crate::domain::errors::ScoringError;
use crate::domain::scores::SectorScores;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-run score cache, keyed by article link.
pub type ScoreCache = HashMap<String, ArticleScore>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationOutcome {
    pub scorechart: SectorScores,
    /// Distinct articles sent to the scorer.
    pub articles_scored: usize,
    /// Links whose scores fell back to zero (no information).
    pub fallback_links: Vec<String>,
}

impl AggregationOutcome {
    fn empty() -> Self {
        Self {
            scorechart: SectorScores::zero(),
            articles_scored: 0,
            fallback_links: Vec::new(),
        }
    }

    pub fn has_degraded_articles(&self) -> bool {
        !self.fallback_links.is_empty()
    }
}

pub struct CrowdAggregator {
    scorer: Arc<SentimentScorer>,
    /// Pause after each scoring call to respect the backend's rate limits.
    throttle: Duration,
}

impl CrowdAggregator {
    pub fn new(scorer: Arc<SentimentScorer>, throttle: Duration) -> Self {
        Self { scorer, throttle }
    }

    /// Phase 1: scores each distinct link once, in input order.
    ///
    /// # Errors
    /// Fatal scoring errors abort the phase.
    pub async fn score_articles(&self, articles: &[Article]) -> Result<ScoreCache, ScoringError> {
        let mut cache = ScoreCache::with_capacity(articles.len());
        let total = articles.len();

        for (i, article) in articles.iter().enumerate() {
            if cache.contains_key(&article.link) {
                debug!("CrowdAggregator: {} already scored, skipping", article.link);
                continue;
            }

            let score = self.scorer.score_article(article).await?;
            log_article_score(i + 1, total, article, &score);
            cache.insert(article.link.clone(), score);

            if !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }
        }

        Ok(cache)
    }

    /// Sums every agent's biased reaction to the articles it selects.
    ///
    /// Zero articles yields the all-zero chart without any scoring call.
    pub async fn aggregate<R: Rng + ?Sized>(
        &self,
        articles: &[Article],
        agents: &[InvestorAgent],
        rng: &mut R,
    ) -> Result<AggregationOutcome, ScoringError> {
        if articles.is_empty() {
            info!("CrowdAggregator: no articles, skipping analysis");
            return Ok(AggregationOutcome::empty());
        }

        info!(
            "CrowdAggregator: scoring {} articles once for {} agents",
            articles.len(),
            agents.len()
        );
        let cache = self.score_articles(articles).await?;

        let scorechart = react(&cache, articles, agents, rng);
        info!("CrowdAggregator: crowd scorechart {}", scorechart.summary());

        Ok(outcome(scorechart, &cache))
    }

    /// Direct mode: the plain sum of every article's scores, no agents.
    pub async fn aggregate_direct(
        &self,
        articles: &[Article],
    ) -> Result<AggregationOutcome, ScoringError> {
        if articles.is_empty() {
            info!("CrowdAggregator: no articles, skipping analysis");
            return Ok(AggregationOutcome::empty());
        }

        let cache = self.score_articles(articles).await?;
        let scorechart: SectorScores = cache.values().map(|s| &s.scores).sum();
        Ok(outcome(scorechart, &cache))
    }
}

/// Phase 2 over an already complete cache.
pub fn react<R: Rng + ?Sized>(
    cache: &ScoreCache,
    articles: &[Article],
    agents: &[InvestorAgent],
    rng: &mut R,
) -> SectorScores {
    let mut scorechart = SectorScores::zero();

    for agent in agents {
        let mut reaction = SectorScores::zero();
        for article in agent.select_articles(articles, rng) {
            match cache.get(&article.link) {
                Some(score) => reaction += agent.apply_bias(&score.scores),
                None => warn!(
                    "CrowdAggregator: agent #{} selected unscored article {}",
                    agent.agent_id, article.link
                ),
            }
        }
        debug!(
            "CrowdAggregator: agent #{} ({}) reaction {}",
            agent.agent_id,
            agent.kind(),
            reaction.summary()
        );
        scorechart += &reaction;
    }

    scorechart
}

fn outcome(scorechart: SectorScores, cache: &ScoreCache) -> AggregationOutcome {
    let mut fallback_links: Vec<String> = cache
        .iter()
        .filter(|(_, score)| score.is_fallback())
        .map(|(link, _)| link.clone())
        .collect();
    fallback_links.sort();

    if !fallback_links.is_empty() {
        warn!(
            "CrowdAggregator: {} of {} articles carry no information (scoring fell back to zero)",
            fallback_links.len(),
            cache.len()
        );
    }

    AggregationOutcome {
        scorechart,
        articles_scored: cache.len(),
        fallback_links,
    }
}
