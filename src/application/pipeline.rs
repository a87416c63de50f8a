//! News-to-signal cycle runner.
//!
//! One cycle: collect articles, score them (agent simulation or direct),
//! generate a signal, notify every stage. A fatal scoring error ends the
//! run; any other failure ends only the current cycle.

use crate::application::agents::{AgentPopulation, AggregationOutcome, CrowdAggregator};
use crate::application::signal::{SignalGenerator, format_signal_message};
use crate::domain::errors::PipelineError;
use crate::domain::ports::{NewsFeed, Notifier};
use crate::domain::signal::Signal;
use crate::infrastructure::observability::Metrics;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// How the scorechart is built from the scored articles.
#[derive(Debug, Clone)]
pub enum AnalysisMode {
    /// Plain sum of every article's scores.
    Direct,
    /// Sum of every agent's biased reaction.
    AgentSimulation(AgentPopulation),
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Nothing new was collected; no scoring happened.
    NoArticles,
    Completed(Signal),
}

pub struct Pipeline {
    feed: Arc<dyn NewsFeed>,
    crowd: CrowdAggregator,
    generator: SignalGenerator,
    notifier: Arc<dyn Notifier>,
    mode: AnalysisMode,
    rng: StdRng,
    metrics: Option<Metrics>,
}

impl Pipeline {
    pub fn new(
        feed: Arc<dyn NewsFeed>,
        crowd: CrowdAggregator,
        generator: SignalGenerator,
        notifier: Arc<dyn Notifier>,
        mode: AnalysisMode,
        rng: StdRng,
    ) -> Self {
        Self {
            feed,
            crowd,
            generator,
            notifier,
            mode,
            rng,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn mode(&self) -> &AnalysisMode {
        &self.mode
    }

    async fn notify(&self, message: &str) {
        self.notifier.notify(message).await;
    }

    /// Runs one collection → analysis → signal cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, PipelineError> {
        let result = self.cycle().await;

        let label = match &result {
            Ok(CycleOutcome::NoArticles) => "empty",
            Ok(CycleOutcome::Completed(_)) => "completed",
            Err(e) if e.is_fatal() => "fatal",
            Err(_) => "failed",
        };
        if let Some(metrics) = &self.metrics {
            metrics.inc_cycles(label);
            debug!("Pipeline: metrics\n{}", metrics.render());
        }

        result
    }

    async fn cycle(&mut self) -> Result<CycleOutcome, PipelineError> {
        self.notify("📰 Collecting news...").await;
        let articles = self
            .feed
            .fetch_articles()
            .await
            .map_err(PipelineError::Ingestion)?;

        if let Some(metrics) = &self.metrics {
            metrics.last_article_count.set(articles.len() as f64);
        }

        if articles.is_empty() {
            info!("Pipeline: no articles collected, skipping cycle");
            self.notify("⚠️ No news collected. Waiting for the next cycle.")
                .await;
            return Ok(CycleOutcome::NoArticles);
        }

        self.notify(&format!("✅ News collected ({} articles)", articles.len()))
            .await;

        let outcome: AggregationOutcome = match &self.mode {
            AnalysisMode::AgentSimulation(population) => {
                self.notifier
                    .notify(&format!(
                        "👥 Starting crowd analysis with {} agents...",
                        population.len()
                    ))
                    .await;
                self.crowd
                    .aggregate(&articles, population.agents(), &mut self.rng)
                    .await?
            }
            AnalysisMode::Direct => {
                self.notify("🤖 Starting direct analysis...").await;
                self.crowd.aggregate_direct(&articles).await?
            }
        };

        if outcome.has_degraded_articles() {
            self.notify(&format!(
                "⚠️ {} of {} articles could not be scored and count as no information:\n{}",
                outcome.fallback_links.len(),
                outcome.articles_scored,
                outcome.fallback_links.join("\n")
            ))
            .await;
        }

        self.notify(&format!(
            "✅ Analysis complete\nSector scores: {}",
            outcome.scorechart.summary()
        ))
        .await;

        self.notify("📊 Generating trading signal...").await;
        let signal = self.generator.generate(&outcome.scorechart);
        if let Some(metrics) = &self.metrics {
            metrics.inc_signals(&signal.action.to_string());
        }

        self.notify(&format_signal_message(&signal)).await;
        self.notify("💡 Review the signal and trade manually").await;

        Ok(CycleOutcome::Completed(signal))
    }

    /// Runs cycles every `interval` until a fatal error.
    ///
    /// # Errors
    /// Only [`PipelineError::Fatal`]; every other cycle error is notified and
    /// the loop continues.
    pub async fn run_forever(&mut self, interval: Duration) -> Result<(), PipelineError> {
        let mut iteration: u64 = 0;
        loop {
            iteration += 1;
            self.notify(&format!(
                "{bar}\n🔄 Iteration #{iteration}\n{bar}",
                bar = "=".repeat(60)
            ))
            .await;

            match self.run_cycle().await {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    error!("Pipeline: {}, stopping", e);
                    self.notify(&format!("❌ Fatal error: {}", e)).await;
                    return Err(e);
                }
                Err(e) => {
                    let report = anyhow::Error::new(e);
                    error!("Pipeline: cycle {} failed: {:#}", iteration, report);
                    self.notify(&format!(
                        "❌ Pipeline error in iteration #{}:\n{:#}",
                        iteration, report
                    ))
                    .await;
                }
            }

            self.notify(&format!("⏳ Waiting {}s...", interval.as_secs()))
                .await;
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::agents::PopulationConfig;
    use crate::application::sentiment::{RetryPolicy, SentimentScorer};
    use crate::domain::errors::ScoringError;
    use crate::domain::signal::SignalAction;
    use crate::infrastructure::mock::{
        FailingNewsFeed, MockSentimentBackend, RecordingNotifier, StaticNewsFeed,
    };
    use rand::SeedableRng;

    fn pipeline(
        backend: Arc<MockSentimentBackend>,
        feed: StaticNewsFeed,
        notifier: RecordingNotifier,
        mode: AnalysisMode,
    ) -> Pipeline {
        let policy = RetryPolicy {
            max_attempts: 2,
            retry_delay: Duration::ZERO,
            rate_limit_backoff: Duration::ZERO,
        };
        let scorer = Arc::new(SentimentScorer::new(backend, policy));
        Pipeline::new(
            Arc::new(feed),
            CrowdAggregator::new(scorer, Duration::ZERO),
            SignalGenerator::default(),
            Arc::new(notifier),
            mode,
            StdRng::seed_from_u64(7),
        )
    }

    #[tokio::test]
    async fn test_empty_feed_short_circuits() {
        let backend = Arc::new(MockSentimentBackend::keyword());
        let notifier = RecordingNotifier::new();
        let mut pipeline = pipeline(
            backend.clone(),
            StaticNewsFeed::new(Vec::new()),
            notifier.clone(),
            AnalysisMode::Direct,
        );

        let outcome = pipeline.run_cycle().await.unwrap();

        assert!(matches!(outcome, CycleOutcome::NoArticles));
        assert_eq!(backend.calls(), 0);
        assert!(notifier.messages().iter().any(|m| m.contains("No news collected")));
    }

    #[tokio::test]
    async fn test_direct_cycle_notifies_every_stage() {
        let backend = Arc::new(MockSentimentBackend::always(r#"{"Healthcare": 3}"#));
        let notifier = RecordingNotifier::new();
        let metrics = Metrics::new().unwrap();
        let mut pipeline = pipeline(
            backend.clone(),
            StaticNewsFeed::sample(),
            notifier.clone(),
            AnalysisMode::Direct,
        )
        .with_metrics(metrics.clone());

        let outcome = pipeline.run_cycle().await.unwrap();

        let CycleOutcome::Completed(signal) = outcome else {
            panic!("expected a signal");
        };
        assert_eq!(backend.calls(), 5);
        // 5 × 3 on one sector: single long candidate
        assert_eq!(signal.action, SignalAction::WeakSignal);
        assert_eq!(signal.long_positions[0].ticker, "XLV");

        let messages = notifier.messages();
        assert!(messages.iter().any(|m| m.contains("5 articles")));
        assert!(messages.iter().any(|m| m.contains("Healthcare: +15")));
        assert!(messages.iter().any(|m| m.contains("=== Trading signal generated ===")));
        assert!(messages.last().unwrap().contains("trade manually"));
        assert_eq!(
            metrics
                .pipeline_cycles_total
                .with_label_values(&["completed"])
                .get(),
            1.0
        );
    }

    #[tokio::test]
    async fn test_agent_cycle_scores_each_article_once() {
        let backend = Arc::new(MockSentimentBackend::keyword());
        let mut rng = StdRng::seed_from_u64(1);
        let population = AgentPopulation::construct(&PopulationConfig::default(), &mut rng);
        let mut pipeline = pipeline(
            backend.clone(),
            StaticNewsFeed::sample(),
            RecordingNotifier::new(),
            AnalysisMode::AgentSimulation(population),
        );

        let outcome = pipeline.run_cycle().await.unwrap();

        assert!(matches!(outcome, CycleOutcome::Completed(_)));
        assert_eq!(backend.calls(), 5);
    }

    #[tokio::test]
    async fn test_degraded_articles_are_notified() {
        let backend = Arc::new(MockSentimentBackend::scripted(vec![
            Err(ScoringError::Timeout),
            Err(ScoringError::Timeout),
        ]));
        let notifier = RecordingNotifier::new();
        let feed = StaticNewsFeed::new(StaticNewsFeed::sample().articles()[..1].to_vec());
        let mut pipeline = pipeline(backend, feed, notifier.clone(), AnalysisMode::Direct);

        let outcome = pipeline.run_cycle().await.unwrap();

        let CycleOutcome::Completed(signal) = outcome else {
            panic!("expected a signal");
        };
        assert_eq!(signal.action, SignalAction::Hold);
        assert!(
            notifier
                .messages()
                .iter()
                .any(|m| m.contains("could not be scored") && m.contains("article1"))
        );
    }

    #[tokio::test]
    async fn test_authentication_failure_is_fatal() {
        let backend = Arc::new(MockSentimentBackend::scripted(vec![Err(
            ScoringError::Authentication("invalid key".into()),
        )]));
        let mut pipeline = pipeline(
            backend,
            StaticNewsFeed::sample(),
            RecordingNotifier::new(),
            AnalysisMode::Direct,
        );

        let err = pipeline.run_cycle().await.unwrap_err();

        assert!(err.is_fatal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_forever_stops_on_fatal_error() {
        let backend = Arc::new(MockSentimentBackend::scripted(vec![Err(
            ScoringError::Authentication("revoked".into()),
        )]));
        let notifier = RecordingNotifier::new();
        let mut pipeline = pipeline(
            backend,
            StaticNewsFeed::sample(),
            notifier.clone(),
            AnalysisMode::Direct,
        );

        let err = pipeline
            .run_forever(Duration::from_secs(900))
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(notifier.messages().iter().any(|m| m.contains("Iteration #1")));
        assert!(notifier.messages().last().unwrap().contains("Fatal error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_forever_continues_after_feed_failure() {
        let feed = Arc::new(FailingNewsFeed::new(
            1,
            "feed host unreachable: dns lookup failed",
            StaticNewsFeed::sample().articles().to_vec(),
        ));
        // Second cycle gets articles, then stops on a revoked key
        let backend = Arc::new(MockSentimentBackend::scripted(vec![Err(
            ScoringError::Authentication("revoked".into()),
        )]));
        let notifier = RecordingNotifier::new();
        let scorer = Arc::new(SentimentScorer::new(backend, RetryPolicy::default()));
        let mut pipeline = Pipeline::new(
            feed.clone(),
            CrowdAggregator::new(scorer, Duration::ZERO),
            SignalGenerator::default(),
            Arc::new(notifier.clone()),
            AnalysisMode::Direct,
            StdRng::seed_from_u64(7),
        );

        let err = pipeline
            .run_forever(Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(feed.fetches(), 2);
        let messages = notifier.messages();
        let failure = messages
            .iter()
            .find(|m| m.contains("Pipeline error in iteration #1"))
            .expect("failure notification");
        assert!(failure.contains("News collection failed: feed host unreachable: dns lookup failed"));
        assert!(messages.iter().any(|m| m.contains("Iteration #2")));
    }
}
