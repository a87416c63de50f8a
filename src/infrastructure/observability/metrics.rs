//! Prometheus metrics definitions for CrowdSignal
//!
//! All metrics use the `crowdsignal_` prefix and are read-only.

use prometheus::{
    Counter, CounterVec, Gauge, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the news pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Scoring backend calls by outcome (success, retry, fallback)
    pub scoring_calls_total: CounterVec,
    /// Articles that went through phase-one scoring
    pub articles_scored_total: Counter,
    /// Articles collected in the last cycle
    pub last_article_count: GenericGauge<AtomicF64>,
    /// Signals generated by action
    pub signals_total: CounterVec,
    /// Pipeline cycles by result (completed, empty, failed)
    pub pipeline_cycles_total: CounterVec,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let scoring_calls_total = CounterVec::new(
            Opts::new(
                "crowdsignal_scoring_calls_total",
                "Sentiment scoring calls by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(scoring_calls_total.clone()))?;

        let articles_scored_total = Counter::with_opts(Opts::new(
            "crowdsignal_articles_scored_total",
            "Total articles scored",
        ))?;
        registry.register(Box::new(articles_scored_total.clone()))?;

        let last_article_count = Gauge::with_opts(Opts::new(
            "crowdsignal_last_article_count",
            "Articles collected in the last cycle",
        ))?;
        registry.register(Box::new(last_article_count.clone()))?;

        let signals_total = CounterVec::new(
            Opts::new("crowdsignal_signals_total", "Signals generated by action"),
            &["action"],
        )?;
        registry.register(Box::new(signals_total.clone()))?;

        let pipeline_cycles_total = CounterVec::new(
            Opts::new(
                "crowdsignal_pipeline_cycles_total",
                "Pipeline cycles by result",
            ),
            &["result"],
        )?;
        registry.register(Box::new(pipeline_cycles_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            scoring_calls_total,
            articles_scored_total,
            last_article_count,
            signals_total,
            pipeline_cycles_total,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_scoring(&self, outcome: &str) {
        self.scoring_calls_total.with_label_values(&[outcome]).inc();
    }

    pub fn inc_signals(&self, action: &str) {
        self.signals_total.with_label_values(&[action]).inc();
    }

    pub fn inc_cycles(&self, result: &str) {
        self.pipeline_cycles_total.with_label_values(&[result]).inc();
    }

    /// Current count for a scoring outcome label
    pub fn scoring_count(&self, outcome: &str) -> f64 {
        self.scoring_calls_total.with_label_values(&[outcome]).get()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create default Metrics")
    }
}
