use crate::application::agents::{AgentPopulation, CrowdAggregator};
use crate::application::pipeline::{AnalysisMode, Pipeline};
use crate::application::sentiment::SentimentScorer;
use crate::application::signal::SignalGenerator;
use crate::config::Config;
use crate::infrastructure::factory::ServiceFactory;
use crate::infrastructure::observability::Metrics;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::info;

pub struct PipelineBootstrap;

impl PipelineBootstrap {
    /// Wires the configured collaborators into a ready pipeline.
    ///
    /// `seed` overrides `AGENT_SEED`; without either the RNG is seeded from
    /// the OS.
    pub fn init(config: &Config, metrics: Metrics, seed: Option<u64>) -> Pipeline {
        let (backend, feed) = ServiceFactory::create_services(config);
        let notifier = ServiceFactory::create_notifier(config);

        info!(
            "PipelineBootstrap: backend={} mode={:?} retries={} throttle={:?}",
            backend.name(),
            config.pipeline.mode,
            config.scoring.retry.max_attempts,
            config.scoring.throttle
        );

        let scorer = Arc::new(
            SentimentScorer::new(backend, config.scoring.retry).with_metrics(metrics.clone()),
        );
        let crowd = CrowdAggregator::new(scorer, config.scoring.throttle);

        let mut rng = match seed.or(config.agents.seed) {
            Some(seed) => {
                info!("PipelineBootstrap: using fixed seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };

        let mode = if config.agents.use_agent_simulation {
            AnalysisMode::AgentSimulation(AgentPopulation::construct(
                &config.agents.population,
                &mut rng,
            ))
        } else {
            info!("PipelineBootstrap: agent simulation disabled, using direct analysis");
            AnalysisMode::Direct
        };

        Pipeline::new(
            feed,
            crowd,
            SignalGenerator::new(config.signal),
            notifier,
            mode,
            rng,
        )
        .with_metrics(metrics)
    }
}
