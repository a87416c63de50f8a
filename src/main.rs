//! CrowdSignal - headless sector sentiment pipeline
//!
//! Collects financial news, scores every article per market sector, optionally
//! replays the scores through a simulated investor crowd, and publishes a
//! long/short sector ETF signal every cycle.
//!
//! # Usage
//! ```sh
//! MODE=mock cargo run -- --once
//! ```

use anyhow::Result;
use clap::Parser;
use crowdsignal::application::bootstrap::PipelineBootstrap;
use crowdsignal::config::Config;
use crowdsignal::infrastructure::observability::Metrics;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
#[command(version, about = "Sector sentiment signals from financial news")]
struct Cli {
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Seed for agent construction and article sampling (overrides AGENT_SEED)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    info!("CrowdSignal {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    config.validate()?;
    info!(
        "Configuration loaded: Mode={:?}, Feeds={}, AgentSimulation={}, Interval={:?}",
        config.pipeline.mode,
        config.pipeline.rss_feeds.len(),
        config.agents.use_agent_simulation,
        config.pipeline.loop_interval
    );

    let metrics = Metrics::new()?;
    let mut pipeline = PipelineBootstrap::init(&config, metrics, cli.seed);

    if cli.once {
        pipeline.run_cycle().await?;
        return Ok(());
    }

    tokio::select! {
        result = pipeline.run_forever(config.pipeline.loop_interval) => {
            if let Err(e) = result {
                error!("CrowdSignal stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, exiting.");
        }
    }

    Ok(())
}
