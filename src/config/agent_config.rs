//! Agent simulation configuration parsing from environment variables.

use crate::application::agents::PopulationConfig;
use crate::application::agents::population::{SampleSizes, VariantRatios};
use crate::config::env::EnvSource;
use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentEnvConfig {
    /// Crowd simulation instead of the plain per-article sum.
    pub use_agent_simulation: bool,
    pub population: PopulationConfig,
    /// Fixed seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
}

impl AgentEnvConfig {
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let ratios = VariantRatios::default();
        let sizes = SampleSizes::default();

        Ok(Self {
            use_agent_simulation: env.flag("USE_AGENT_SIMULATION", false),
            population: PopulationConfig {
                total_agents: env.parse("NUM_AGENTS", 100)?,
                ratios: VariantRatios {
                    informed: env.parse("INFORMED_RATIO", ratios.informed)?,
                    biased: env.parse("BIASED_RATIO", ratios.biased)?,
                    impulsive: env.parse("IMPULSIVE_RATIO", ratios.impulsive)?,
                },
                sample_sizes: SampleSizes {
                    informed: env.parse("INFORMED_SAMPLE_SIZE", sizes.informed)?,
                    biased: env.parse("BIASED_SAMPLE_SIZE", sizes.biased)?,
                    impulsive: env.parse("IMPULSIVE_SAMPLE_SIZE", sizes.impulsive)?,
                },
            },
            seed: env.parse_optional("AGENT_SEED")?,
        })
    }
}
