//! Configuration module for CrowdSignal.
//!
//! Structured configuration loaded from environment variables (optionally a
//! `.env` file), organized by concern: Scoring, Agents, Signal and Pipeline.

mod agent_config;
pub mod env;
mod pipeline_config;
mod scoring_config;
mod signal_config;

pub use agent_config::AgentEnvConfig;
pub use env::{EnvSource, ProcessEnv};
pub use pipeline_config::{Mode, PipelineEnvConfig};
pub use scoring_config::{KNOWN_MODELS, ScoringEnvConfig};
pub use signal_config::signal_config_from_source;

use crate::application::signal::SignalConfig;
use anyhow::{Context, Result, bail};
use tracing::warn;

/// Loop intervals below this many seconds get a cost warning.
const MIN_SENSIBLE_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub scoring: ScoringEnvConfig,
    pub agents: AgentEnvConfig,
    pub signal: SignalConfig,
    pub pipeline: PipelineEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        Ok(Self {
            scoring: ScoringEnvConfig::from_source(env).context("Failed to load scoring config")?,
            agents: AgentEnvConfig::from_source(env).context("Failed to load agent config")?,
            signal: signal_config_from_source(env).context("Failed to load signal config")?,
            pipeline: PipelineEnvConfig::from_source(env)
                .context("Failed to load pipeline config")?,
        })
    }

    /// Rejects configurations the pipeline cannot run with and logs the
    /// questionable ones.
    pub fn validate(&self) -> Result<()> {
        let pipeline = &self.pipeline;

        if pipeline.mode == Mode::OpenAi {
            if self.scoring.openai.api_key.is_empty() {
                bail!("Missing required setting: OPENAI_API_KEY");
            }
            if !self.scoring.openai.api_key.starts_with("sk-") {
                bail!("Invalid OPENAI_API_KEY: must start with 'sk-'");
            }
            if pipeline.rss_feeds.is_empty() {
                bail!("RSS_FEEDS must list at least one feed URL");
            }
        }

        if self.signal.num_long < 1 {
            bail!("NUM_LONG_POSITIONS must be at least 1");
        }
        if self.signal.num_short < 1 {
            bail!("NUM_SHORT_POSITIONS must be at least 1");
        }
        if pipeline.news_limit_per_feed < 1 {
            bail!("NEWS_LIMIT_PER_FEED must be at least 1");
        }
        if self.scoring.retry.max_attempts < 1 {
            bail!("MAX_RETRIES must be at least 1");
        }

        let ratios = &self.agents.population.ratios;
        if ratios.informed < 0.0 || ratios.biased < 0.0 || ratios.impulsive < 0.0 {
            bail!("Agent ratios must be non-negative");
        }
        if ratios.informed + ratios.biased + ratios.impulsive <= 0.0 {
            bail!("Agent ratios must sum to a positive number");
        }
        if self.agents.use_agent_simulation && self.agents.population.total_agents == 0 {
            bail!("NUM_AGENTS must be positive when agent simulation is enabled");
        }

        if pipeline.use_discord && pipeline.discord_webhook_url.is_none() {
            bail!("USE_DISCORD is true but DISCORD_WEBHOOK_URL is not set");
        }

        for warning in self.warnings() {
            warn!("Config: {}", warning);
        }
        Ok(())
    }

    /// Settings that are valid but likely unintended.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.pipeline.mode == Mode::OpenAi && !self.scoring.is_known_model() {
            warnings.push(format!(
                "{} may not be a valid model. Recommended: {}",
                self.scoring.openai.model,
                KNOWN_MODELS.join(", ")
            ));
        }
        if self.pipeline.loop_interval.as_secs() < MIN_SENSIBLE_INTERVAL_SECS {
            warnings.push(format!(
                "LOOP_INTERVAL_SECS is below {}s, API costs may be very high",
                MIN_SENSIBLE_INTERVAL_SECS
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::vars;
    use std::time::Duration;

    fn valid() -> Vec<(&'static str, &'static str)> {
        vec![
            ("OPENAI_API_KEY", "sk-test"),
            ("RSS_FEEDS", "https://a.example.com/rss, https://b.example.com/rss"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_source(&vars(&valid())).unwrap();

        assert_eq!(config.scoring.openai.model, "gpt-4o-mini");
        assert_eq!(config.scoring.retry.max_attempts, 3);
        assert_eq!(config.scoring.retry.rate_limit_backoff, Duration::from_secs(10));
        assert_eq!(config.scoring.throttle, Duration::from_millis(1000));
        assert!(!config.agents.use_agent_simulation);
        assert_eq!(config.agents.population.total_agents, 100);
        assert_eq!(config.agents.seed, None);
        assert_eq!(config.signal, SignalConfig::default());
        assert_eq!(config.pipeline.mode, Mode::OpenAi);
        assert_eq!(config.pipeline.rss_feeds.len(), 2);
        assert_eq!(config.pipeline.loop_interval, Duration::from_secs(900));
        assert!(config.validate().is_ok());
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = valid();
        pairs.extend([
            ("USE_AGENT_SIMULATION", "true"),
            ("NUM_AGENTS", "40"),
            ("BIASED_RATIO", "0.1"),
            ("AGENT_SEED", "42"),
            ("LONG_THRESHOLD", "8"),
            ("SHORT_THRESHOLD", "-8"),
            ("MODE", "mock"),
        ]);

        let config = Config::from_source(&vars(&pairs)).unwrap();

        assert!(config.agents.use_agent_simulation);
        assert_eq!(config.agents.population.total_agents, 40);
        assert_eq!(config.agents.population.ratios.biased, 0.1);
        assert_eq!(config.agents.seed, Some(42));
        assert_eq!(config.signal.long_threshold, 8);
        assert_eq!(config.signal.short_threshold, -8);
        assert_eq!(config.pipeline.mode, Mode::Mock);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let mut pairs = valid();
        pairs.push(("NUM_AGENTS", "many"));

        let err = Config::from_source(&vars(&pairs)).unwrap_err();

        assert!(format!("{:#}", err).contains("NUM_AGENTS"));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let cases: &[(&str, &str)] = &[
            ("OPENAI_API_KEY", "pk-123"),
            ("NUM_LONG_POSITIONS", "0"),
            ("NUM_SHORT_POSITIONS", "0"),
            ("NEWS_LIMIT_PER_FEED", "0"),
            ("INFORMED_RATIO", "-0.1"),
            ("USE_DISCORD", "true"),
        ];
        for (key, value) in cases {
            let mut pairs = valid();
            pairs.retain(|(k, _)| k != key);
            pairs.push((*key, *value));
            let config = Config::from_source(&vars(&pairs)).unwrap();
            assert!(config.validate().is_err(), "{}={} should be rejected", key, value);
        }
    }

    #[test]
    fn test_zero_ratio_sum_rejected() {
        let mut pairs = valid();
        pairs.extend([
            ("INFORMED_RATIO", "0"),
            ("BIASED_RATIO", "0"),
            ("IMPULSIVE_RATIO", "0"),
        ]);
        let config = Config::from_source(&vars(&pairs)).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mock_mode_needs_no_key_or_feeds() {
        let config = Config::from_source(&vars(&[("MODE", "mock")])).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_warnings() {
        let mut pairs = valid();
        pairs.extend([("OPENAI_MODEL", "my-model"), ("LOOP_INTERVAL_SECS", "5")]);

        let config = Config::from_source(&vars(&pairs)).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.warnings().len(), 2);
    }
}
