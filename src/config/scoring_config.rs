//! Scoring backend configuration parsing from environment variables.

use crate::application::sentiment::RetryPolicy;
use crate::config::env::EnvSource;
use crate::infrastructure::openai::OpenAiConfig;
use crate::infrastructure::openai::client::DEFAULT_BASE_URL;
use anyhow::Result;
use std::time::Duration;

/// Models the prompt has been tuned against.
pub const KNOWN_MODELS: &[&str] = &[
    "gpt-5-nano",
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-3.5-turbo",
    "gpt-4",
];

#[derive(Debug, Clone)]
pub struct ScoringEnvConfig {
    pub openai: OpenAiConfig,
    pub retry: RetryPolicy,
    /// Pause after every scoring call.
    pub throttle: Duration,
}

impl Default for ScoringEnvConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig::default(),
            retry: RetryPolicy::default(),
            throttle: Duration::from_millis(1000),
        }
    }
}

impl ScoringEnvConfig {
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        Ok(Self {
            openai: OpenAiConfig {
                api_key: env.string("OPENAI_API_KEY", ""),
                model: env.string("OPENAI_MODEL", "gpt-4o-mini"),
                temperature: env.parse("OPENAI_TEMPERATURE", 0.3)?,
                base_url: env.string("OPENAI_BASE_URL", DEFAULT_BASE_URL),
                timeout: Duration::from_secs(env.parse("OPENAI_TIMEOUT_SECS", 30)?),
            },
            retry: RetryPolicy {
                max_attempts: env.parse("MAX_RETRIES", 3)?,
                retry_delay: Duration::from_secs(env.parse("RETRY_DELAY_SECS", 2)?),
                rate_limit_backoff: Duration::from_secs(env.parse("RATE_LIMIT_BACKOFF_SECS", 10)?),
            },
            throttle: Duration::from_millis(env.parse("SCORING_THROTTLE_MS", 1000)?),
        })
    }

    pub fn is_known_model(&self) -> bool {
        KNOWN_MODELS.contains(&self.openai.model.as_str())
    }
}
