//! Feed, loop and notification configuration parsing from environment variables.

use crate::config::env::EnvSource;
use anyhow::Result;
use std::str::FromStr;
use std::time::Duration;

/// Scoring backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    OpenAi,
    /// Keyword heuristic backend and sample articles; no network.
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Mode::OpenAi),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'openai' or 'mock'", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEnvConfig {
    pub mode: Mode,
    pub rss_feeds: Vec<String>,
    pub news_limit_per_feed: usize,
    pub news_cache_expiration: Duration,
    pub loop_interval: Duration,
    pub use_discord: bool,
    pub discord_webhook_url: Option<String>,
}

impl Default for PipelineEnvConfig {
    fn default() -> Self {
        Self {
            mode: Mode::OpenAi,
            rss_feeds: Vec::new(),
            news_limit_per_feed: 5,
            news_cache_expiration: Duration::from_secs(3600),
            loop_interval: Duration::from_secs(900),
            use_discord: false,
            discord_webhook_url: None,
        }
    }
}

impl PipelineEnvConfig {
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let rss_feeds = env
            .string("RSS_FEEDS", "")
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            mode: Mode::from_str(&env.string("MODE", "openai"))?,
            rss_feeds,
            news_limit_per_feed: env.parse("NEWS_LIMIT_PER_FEED", 5)?,
            news_cache_expiration: Duration::from_secs(
                env.parse("NEWS_CACHE_EXPIRATION_SECS", 3600)?,
            ),
            loop_interval: Duration::from_secs(env.parse("LOOP_INTERVAL_SECS", 900)?),
            use_discord: env.flag("USE_DISCORD", false),
            discord_webhook_url: env
                .get("DISCORD_WEBHOOK_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        })
    }
}
