//! Signal thresholds parsing from environment variables.

use crate::application::signal::SignalConfig;
use crate::config::env::EnvSource;
use anyhow::Result;

pub fn signal_config_from_source(env: &impl EnvSource) -> Result<SignalConfig> {
    let defaults = SignalConfig::default();
    Ok(SignalConfig {
        num_long: env.parse("NUM_LONG_POSITIONS", defaults.num_long)?,
        num_short: env.parse("NUM_SHORT_POSITIONS", defaults.num_short)?,
        long_threshold: env.parse("LONG_THRESHOLD", defaults.long_threshold)?,
        short_threshold: env.parse("SHORT_THRESHOLD", defaults.short_threshold)?,
        min_score_diff: env.parse("MIN_SCORE_DIFF", defaults.min_score_diff)?,
    })
}
