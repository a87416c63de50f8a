use crate::domain::scores::SectorScores;
use crate::domain::sector::Sector;
use crate::domain::signal::{Confidence, Position, Signal, SignalAction};
use chrono::Utc;
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A position at or beyond this absolute score lifts confidence to High.
pub const HIGH_CONFIDENCE_SCORE: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalConfig {
    pub num_long: usize,
    /// Requested short positions. At most one is ever selected.
    pub num_short: usize,
    pub long_threshold: i64,
    pub short_threshold: i64,
    /// Minimum gap between the first and second long score.
    pub min_score_diff: i64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            num_long: 2,
            num_short: 1,
            long_threshold: 5,
            short_threshold: -5,
            min_score_diff: 3,
        }
    }
}

/// Turns an aggregated scorechart into a [`Signal`].
///
/// Any warning downgrades the action to `WeakSignal` and confidence to
/// `Low`; warning kinds are not weighted separately.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Sectors at or above the long threshold, highest first.
    pub fn long_eligible(&self, ranked: &[(Sector, i64)]) -> Vec<(Sector, i64)> {
        ranked
            .iter()
            .copied()
            .filter(|(_, score)| *score >= self.config.long_threshold)
            .collect()
    }

    /// Sectors at or below the short threshold, in ranked order (most
    /// negative last).
    pub fn short_eligible(&self, ranked: &[(Sector, i64)]) -> Vec<(Sector, i64)> {
        ranked
            .iter()
            .copied()
            .filter(|(_, score)| *score <= self.config.short_threshold)
            .collect()
    }

    pub fn generate(&self, scorechart: &SectorScores) -> Signal {
        let cfg = &self.config;
        let timestamp = Utc::now().with_timezone(&New_York);
        let ranked = scorechart.ranked();
        let long_eligible = self.long_eligible(&ranked);
        let short_eligible = self.short_eligible(&ranked);

        if long_eligible.is_empty() && short_eligible.is_empty() {
            let reason = format!(
                "No significant signal (long threshold {:+}, short threshold {:+})",
                cfg.long_threshold, cfg.short_threshold
            );
            info!("SignalGenerator: HOLD, {}", reason);
            return Signal {
                action: SignalAction::Hold,
                confidence: Confidence::NotApplicable,
                long_positions: Vec::new(),
                short_position: None,
                warnings: Vec::new(),
                reason: Some(reason),
                all_scores: ranked,
                timestamp,
            };
        }

        let mut warnings = Vec::new();

        let longs: Vec<(Sector, i64)> = if long_eligible.len() >= cfg.num_long {
            let selected: Vec<_> = long_eligible.into_iter().take(cfg.num_long).collect();
            if let [first, second, ..] = selected.as_slice() {
                let gap = first.1 - second.1;
                if gap < cfg.min_score_diff {
                    warnings.push(format!(
                        "Long position score gap too small ({} < {})",
                        gap, cfg.min_score_diff
                    ));
                }
            }
            selected
        } else if !long_eligible.is_empty() {
            warnings.push(format!(
                "Insufficient long candidates (requested {}, available {})",
                cfg.num_long,
                long_eligible.len()
            ));
            long_eligible
        } else {
            Vec::new()
        };

        let short = short_eligible.last().copied();
        if !short_eligible.is_empty() && short_eligible.len() < cfg.num_short {
            warnings.push(format!(
                "Insufficient short candidates (requested {}, available {})",
                cfg.num_short,
                short_eligible.len()
            ));
        }

        let confidence = confidence(&longs, short, &warnings);
        let action = if warnings.is_empty() {
            SignalAction::Trade
        } else {
            SignalAction::WeakSignal
        };

        let signal = Signal {
            action,
            confidence,
            long_positions: longs.into_iter().map(|(s, v)| Position::new(s, v)).collect(),
            short_position: short.map(|(s, v)| Position::new(s, v)),
            warnings,
            reason: None,
            all_scores: ranked,
            timestamp,
        };

        info!(
            "SignalGenerator: {} ({}) long=[{}] short={}",
            signal.action,
            signal.confidence,
            signal
                .long_positions
                .iter()
                .map(|p| p.ticker.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            signal
                .short_position
                .as_ref()
                .map_or("none", |p| p.ticker.as_str())
        );
        signal
    }
}

fn confidence(longs: &[(Sector, i64)], short: Option<(Sector, i64)>, warnings: &[String]) -> Confidence {
    if !warnings.is_empty() {
        return Confidence::Low;
    }
    let strong_long = longs.iter().any(|(_, score)| *score >= HIGH_CONFIDENCE_SCORE);
    let strong_short = short.is_some_and(|(_, score)| score <= -HIGH_CONFIDENCE_SCORE);
    if strong_long || strong_short {
        Confidence::High
    } else {
        Confidence::Medium
    }
}
