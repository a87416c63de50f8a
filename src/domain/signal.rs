use crate::domain::sector::Sector;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of signal generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAction {
    Trade,
    Hold,
    WeakSignal,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trade => write!(f, "TRADE"),
            Self::Hold => write!(f, "HOLD"),
            Self::WeakSignal => write!(f, "WEAK_SIGNAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    NotApplicable,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// A selected sector ETF with the aggregated score that selected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub sector: Sector,
    pub score: i64,
}

impl Position {
    pub fn new(sector: Sector, score: i64) -> Self {
        Self {
            ticker: sector.ticker().to_string(),
            sector,
            score,
        }
    }
}

/// Trading recommendation for one pipeline cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub action: SignalAction,
    pub confidence: Confidence,
    pub long_positions: Vec<Position>,
    pub short_position: Option<Position>,
    pub warnings: Vec<String>,
    /// Why no position was taken; only set for [`SignalAction::Hold`].
    pub reason: Option<String>,
    /// All sectors ranked by descending score.
    pub all_scores: Vec<(Sector, i64)>,
    pub timestamp: DateTime<Tz>,
}

impl Signal {
    pub fn is_actionable(&self) -> bool {
        self.action != SignalAction::Hold
    }
}
