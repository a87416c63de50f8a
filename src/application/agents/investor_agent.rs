//! Investor agents
//!
//! Each agent reads a subset of the cycle's articles and reacts to their
//! scores. Behaviour is keyed by [`AgentVariant`]:
//!
//! | Variant   | Selection                                 | Bias                       |
//! |-----------|-------------------------------------------|----------------------------|
//! | Informed  | uniform sample of `sample_size`           | none                       |
//! | Biased    | articles naming a bias sector first       | bias sectors × 1.5         |
//! | Impulsive | uniform sample of (small) `sample_size`   | every sector × amplification |
//!
//! Multiplied scores are truncated toward zero.

use crate::domain::article::Article;
use crate::domain::scores::SectorScores;
use crate::domain::sector::Sector;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier applied by biased agents to their bias sectors.
pub const BIAS_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Informed,
    Biased,
    Impulsive,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Informed => write!(f, "informed"),
            Self::Biased => write!(f, "biased"),
            Self::Impulsive => write!(f, "impulsive"),
        }
    }
}

/// Behavioural variant with its variant-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentVariant {
    Informed,
    /// Prefers articles naming one of `bias_sectors` and overweights them.
    Biased { bias_sectors: Vec<Sector> },
    /// Over-reacts to everything it reads.
    Impulsive { amplification_factor: f64 },
}

impl AgentVariant {
    pub fn kind(&self) -> AgentKind {
        match self {
            Self::Informed => AgentKind::Informed,
            Self::Biased { .. } => AgentKind::Biased,
            Self::Impulsive { .. } => AgentKind::Impulsive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorAgent {
    pub agent_id: usize,
    pub variant: AgentVariant,
    pub sample_size: usize,
}

impl InvestorAgent {
    pub fn informed(agent_id: usize, sample_size: usize) -> Self {
        Self {
            agent_id,
            variant: AgentVariant::Informed,
            sample_size,
        }
    }

    pub fn biased(agent_id: usize, sample_size: usize, bias_sectors: Vec<Sector>) -> Self {
        Self {
            agent_id,
            variant: AgentVariant::Biased { bias_sectors },
            sample_size,
        }
    }

    pub fn impulsive(agent_id: usize, sample_size: usize, amplification_factor: f64) -> Self {
        Self {
            agent_id,
            variant: AgentVariant::Impulsive {
                amplification_factor,
            },
            sample_size,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.variant.kind()
    }

    /// Empty unless the agent is biased.
    pub fn bias_sectors(&self) -> &[Sector] {
        match &self.variant {
            AgentVariant::Biased { bias_sectors } => bias_sectors,
            _ => &[],
        }
    }

    /// 1.0 unless the agent is impulsive.
    pub fn amplification_factor(&self) -> f64 {
        match &self.variant {
            AgentVariant::Impulsive {
                amplification_factor,
            } => *amplification_factor,
            _ => 1.0,
        }
    }

    /// Picks the articles this agent reads.
    pub fn select_articles<'a, R: Rng + ?Sized>(
        &self,
        articles: &'a [Article],
        rng: &mut R,
    ) -> Vec<&'a Article> {
        if articles.is_empty() {
            return Vec::new();
        }

        match &self.variant {
            AgentVariant::Biased { bias_sectors } if !bias_sectors.is_empty() => {
                self.select_biased(articles, bias_sectors, rng)
            }
            _ => sample(articles, self.sample_size, rng),
        }
    }

    fn select_biased<'a, R: Rng + ?Sized>(
        &self,
        articles: &'a [Article],
        bias_sectors: &[Sector],
        rng: &mut R,
    ) -> Vec<&'a Article> {
        let keywords: Vec<String> = bias_sectors
            .iter()
            .map(|s| s.name().to_lowercase())
            .collect();

        let (qualifying, others): (Vec<&Article>, Vec<&Article>) =
            articles.iter().partition(|article| {
                let text = article.headline_text();
                keywords.iter().any(|k| text.contains(k.as_str()))
            });

        if qualifying.len() >= self.sample_size {
            return sample(&qualifying, self.sample_size, rng)
                .into_iter()
                .copied()
                .collect();
        }

        let needed = self.sample_size - qualifying.len();
        let mut selected = qualifying;
        selected.extend(sample(&others, needed, rng).into_iter().copied());
        selected.truncate(self.sample_size);
        selected
    }

    /// Adjusts one article's scores by this agent's bias.
    pub fn apply_bias(&self, base: &SectorScores) -> SectorScores {
        match &self.variant {
            AgentVariant::Informed => *base,
            AgentVariant::Biased { bias_sectors } => base.map(|sector, score| {
                if bias_sectors.contains(&sector) {
                    scale(score, BIAS_MULTIPLIER)
                } else {
                    score
                }
            }),
            AgentVariant::Impulsive {
                amplification_factor,
            } => base.map(|_, score| scale(score, *amplification_factor)),
        }
    }
}

/// Uniform sample without replacement of `min(amount, items.len())` items.
fn sample<'a, T, R: Rng + ?Sized>(items: &'a [T], amount: usize, rng: &mut R) -> Vec<&'a T> {
    let amount = amount.min(items.len());
    index::sample(rng, items.len(), amount)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

fn scale(score: i64, factor: f64) -> i64 {
    (score as f64 * factor).trunc() as i64
}
