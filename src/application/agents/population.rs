use crate::application::agents::investor_agent::{AgentKind, InvestorAgent};
use crate::domain::sector::Sector;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Range of bias sectors drawn per biased agent.
const BIAS_SECTOR_RANGE: std::ops::RangeInclusive<usize> = 1..=3;
/// Range of amplification factors drawn per impulsive agent.
const AMPLIFICATION_RANGE: std::ops::RangeInclusive<f64> = 1.2..=2.0;

/// Share of the population per variant. Need not sum to 1; normalized on use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantRatios {
    pub informed: f64,
    pub biased: f64,
    pub impulsive: f64,
}

impl Default for VariantRatios {
    fn default() -> Self {
        Self {
            informed: 0.20,
            biased: 0.50,
            impulsive: 0.30,
        }
    }
}

/// Articles read per agent, by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSizes {
    pub informed: usize,
    pub biased: usize,
    pub impulsive: usize,
}

impl Default for SampleSizes {
    fn default() -> Self {
        Self {
            informed: 10,
            biased: 5,
            impulsive: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub total_agents: usize,
    pub ratios: VariantRatios,
    pub sample_sizes: SampleSizes,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            total_agents: 100,
            ratios: VariantRatios::default(),
            sample_sizes: SampleSizes::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub total: usize,
    pub informed: usize,
    pub biased: usize,
    pub impulsive: usize,
}

/// Splits `total` by normalized ratios. Informed and biased counts are
/// floored; impulsive absorbs the remainder so the counts always sum to
/// `total`.
pub fn partition_counts(total: usize, ratios: &VariantRatios) -> (usize, usize, usize) {
    let sum = ratios.informed + ratios.biased + ratios.impulsive;
    if !(sum > 0.0) {
        return (0, 0, total);
    }

    let informed = ((total as f64) * (ratios.informed / sum)).floor().max(0.0) as usize;
    let biased = ((total as f64) * (ratios.biased / sum)).floor().max(0.0) as usize;
    let informed = informed.min(total);
    let biased = biased.min(total - informed);
    (informed, biased, total - informed - biased)
}

/// Fixed set of investor agents for one simulation run.
#[derive(Debug, Clone)]
pub struct AgentPopulation {
    agents: Vec<InvestorAgent>,
}

impl AgentPopulation {
    /// Builds the population: identifiers run from 0 across informed, then
    /// biased, then impulsive agents. Each biased agent draws 1-3 distinct
    /// bias sectors, each impulsive agent an amplification in [1.2, 2.0].
    pub fn construct<R: Rng + ?Sized>(config: &PopulationConfig, rng: &mut R) -> Self {
        let (informed, biased, impulsive) = partition_counts(config.total_agents, &config.ratios);
        let sizes = &config.sample_sizes;
        let mut agents = Vec::with_capacity(config.total_agents);

        for _ in 0..informed {
            agents.push(InvestorAgent::informed(agents.len(), sizes.informed));
        }

        for _ in 0..biased {
            let count = rng.random_range(BIAS_SECTOR_RANGE);
            let bias_sectors = index::sample(rng, Sector::COUNT, count)
                .into_iter()
                .map(|i| Sector::ALL[i])
                .collect();
            agents.push(InvestorAgent::biased(agents.len(), sizes.biased, bias_sectors));
        }

        for _ in 0..impulsive {
            let amplification = rng.random_range(AMPLIFICATION_RANGE);
            agents.push(InvestorAgent::impulsive(
                agents.len(),
                sizes.impulsive,
                amplification,
            ));
        }

        let population = Self { agents };
        let stats = population.stats();
        info!(
            "AgentPopulation: created {} agents (informed: {} reading {}, biased: {} reading {}, impulsive: {} reading {})",
            stats.total,
            stats.informed,
            sizes.informed,
            stats.biased,
            sizes.biased,
            stats.impulsive,
            sizes.impulsive
        );
        population
    }

    pub fn from_agents(agents: Vec<InvestorAgent>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[InvestorAgent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn stats(&self) -> PopulationStats {
        let count = |kind: AgentKind| self.agents.iter().filter(|a| a.kind() == kind).count();
        PopulationStats {
            total: self.agents.len(),
            informed: count(AgentKind::Informed),
            biased: count(AgentKind::Biased),
            impulsive: count(AgentKind::Impulsive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_partition_exact_ratios() {
        let ratios = VariantRatios {
            informed: 0.25,
            biased: 0.5,
            impulsive: 0.25,
        };
        assert_eq!(partition_counts(100, &ratios), (25, 50, 25));
    }

    #[test]
    fn test_partition_remainder_goes_to_impulsive() {
        let ratios = VariantRatios {
            informed: 1.0,
            biased: 1.0,
            impulsive: 1.0,
        };
        assert_eq!(partition_counts(10, &ratios), (3, 3, 4));
    }

    #[test]
    fn test_partition_always_sums_to_total() {
        let ratio_sets = [
            (0.2, 0.5, 0.3),
            (3.0, 0.0, 0.0),
            (0.0, 0.0, 2.0),
            (0.1, 0.7, 0.2),
            (5.0, 7.0, 11.0),
        ];
        for total in [0usize, 1, 7, 33, 100, 1001] {
            for (informed, biased, impulsive) in ratio_sets {
                let ratios = VariantRatios {
                    informed,
                    biased,
                    impulsive,
                };
                let (a, b, c) = partition_counts(total, &ratios);
                assert_eq!(a + b + c, total, "total={} ratios={:?}", total, ratios);
            }
        }
    }

    #[test]
    fn test_construct_assigns_sequential_ids_in_variant_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PopulationConfig {
            total_agents: 10,
            ratios: VariantRatios {
                informed: 0.2,
                biased: 0.5,
                impulsive: 0.3,
            },
            sample_sizes: SampleSizes {
                informed: 5,
                biased: 3,
                impulsive: 2,
            },
        };

        let population = AgentPopulation::construct(&config, &mut rng);
        let kinds: Vec<AgentKind> = population.agents().iter().map(|a| a.kind()).collect();

        assert_eq!(population.len(), 10);
        for (i, agent) in population.agents().iter().enumerate() {
            assert_eq!(agent.agent_id, i);
        }
        let stats = population.stats();
        assert_eq!(stats.informed + stats.biased + stats.impulsive, 10);
        let first_biased = kinds.iter().position(|k| *k == AgentKind::Biased).unwrap();
        let first_impulsive = kinds.iter().position(|k| *k == AgentKind::Impulsive).unwrap();
        assert!(kinds[..first_biased].iter().all(|k| *k == AgentKind::Informed));
        assert!(kinds[first_impulsive..].iter().all(|k| *k == AgentKind::Impulsive));
        assert_eq!(population.agents()[first_biased].sample_size, 3);
        assert_eq!(population.agents()[first_impulsive].sample_size, 2);
    }

    #[test]
    fn test_variant_parameters_within_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let population = AgentPopulation::construct(&PopulationConfig::default(), &mut rng);

        for agent in population.agents() {
            match agent.kind() {
                AgentKind::Biased => {
                    let sectors = agent.bias_sectors();
                    assert!((1..=3).contains(&sectors.len()));
                    let unique: HashSet<_> = sectors.iter().collect();
                    assert_eq!(unique.len(), sectors.len());
                    assert_eq!(agent.amplification_factor(), 1.0);
                }
                AgentKind::Impulsive => {
                    let factor = agent.amplification_factor();
                    assert!((1.2..=2.0).contains(&factor));
                    assert!(agent.bias_sectors().is_empty());
                }
                AgentKind::Informed => {
                    assert!(agent.bias_sectors().is_empty());
                    assert_eq!(agent.amplification_factor(), 1.0);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let config = PopulationConfig::default();
        let a = AgentPopulation::construct(&config, &mut StdRng::seed_from_u64(5));
        let b = AgentPopulation::construct(&config, &mut StdRng::seed_from_u64(5));
        assert_eq!(a.agents(), b.agents());
    }
}
