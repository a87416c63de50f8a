// Investor agents and crowd aggregation
pub mod crowd;
pub mod investor_agent;
pub mod population;

pub use crowd::{AggregationOutcome, CrowdAggregator};
pub use investor_agent::{AgentKind, AgentVariant, InvestorAgent};
pub use population::{AgentPopulation, PopulationConfig, PopulationStats};
