// Investor agents and crowd aggregation
pub mod agents;

// Per-article sector scoring
pub mod sentiment;

// Signal generation and formatting
pub mod signal;

// Cycle runner and its wiring
pub mod bootstrap;
pub mod pipeline;
