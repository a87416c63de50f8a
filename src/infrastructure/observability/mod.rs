//! Prometheus counters for the scoring and signal pipeline.
//!
//! Nothing is served over HTTP; the binary renders the registry into the
//! log after each cycle.

pub mod metrics;

pub use metrics::Metrics;
