//! Observability subsystem.
//!
//! Structured logging via tracing; resolution counters via the metrics
//! crate (`gateway_aggregates_resolved_total`,
//! `gateway_aggregates_rejected_total`). Exposition is left to whatever
//! recorder the embedding process installs.

pub mod logging;

pub use logging::init_logging;
