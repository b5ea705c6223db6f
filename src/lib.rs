//! Aggregate-route resolution core for a reverse-proxy gateway.
//!
//! An aggregate route is one upstream endpoint that fans out to several
//! downstream routes and merges their responses through a named
//! aggregator strategy. This crate owns the configuration side of that
//! feature: loading and validating the gateway config, resolving
//! aggregate definitions against keyed downstream routes, and assembling
//! the immutable routing table the dispatch engine matches requests
//! against.
//!
//! ```text
//! gateway.toml
//!     → config (load, validate, watch)
//!     → routing::table (compile patterns, resolve aggregates)
//!     → SharedTable (atomic swap on reload)
//! ```

pub mod config;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use routing::{AggregateResolver, RoutingTable, SharedTable};
