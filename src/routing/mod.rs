//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Resolution (at load/reload):
//!     GatewayConfig
//!     → table.rs: compile each route's upstream pattern (pattern.rs)
//!     → aggregates.rs: resolve aggregate definitions against keyed routes
//!     → Freeze as immutable RoutingTable, install via atomic swap
//!
//! Request matching (dispatch engine, outside this crate):
//!     CompiledPattern::is_match(path, host) per candidate route
//! ```
//!
//! # Design Decisions
//! - Routes resolved at load time, immutable at runtime
//! - No regex in matching (template segments only)
//! - Deterministic: same config always yields the same table
//! - A bad aggregate entry is skipped, never fatal

pub mod aggregates;
pub mod pattern;
pub mod route;
pub mod table;

pub use aggregates::AggregateResolver;
pub use pattern::{CompiledPattern, PatternCompiler, TemplateCompiler};
pub use route::{DownstreamRoute, HttpMethod, ResolvedAggregateRoute};
pub use table::{RoutingTable, SharedTable};
