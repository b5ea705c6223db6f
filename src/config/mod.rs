//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → routing table built from it, shared via ArcSwap
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → fresh RoutingTable resolved
//!     → atomic swap of the shared table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Unresolvable aggregate references are a resolution concern, not a
//!   validation failure

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::FileAggregateRoute;
pub use schema::FileRoute;
pub use schema::GatewayConfig;
