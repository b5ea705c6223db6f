//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, templates non-empty)
//! - Warn about cross-reference problems without failing the load
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Aggregate keys that resolve to no route are a warning, never an
//!   error: the resolution stage skips those aggregates so one stale
//!   reference cannot block the whole configuration

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index}: upstream_path_template must not be empty")]
    EmptyRouteTemplate { index: usize },

    #[error("route #{index}: downstream_host must not be empty")]
    EmptyDownstreamHost { index: usize },

    #[error("route #{index}: downstream_port must not be 0")]
    ZeroDownstreamPort { index: usize },

    #[error("aggregate #{index}: upstream_path_template must not be empty")]
    EmptyAggregateTemplate { index: usize },

    #[error("aggregate #{index}: aggregator must not be empty")]
    EmptyAggregator { index: usize },
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.upstream_path_template.is_empty() {
            errors.push(ValidationError::EmptyRouteTemplate { index });
        }
        if route.downstream_host.is_empty() {
            errors.push(ValidationError::EmptyDownstreamHost { index });
        }
        if route.downstream_port == 0 {
            errors.push(ValidationError::ZeroDownstreamPort { index });
        }
    }

    let known_keys: HashSet<&str> = config
        .routes
        .iter()
        .filter_map(|r| r.key.as_deref())
        .collect();

    for (index, aggregate) in config.aggregates.iter().enumerate() {
        if aggregate.upstream_path_template.is_empty() {
            errors.push(ValidationError::EmptyAggregateTemplate { index });
        }
        if aggregate.aggregator.is_empty() {
            errors.push(ValidationError::EmptyAggregator { index });
        }
        if aggregate.route_keys.is_empty() {
            tracing::warn!(index, "Aggregate declares no member route keys");
        }
        for key in &aggregate.route_keys {
            if !known_keys.contains(key.as_str()) {
                tracing::warn!(
                    index,
                    key = %key,
                    "Aggregate references a route key that no route declares; \
                     the aggregate will be skipped at resolution"
                );
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
