//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

use crate::routing::route::HttpMethod;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Downstream route definitions.
    #[serde(rename = "route")]
    pub routes: Vec<FileRoute>,

    /// Aggregate route definitions referencing downstream routes by key.
    #[serde(rename = "aggregate")]
    pub aggregates: Vec<FileAggregateRoute>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Hot-reload settings.
    pub reload: ReloadConfig,
}

/// One downstream route entry in the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRoute {
    /// Key other config entries use to reference this route. A route
    /// without a key cannot be a member of an aggregate.
    pub key: Option<String>,

    /// Client-facing path template (e.g. "/api/orders/{id}").
    pub upstream_path_template: String,

    /// Host header to match (exact match). Absent = any host.
    pub upstream_host: Option<String>,

    /// HTTP methods this route accepts.
    #[serde(default = "default_methods")]
    pub upstream_http_methods: Vec<HttpMethod>,

    /// Scheme used when forwarding ("http" or "https").
    #[serde(default = "default_scheme")]
    pub downstream_scheme: String,

    /// Backend host to forward to.
    pub downstream_host: String,

    /// Backend port to forward to.
    #[serde(default = "default_port")]
    pub downstream_port: u16,

    /// Backend path template the request is rewritten to.
    pub downstream_path_template: String,

    /// Whether upstream path matching is case-sensitive.
    #[serde(default)]
    pub case_sensitive: bool,
}

/// One aggregate route entry in the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileAggregateRoute {
    /// Keys of the member downstream routes, in fan-out order.
    pub route_keys: Vec<String>,

    /// Host header to match (exact match). Absent = any host.
    pub upstream_host: Option<String>,

    /// Client-facing path template for the aggregate endpoint.
    pub upstream_path_template: String,

    /// Name of the strategy that merges the member responses. Resolved
    /// against the strategy registry at dispatch time, opaque here.
    pub aggregator: String,

    /// Whether upstream path matching is case-sensitive.
    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_methods() -> Vec<HttpMethod> {
    vec![HttpMethod::Get]
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_port() -> u16 {
    80
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Hot-reload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Enable config file watching.
    pub enabled: bool,

    /// File poll interval in seconds.
    pub poll_interval_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_secs: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::HttpMethod;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert!(config.routes.is_empty());
        assert!(config.aggregates.is_empty());
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.reload.enabled);
    }

    #[test]
    fn test_full_config_parses() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[route]]
            key = "orders"
            upstream_path_template = "/orders"
            downstream_host = "orders.internal"
            downstream_port = 8080
            downstream_path_template = "/v1/orders"

            [[route]]
            upstream_path_template = "/status"
            downstream_host = "status.internal"
            downstream_path_template = "/status"

            [[aggregate]]
            route_keys = ["orders", "invoices"]
            upstream_path_template = "/summary"
            aggregator = "merge-json"
            case_sensitive = true

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].key.as_deref(), Some("orders"));
        assert_eq!(config.routes[0].downstream_port, 8080);
        assert!(config.routes[1].key.is_none());
        assert_eq!(config.routes[1].downstream_port, 80);
        assert_eq!(config.routes[1].upstream_http_methods, vec![HttpMethod::Get]);

        assert_eq!(config.aggregates.len(), 1);
        assert_eq!(config.aggregates[0].route_keys, vec!["orders", "invoices"]);
        assert_eq!(config.aggregates[0].aggregator, "merge-json");
        assert!(config.aggregates[0].case_sensitive);
        assert_eq!(config.observability.log_level, "debug");
    }
}
