//! Routing table assembly and atomic sharing.
//!
//! # Responsibilities
//! - Build resolved downstream routes from file config
//! - Run aggregate resolution over them
//! - Hold the complete, immutable routing table
//! - Share the table and swap it wholesale on reload
//!
//! # Design Decisions
//! - Table is immutable after construction (thread-safe without locks)
//! - Reload builds a fresh table and installs it with one ArcSwap store;
//!   readers never observe a partially-updated table

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::GatewayConfig;
use crate::routing::aggregates::AggregateResolver;
use crate::routing::pattern::PatternCompiler;
use crate::routing::route::{DownstreamRoute, ResolvedAggregateRoute};

/// The complete set of routes the gateway can match a request against.
#[derive(Debug)]
pub struct RoutingTable {
    pub routes: Vec<Arc<DownstreamRoute>>,
    pub aggregates: Vec<ResolvedAggregateRoute>,
}

impl RoutingTable {
    /// Build a table from a validated configuration.
    pub fn from_config(config: &GatewayConfig, compiler: &dyn PatternCompiler) -> Self {
        let routes: Vec<Arc<DownstreamRoute>> = config
            .routes
            .iter()
            .map(|file_route| {
                Arc::new(DownstreamRoute {
                    key: file_route.key.clone(),
                    upstream_path_template: file_route.upstream_path_template.clone(),
                    upstream_host: file_route.upstream_host.clone(),
                    upstream_http_methods: file_route.upstream_http_methods.clone(),
                    upstream_pattern: compiler.compile(
                        &file_route.upstream_path_template,
                        file_route.upstream_host.as_deref(),
                        file_route.case_sensitive,
                    ),
                    downstream_scheme: file_route.downstream_scheme.clone(),
                    downstream_host: file_route.downstream_host.clone(),
                    downstream_port: file_route.downstream_port,
                    downstream_path_template: file_route.downstream_path_template.clone(),
                })
            })
            .collect();

        let aggregates = AggregateResolver::new(compiler).resolve(&routes, &config.aggregates);

        tracing::info!(
            routes = routes.len(),
            aggregates = aggregates.len(),
            declared_aggregates = config.aggregates.len(),
            "Routing table built"
        );

        Self { routes, aggregates }
    }
}

/// Shared handle to the active routing table.
///
/// Readers call `load`; the reload path calls `store` with a freshly
/// built table.
pub struct SharedTable {
    inner: ArcSwap<RoutingTable>,
}

impl SharedTable {
    pub fn new(table: RoutingTable) -> Self {
        Self {
            inner: ArcSwap::from_pointee(table),
        }
    }

    /// Snapshot of the currently active table.
    pub fn load(&self) -> Arc<RoutingTable> {
        self.inner.load_full()
    }

    /// Atomically replace the active table.
    pub fn store(&self, table: RoutingTable) {
        self.inner.store(Arc::new(table));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use crate::routing::pattern::TemplateCompiler;
    use crate::routing::route::HttpMethod;

    fn sample_config() -> GatewayConfig {
        parse_config(
            r#"
            [[route]]
            key = "orders"
            upstream_path_template = "/orders"
            downstream_host = "orders.internal"
            downstream_port = 8080
            downstream_path_template = "/v1/orders"

            [[route]]
            key = "invoices"
            upstream_path_template = "/invoices"
            downstream_host = "invoices.internal"
            downstream_port = 8080
            downstream_path_template = "/v1/invoices"

            [[aggregate]]
            route_keys = ["orders", "invoices"]
            upstream_path_template = "/summary"
            aggregator = "merge-json"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_table_resolves_routes_and_aggregates() {
        let table = RoutingTable::from_config(&sample_config(), &TemplateCompiler);

        assert_eq!(table.routes.len(), 2);
        assert_eq!(table.aggregates.len(), 1);

        let aggregate = &table.aggregates[0];
        assert_eq!(aggregate.upstream_http_methods, vec![HttpMethod::Get]);
        assert_eq!(aggregate.aggregator, "merge-json");
        assert_eq!(aggregate.downstream_routes.len(), 2);
        assert!(Arc::ptr_eq(&aggregate.downstream_routes[0], &table.routes[0]));
        assert!(Arc::ptr_eq(&aggregate.downstream_routes[1], &table.routes[1]));
        assert!(aggregate.upstream_pattern.is_match("/summary", None));
    }

    #[test]
    fn test_stale_aggregate_does_not_block_table_build() {
        let mut config = sample_config();
        config.aggregates[0].route_keys.push("stale".to_string());

        let table = RoutingTable::from_config(&config, &TemplateCompiler);

        assert_eq!(table.routes.len(), 2);
        assert!(table.aggregates.is_empty());
    }

    #[test]
    fn test_shared_table_swaps_wholesale() {
        let shared = SharedTable::new(RoutingTable::from_config(
            &sample_config(),
            &TemplateCompiler,
        ));
        assert_eq!(shared.load().aggregates.len(), 1);

        let empty = RoutingTable::from_config(&GatewayConfig::default(), &TemplateCompiler);
        shared.store(empty);

        let current = shared.load();
        assert!(current.routes.is_empty());
        assert!(current.aggregates.is_empty());
    }
}
