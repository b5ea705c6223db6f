//! Aggregate route resolution.
//!
//! # Data Flow
//! ```text
//! DownstreamRoute[] (already resolved, keyed)
//!     + FileAggregateRoute[] (raw, reference routes by key)
//!     → build key → routes lookup (once per call)
//!     → per aggregate, in file order:
//!         every key resolves  → compile pattern, assemble entity
//!         any key unresolved  → reject, log, continue
//!     → accepted entities, in file order
//! ```
//!
//! # Design Decisions
//! - Rejection is a tagged outcome, not an error: one stale or mistyped
//!   key must never abort the rest of the configuration load
//! - The pattern compiler is injected and invoked only for accepted
//!   definitions
//! - Duplicate member keys resolve independently; members are not
//!   deduplicated (an aggregator may expect repeated members)
//! - Pure and synchronous: safe to run concurrently on independent
//!   configuration snapshots

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::schema::FileAggregateRoute;
use crate::routing::pattern::PatternCompiler;
use crate::routing::route::{DownstreamRoute, ResolvedAggregateRoute};

/// Outcome of resolving one aggregate definition.
#[derive(Debug)]
pub enum Resolution {
    Accepted(ResolvedAggregateRoute),
    Rejected(RejectedAggregate),
}

/// Why an aggregate definition produced no route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedAggregate {
    pub upstream_path_template: String,
    pub missing_keys: Vec<String>,
}

/// Resolves raw aggregate definitions against a set of keyed downstream
/// routes.
pub struct AggregateResolver<'a> {
    compiler: &'a dyn PatternCompiler,
}

impl<'a> AggregateResolver<'a> {
    pub fn new(compiler: &'a dyn PatternCompiler) -> Self {
        Self { compiler }
    }

    /// Resolve all aggregate definitions, returning only the accepted
    /// routes in the relative order of their source definitions.
    pub fn resolve(
        &self,
        downstream_routes: &[Arc<DownstreamRoute>],
        aggregates: &[FileAggregateRoute],
    ) -> Vec<ResolvedAggregateRoute> {
        self.resolve_all(downstream_routes, aggregates)
            .into_iter()
            .filter_map(|outcome| match outcome {
                Resolution::Accepted(route) => Some(route),
                Resolution::Rejected(_) => None,
            })
            .collect()
    }

    /// Resolve all aggregate definitions, keeping the rejected ones and
    /// their reasons. Used by the CLI report; `resolve` filters this down
    /// to the accepted set.
    pub fn resolve_all(
        &self,
        downstream_routes: &[Arc<DownstreamRoute>],
        aggregates: &[FileAggregateRoute],
    ) -> Vec<Resolution> {
        // Routes without a key are not referenceable by aggregates.
        // Within one key, configuration order is preserved.
        let mut by_key: HashMap<&str, Vec<&Arc<DownstreamRoute>>> = HashMap::new();
        for route in downstream_routes {
            if let Some(key) = route.key.as_deref() {
                by_key.entry(key).or_default().push(route);
            }
        }

        aggregates
            .iter()
            .map(|aggregate| self.resolve_one(&by_key, aggregate))
            .collect()
    }

    fn resolve_one(
        &self,
        by_key: &HashMap<&str, Vec<&Arc<DownstreamRoute>>>,
        aggregate: &FileAggregateRoute,
    ) -> Resolution {
        let missing_keys: Vec<String> = aggregate
            .route_keys
            .iter()
            .filter(|key| !by_key.contains_key(key.as_str()))
            .cloned()
            .collect();

        if !missing_keys.is_empty() {
            tracing::warn!(
                upstream_path_template = %aggregate.upstream_path_template,
                missing_keys = ?missing_keys,
                "Aggregate references unknown route keys, skipping"
            );
            metrics::counter!("gateway_aggregates_rejected_total").increment(1);
            return Resolution::Rejected(RejectedAggregate {
                upstream_path_template: aggregate.upstream_path_template.clone(),
                missing_keys,
            });
        }

        // Every key resolved; concatenate members in key order.
        let downstream_routes: Vec<Arc<DownstreamRoute>> = aggregate
            .route_keys
            .iter()
            .flat_map(|key| by_key[key.as_str()].iter().map(|&r| Arc::clone(r)))
            .collect();

        let upstream_pattern = self.compiler.compile(
            &aggregate.upstream_path_template,
            aggregate.upstream_host.as_deref(),
            aggregate.case_sensitive,
        );

        metrics::counter!("gateway_aggregates_resolved_total").increment(1);

        Resolution::Accepted(ResolvedAggregateRoute {
            upstream_http_methods: ResolvedAggregateRoute::METHODS.to_vec(),
            upstream_host: aggregate.upstream_host.clone(),
            upstream_pattern,
            aggregator: aggregate.aggregator.clone(),
            downstream_routes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::routing::pattern::{CompiledPattern, TemplateCompiler};
    use crate::routing::route::HttpMethod;

    /// Test double that records every compile invocation.
    #[derive(Default)]
    struct RecordingCompiler {
        calls: Mutex<Vec<(String, Option<String>, bool)>>,
    }

    impl RecordingCompiler {
        fn calls(&self) -> Vec<(String, Option<String>, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PatternCompiler for RecordingCompiler {
        fn compile(
            &self,
            template: &str,
            host: Option<&str>,
            case_sensitive: bool,
        ) -> CompiledPattern {
            self.calls.lock().unwrap().push((
                template.to_string(),
                host.map(String::from),
                case_sensitive,
            ));
            TemplateCompiler.compile(template, host, case_sensitive)
        }
    }

    fn route(key: &str) -> Arc<DownstreamRoute> {
        Arc::new(DownstreamRoute {
            key: Some(key.to_string()),
            upstream_path_template: format!("/{key}"),
            upstream_host: None,
            upstream_http_methods: vec![HttpMethod::Get],
            upstream_pattern: TemplateCompiler.compile(&format!("/{key}"), None, false),
            downstream_scheme: "http".to_string(),
            downstream_host: "127.0.0.1".to_string(),
            downstream_port: 3000,
            downstream_path_template: format!("/{key}"),
        })
    }

    fn aggregate(keys: &[&str]) -> FileAggregateRoute {
        FileAggregateRoute {
            route_keys: keys.iter().map(|k| k.to_string()).collect(),
            upstream_host: Some("hosty".to_string()),
            upstream_path_template: "templatey".to_string(),
            aggregator: "aggregatory".to_string(),
            case_sensitive: true,
        }
    }

    #[test]
    fn test_missing_key_rejects_without_compiling() {
        let compiler = RecordingCompiler::default();
        let resolver = AggregateResolver::new(&compiler);

        let result = resolver.resolve(&[], &[aggregate(&["key1"])]);

        assert!(result.is_empty());
        assert!(compiler.calls().is_empty());
    }

    #[test]
    fn test_creates_aggregates_in_input_order() {
        let compiler = RecordingCompiler::default();
        let resolver = AggregateResolver::new(&compiler);
        let routes = vec![route("key1"), route("key2"), route("key3"), route("key4")];

        let result = resolver.resolve(
            &routes,
            &[aggregate(&["key1", "key2"]), aggregate(&["key3", "key4"])],
        );

        assert_eq!(result.len(), 2);
        for entity in &result {
            assert_eq!(entity.upstream_http_methods, vec![HttpMethod::Get]);
            assert_eq!(entity.upstream_host.as_deref(), Some("hosty"));
            assert_eq!(entity.aggregator, "aggregatory");
            assert_eq!(entity.upstream_pattern.template(), "templatey");
        }
        let members = |i: usize| -> Vec<&str> {
            result[i]
                .downstream_routes
                .iter()
                .map(|r| r.key.as_deref().unwrap())
                .collect()
        };
        assert_eq!(members(0), vec!["key1", "key2"]);
        assert_eq!(members(1), vec!["key3", "key4"]);

        assert_eq!(
            compiler.calls(),
            vec![
                ("templatey".to_string(), Some("hosty".to_string()), true),
                ("templatey".to_string(), Some("hosty".to_string()), true),
            ]
        );
    }

    #[test]
    fn test_rejected_definition_leaves_no_gap() {
        let compiler = RecordingCompiler::default();
        let resolver = AggregateResolver::new(&compiler);
        let routes = vec![route("key1"), route("key2")];

        let result = resolver.resolve(
            &routes,
            &[
                aggregate(&["key1"]),
                aggregate(&["key1", "nope"]),
                aggregate(&["key2"]),
            ],
        );

        assert_eq!(result.len(), 2);
        assert_eq!(
            result[0].downstream_routes[0].key.as_deref(),
            Some("key1")
        );
        assert_eq!(
            result[1].downstream_routes[0].key.as_deref(),
            Some("key2")
        );
        // The rejected definition never reached the compiler.
        assert_eq!(compiler.calls().len(), 2);
    }

    #[test]
    fn test_duplicate_member_keys_are_not_deduplicated() {
        let resolver = AggregateResolver::new(&TemplateCompiler);
        let routes = vec![route("key1")];

        let result = resolver.resolve(&routes, &[aggregate(&["key1", "key1"])]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].downstream_routes.len(), 2);
        assert!(Arc::ptr_eq(
            &result[0].downstream_routes[0],
            &result[0].downstream_routes[1]
        ));
    }

    #[test]
    fn test_shared_key_collects_all_routes_in_input_order() {
        let resolver = AggregateResolver::new(&TemplateCompiler);
        let first = route("key1");
        let second = route("key1");
        let routes = vec![Arc::clone(&first), Arc::clone(&second), route("key2")];

        let result = resolver.resolve(&routes, &[aggregate(&["key2", "key1"])]);

        assert_eq!(result.len(), 1);
        let members = &result[0].downstream_routes;
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].key.as_deref(), Some("key2"));
        assert!(Arc::ptr_eq(&members[1], &first));
        assert!(Arc::ptr_eq(&members[2], &second));
    }

    #[test]
    fn test_empty_member_list_is_vacuously_accepted() {
        let resolver = AggregateResolver::new(&TemplateCompiler);

        let result = resolver.resolve(&[route("key1")], &[aggregate(&[])]);

        assert_eq!(result.len(), 1);
        assert!(result[0].downstream_routes.is_empty());
    }

    #[test]
    fn test_keyless_routes_are_not_referenceable() {
        let resolver = AggregateResolver::new(&TemplateCompiler);
        let mut keyless = route("ignored");
        Arc::get_mut(&mut keyless).unwrap().key = None;

        let result = resolver.resolve(&[keyless], &[aggregate(&["ignored"])]);

        assert!(result.is_empty());
    }

    #[test]
    fn test_rejection_reason_names_missing_keys() {
        let resolver = AggregateResolver::new(&TemplateCompiler);
        let routes = vec![route("key1")];

        let outcomes = resolver.resolve_all(&routes, &[aggregate(&["key1", "key2", "key3"])]);

        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            Resolution::Rejected(rejected) => {
                assert_eq!(rejected.upstream_path_template, "templatey");
                assert_eq!(rejected.missing_keys, vec!["key2", "key3"]);
            }
            Resolution::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_empty_aggregate_list_yields_empty_output() {
        let compiler = RecordingCompiler::default();
        let resolver = AggregateResolver::new(&compiler);

        let result = resolver.resolve(&[route("key1")], &[]);

        assert!(result.is_empty());
        assert!(compiler.calls().is_empty());
    }
}
