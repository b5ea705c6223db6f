//! Route entities produced by configuration resolution.
//!
//! # Responsibilities
//! - Define the resolved downstream route entity
//! - Define the resolved aggregate route entity
//! - Define the HTTP method set carried by both
//!
//! # Design Decisions
//! - Entities are immutable after construction; a reload builds a fresh set
//! - Downstream routes are shared via Arc so aggregates reference, not copy
//! - Aggregate routes accept GET only (read-composition, no mutating members)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::pattern::CompiledPattern;

/// HTTP methods a route can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

/// A fully-resolved downstream route: one backend endpoint the gateway can
/// forward a request to.
///
/// The `key` makes the route referenceable from the aggregates section of
/// the configuration. Routes without a key cannot be members of an
/// aggregate. Several routes may share one key (e.g. the same endpoint
/// exposed for multiple HTTP methods).
#[derive(Debug, Clone)]
pub struct DownstreamRoute {
    pub key: Option<String>,
    pub upstream_path_template: String,
    pub upstream_host: Option<String>,
    pub upstream_http_methods: Vec<HttpMethod>,
    pub upstream_pattern: CompiledPattern,
    pub downstream_scheme: String,
    pub downstream_host: String,
    pub downstream_port: u16,
    pub downstream_path_template: String,
}

/// A resolved aggregate route: one upstream endpoint that fans out to
/// several downstream routes and merges their responses through the named
/// aggregator strategy.
///
/// `downstream_routes` preserves the member-key order from the
/// configuration; a key shared by several routes contributes all of them,
/// in configuration order.
#[derive(Debug, Clone)]
pub struct ResolvedAggregateRoute {
    pub upstream_http_methods: Vec<HttpMethod>,
    pub upstream_host: Option<String>,
    pub upstream_pattern: CompiledPattern,
    pub aggregator: String,
    pub downstream_routes: Vec<Arc<DownstreamRoute>>,
}

impl ResolvedAggregateRoute {
    /// Aggregate routes are read-composition only.
    pub const METHODS: [HttpMethod; 1] = [HttpMethod::Get];
}
