//! Offline management CLI: validate a gateway config file or preview how
//! its aggregates resolve, without starting the gateway.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use fanout_gateway::config::loader::load_config;
use fanout_gateway::routing::aggregates::{AggregateResolver, Resolution};
use fanout_gateway::routing::pattern::TemplateCompiler;
use fanout_gateway::routing::route::{DownstreamRoute, HttpMethod};
use fanout_gateway::routing::RoutingTable;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the fanout gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a config file
    Validate {
        /// Path to the gateway TOML config
        config: PathBuf,
    },
    /// Resolve a config file and print the resulting routing table
    Resolve {
        /// Path to the gateway TOML config
        config: PathBuf,
    },
}

#[derive(Serialize)]
struct ResolveReport {
    routes: usize,
    aggregates: Vec<AggregateReport>,
    rejected: Vec<RejectedReport>,
}

#[derive(Serialize)]
struct AggregateReport {
    upstream_path_template: String,
    upstream_host: Option<String>,
    upstream_http_methods: Vec<HttpMethod>,
    aggregator: String,
    members: Vec<String>,
}

#[derive(Serialize)]
struct RejectedReport {
    upstream_path_template: String,
    missing_keys: Vec<String>,
}

fn main() -> ExitCode {
    fanout_gateway::observability::init_logging("warn");

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { config } => match load_config(&config) {
            Ok(cfg) => {
                println!(
                    "OK: {} routes, {} aggregates",
                    cfg.routes.len(),
                    cfg.aggregates.len()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::Resolve { config } => match load_config(&config) {
            Ok(cfg) => {
                let compiler = TemplateCompiler;
                let table = RoutingTable::from_config(&cfg, &compiler);
                let outcomes =
                    AggregateResolver::new(&compiler).resolve_all(&table.routes, &cfg.aggregates);
                let report = build_report(table.routes.len(), outcomes);
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => {
                        println!("{json}");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("Error: {e}");
                        ExitCode::FAILURE
                    }
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn build_report(routes: usize, outcomes: Vec<Resolution>) -> ResolveReport {
    let mut aggregates = Vec::new();
    let mut rejected = Vec::new();

    for outcome in outcomes {
        match outcome {
            Resolution::Accepted(route) => aggregates.push(AggregateReport {
                upstream_path_template: route.upstream_pattern.template().to_string(),
                upstream_host: route.upstream_host.clone(),
                upstream_http_methods: route.upstream_http_methods.clone(),
                aggregator: route.aggregator.clone(),
                members: route
                    .downstream_routes
                    .iter()
                    .map(member_label)
                    .collect(),
            }),
            Resolution::Rejected(reason) => rejected.push(RejectedReport {
                upstream_path_template: reason.upstream_path_template,
                missing_keys: reason.missing_keys,
            }),
        }
    }

    ResolveReport {
        routes,
        aggregates,
        rejected,
    }
}

fn member_label(route: &Arc<DownstreamRoute>) -> String {
    match &route.key {
        Some(key) => format!(
            "{key} -> {}://{}:{}{}",
            route.downstream_scheme,
            route.downstream_host,
            route.downstream_port,
            route.downstream_path_template
        ),
        None => route.downstream_path_template.clone(),
    }
}
