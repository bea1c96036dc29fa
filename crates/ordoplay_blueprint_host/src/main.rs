// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` blueprint command host.
//!
//! Reads one JSON command per line on stdin and answers one JSON response
//! per line on stdout. Logs go to stderr so stdout stays a clean response
//! stream.

mod config;
mod session;

use clap::Parser;
use ordoplay_blueprint_commands::BlueprintStore;
use config::{Cli, HostConfig};
use session::{HostError, Session};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let config = match HostConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    init_tracing(&config.log_filter);
    tracing::info!("Starting OrdoPlay blueprint host v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "host terminated with error");
        process::exit(1);
    }
}

/// Tracing to stderr, filtered by `RUST_LOG` or the configured directive
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(config: &HostConfig) -> Result<(), HostError> {
    let catalog = config.load_catalog()?;
    let store = config.load_store()?;

    let mut session = Session::new(store, catalog)
        .with_default_graph(config.default_graph.clone())
        .with_pretty(config.pretty);
    tracing::info!(
        blueprints = ?session.store().blueprint_names(),
        default_graph = ?config.default_graph,
        "session ready"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let stats = session.run(stdin.lock(), stdout.lock())?;

    tracing::info!(requests = stats.requests, failures = stats.failures, "session ended");
    Ok(())
}
