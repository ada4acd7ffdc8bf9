//! Employee Façade Service
//!
//! Exposes employee CRUD and aggregation endpoints over HTTP, backed by a
//! remote employee provider it does not control.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────────┐
//!                    │                  EMPLOYEE SERVICE                      │
//!   Client Request   │  ┌──────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ─────────────────┼─▶│  http    │───▶│   auth   │───▶│   handlers     │   │
//!                    │  │ server   │    │  bearer  │    │ (employees.rs) │   │
//!                    │  └──────────┘    └──────────┘    └───────┬────────┘   │
//!                    │                                          ▼            │
//!                    │                                  ┌────────────────┐   │
//!                    │                                  │   aggregator   │   │
//!                    │                                  │ search/ranking │   │
//!                    │                                  └───────┬────────┘   │
//!                    │                                          ▼            │
//!   Client Response  │  ┌──────────┐                    ┌────────────────┐   │    Upstream
//!   ◀────────────────┼──│ response │◀───────────────────│ upstream client│◀──┼─── Provider
//!                    │  │ mapping  │                    │ envelope/remap │   │
//!                    │  └──────────┘                    └────────────────┘   │
//!                    │                                                       │
//!                    │   Cross-cutting: config, observability, lifecycle     │
//!                    └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use employee_api::config::load_or_default;
use employee_api::observability::{logging, metrics};
use employee_api::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "employee-api")]
#[command(about = "Employee façade service over a remote employee provider", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "EMPLOYEE_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level)?;

    tracing::info!("employee-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
