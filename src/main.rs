//! Employee API
//!
//! A CRUD HTTP service over a single document collection, built with Tokio
//! and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http::server ──▶ employees::handlers ──┐   │
//!                           │   (request id,      (parse id, map       │   │
//!                           │    trace, limits)    outcome to status)  │   │
//!                           │                                          ▼   │
//!     Client Response       │                                   store::    │
//!     ◀─────────────────────┼── plain text / JSON ◀──────────  Collection  │
//!                           │                                              │
//!                           │  config · observability · lifecycle          │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use employee_api::config::load_config;
use employee_api::http::HttpServer;
use employee_api::lifecycle::{startup, Shutdown};
use employee_api::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "employee-api")]
#[command(about = "CRUD HTTP API over the employees collection", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "EMPLOYEES_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        base_path = %config.api.base_path,
        storage = %config.storage.uri,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let employees = startup::open_collection(&config.storage).map_err(|e| {
        tracing::error!(error = %e, "Failed to open employee collection");
        e
    })?;

    let listener = startup::bind_listener(&config).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, employees);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
