//! Todo Service
//!
//! A JSON CRUD API for todo items built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 TODO SERVICE                 │
//!                    │                                              │
//!   Client Request   │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│middleware│──▶│ handlers │──▶│TodoStore │──┼──▶ memory / MongoDB
//!                    │  │ (http)   │   │  (http)  │   │ (store)  │  │
//!   Client Response  │  └──────────┘   └──────────┘   └──────────┘  │
//!   ◀────────────────┼──────────── JSON / ApiError ◀────────────────┤
//!                    │                                              │
//!                    │  config · lifecycle · observability · net    │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use todo_service::config::{self, StoreBackend};
use todo_service::http::HttpServer;
use todo_service::lifecycle::{signals, startup, Shutdown};
use todo_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "todo-service")]
#[command(about = "JSON CRUD service for todo items", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage backend (memory or mongo)
    #[arg(short, long)]
    store: Option<StoreBackend>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // .env has to be in place before the environment layer is read
    let env_file = startup::load_env_file();

    let overrides = config::Overrides {
        store: args.store,
        port: args.port,
    };
    let config = config::load_config(args.config.as_deref(), &overrides)?;

    logging::init_logging(&config.observability, config.environment);

    match env_file? {
        startup::EnvFile::Loaded(path) => tracing::info!(path = %path.display(), "Loaded environment file"),
        startup::EnvFile::Missing => tracing::debug!("No .env file found"),
        startup::EnvFile::Skipped => {}
    }

    tracing::info!("todo-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        store = %config.store.backend,
        port = config.listener.port,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = startup::connect_store(&config.store).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, store);
    server.serve(shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
