//! Credit casino server.
//!
//! Serves slots and roulette over HTTP and WebSocket, backed by PostgreSQL or
//! by process memory.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use cc_server::{
    api,
    config::{ServerConfig, StorageBackend},
    logging, metrics,
};
use credit_casino::{
    Ledger, WagerOrchestrator,
    db::{AccountStore, Database, MemoryAccountStore, PgAccountStore},
};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the credit casino server

USAGE:
  cc_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]

FLAGS:
  --memory                 Keep accounts in memory instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  STORAGE_BACKEND          memory | postgres [default: postgres]
  DATABASE_URL             PostgreSQL connection string
  METRICS_BIND             Prometheus scrape address (e.g., 0.0.0.0:9090)
  STARTING_BALANCE         Credits granted to new accounts [default: 1000]
  SLOTS_STAKE              Stake per slots play [default: 10]
  ROULETTE_STAKE           Stake per roulette play [default: 20]
  REVEAL_STEPS             Teaser frames per reveal [default: 8]
  REVEAL_DELAY_MS          Delay between frames [default: 200]
  PROMOTION_POLICY         JSON, e.g. {\"trigger\":\"cap\",\"max\":5} [default: periodic every 6]
  PROMOTION_MESSAGE        Promotional interstitial text
  RUST_LOG                 Log filter [default: info,sqlx=warn,hyper=warn]
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let memory = pargs.contains("--memory");
    let bind: Option<SocketAddr> = pargs
        .opt_value_from_str("--bind")
        .context("Invalid --bind address")?;

    let config = ServerConfig::from_env(bind, memory)?;
    config.validate()?;

    logging::init();
    info!(
        "Starting credit casino server at {} ({} storage)",
        config.bind, config.storage
    );

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics on http://{}/metrics", addr);
    }

    let (store, database): (Arc<dyn AccountStore>, Option<Database>) = match config.storage {
        StorageBackend::Memory => (Arc::new(MemoryAccountStore::new()), None),
        StorageBackend::Postgres => {
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            info!("Database connected successfully");

            let store = PgAccountStore::new(Arc::new(db.pool().clone()));
            store
                .ensure_schema()
                .await
                .context("Failed to prepare database schema")?;
            (Arc::new(store), Some(db))
        }
    };

    let ledger = Ledger::new(store, config.casino.starting_balance);
    let orchestrator = WagerOrchestrator::new(ledger, config.casino.clone());

    let app = api::create_router(api::AppState {
        orchestrator: Arc::new(orchestrator),
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    if let Some(db) = database {
        db.close().await;
        info!("Database pool closed");
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
