//! Talent Risk Web Server
//!
//! Run with: cargo run -p talentrisk-web

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use talentrisk_config::{Config, LoggingConfig, StorageBackend};
use talentrisk_db::{EmployeeRepository, EmployeeStore, MemoryStore, MongoStore};
use talentrisk_scorer::RiskModel;
use talentrisk_web::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = FmtSubscriber::builder().with_env_filter(filter);
    if logging.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn open_store(config: &Config, model: &RiskModel) -> anyhow::Result<Arc<dyn EmployeeStore>> {
    match config.storage.backend {
        StorageBackend::Mongo => {
            let store = MongoStore::connect(&config.storage).await?;
            // Start even when MongoDB is down; reads fall back to sample data.
            match store.ping().await {
                Ok(()) => {
                    store.ensure_indexes().await?;
                    info!(database = store.database_name(), "MongoDB reachable");
                }
                Err(err) => warn!(
                    error = %err,
                    uri = %config.storage.redacted_uri(),
                    "MongoDB unreachable at startup"
                ),
            }
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            let store = if config.storage.seed_samples {
                let roster = talentrisk_db::sample_roster(model);
                info!(count = roster.len(), "memory store seeded with sample roster");
                MemoryStore::with_employees(roster)
            } else {
                MemoryStore::new()
            };
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config.logging)?;
    config.log_source();

    info!("Starting Talent Risk Web Server...");

    let model = Arc::new(RiskModel::from_config(&config.scoring)?);
    info!(profile = ?model.profile(), weights = ?model.weights(), "risk model loaded");

    let store = open_store(&config, &model).await?;
    info!(backend = store.backend(), "storage ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;

    let state = AppState::new(EmployeeRepository::new(store, model), config);
    let app = talentrisk_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    info!("WebSocket endpoint at ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
