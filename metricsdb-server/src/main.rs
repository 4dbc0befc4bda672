use anyhow::{Context, Result};
use metricsdb_core::Storage;
use metricsdb_ingest::IngestionService;
use metricsdb_query::QueryEngine;
use metricsdb_server::{create_router, AppState, HttpServer, ServerConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = ServerConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    // Storage first; query and ingestion attach to it
    let storage = Arc::new(
        Storage::open(&config.storage_data_path).context("Failed to open storage")?,
    );
    let query = Arc::new(QueryEngine::new(storage.clone()));
    let ingestion = Arc::new(
        IngestionService::start(storage.clone(), &config.graphite_listen_addr)
            .await
            .context("Failed to start ingestion")?,
    );

    let state = AppState {
        ingestion: ingestion.clone(),
        query: query.clone(),
    };
    let server = HttpServer::start(
        &config.http_listen_addr,
        create_router(state, config.max_request_size),
    )
    .await
    .context("Failed to start HTTP listener")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    ingestion.stop().await.context("Failed to stop ingestion")?;
    storage.stop().context("Failed to stop storage")?;
    query.stop().context("Failed to stop query")?;
    server.stop().await.context("Failed to stop HTTP listener")?;

    info!("metricsdb stopped");
    Ok(())
}
