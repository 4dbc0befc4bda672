//! metricsdb Server Library
//!
//! The front-end HTTP listener: merges the ingestion and query routes with
//! the health and metrics endpoints, and owns the serving task so callers
//! can start and stop it explicitly.

pub mod config;
pub mod handlers;

pub use config::ServerConfig;

use metricsdb_core::{MetricsError, MetricsResult};
use metricsdb_ingest::IngestionService;
use metricsdb_query::QueryEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Application state shared across front-end handlers
#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryEngine>,
}

/// Create the front-end router
pub fn create_router(state: AppState, max_request_size: usize) -> axum::Router {
    use crate::handlers::*;
    use axum::{extract::DefaultBodyLimit, routing::get};
    use tower::ServiceBuilder;
    use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

    let ingestion = state.ingestion.clone();
    let query = state.query.clone();

    axum::Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .merge(metricsdb_ingest::router(ingestion))
        .merge(metricsdb_query::router(query))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(
                            tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::DEBUG),
                        )
                        .on_response(
                            tower_http::trace::DefaultOnResponse::new()
                                .level(tracing::Level::DEBUG),
                        ),
                )
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_request_size)),
        )
}

/// Front-end listener running on its own task
pub struct HttpServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl HttpServer {
    /// Bind `listen_addr` and start serving `router` in the background.
    pub async fn start(listen_addr: &str, router: axum::Router) -> MetricsResult<Self> {
        let listener = TcpListener::bind(listen_addr).await?;
        let local_addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();

        let signal = shutdown.clone();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
        });

        info!("metricsdb front-end listening on {}", local_addr);
        Ok(Self {
            local_addr,
            shutdown,
            task,
        })
    }

    /// Address the listener actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, drain in-flight requests and wait for the
    /// serving task to exit.
    pub async fn stop(self) -> MetricsResult<()> {
        self.shutdown.cancel();
        match self.task.await {
            Ok(result) => result?,
            Err(e) => {
                return Err(MetricsError::internal(format!(
                    "HTTP server task failed: {}",
                    e
                )))
            }
        }
        info!("metricsdb front-end on {} stopped", self.local_addr);
        Ok(())
    }
}
