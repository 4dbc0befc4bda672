//! metricsdb Ingestion Library
//!
//! The ingestion subsystem: line protocol writes over HTTP, the Graphite
//! plaintext listener and the counters describing both.

mod graphite;
pub mod handlers;
pub mod ingestion;
pub mod metrics;

// Re-export commonly used types
pub use ingestion::IngestionService;
pub use metrics::IngestMetrics;

use std::sync::Arc;

/// Routes served by the ingestion subsystem
pub fn router(service: Arc<IngestionService>) -> axum::Router {
    use axum::routing::post;

    axum::Router::new()
        .route("/write", post(handlers::write_handler))
        .with_state(service)
}
