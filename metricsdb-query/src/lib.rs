//! metricsdb Query Library
//!
//! The query subsystem: exports stored series as newline-delimited JSON rows.

pub mod handlers;
pub mod metrics;
pub mod query_engine;

// Re-export commonly used types
pub use metrics::QueryMetrics;
pub use query_engine::{QueryEngine, QueryRequest};

use std::sync::Arc;

/// Routes served by the query subsystem
pub fn router(engine: Arc<QueryEngine>) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/query", get(handlers::query_handler))
        .with_state(engine)
}
