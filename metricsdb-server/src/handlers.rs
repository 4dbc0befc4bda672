use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::AppState;

/// Health check endpoint
///
/// 200 while every subsystem accepts traffic, 503 once any has stopped.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ingestion_up = !state.ingestion.is_stopped();
    let query_up = !state.query.is_stopped();
    let healthy = ingestion_up && query_up;

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "service": "metricsdb",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "ingestion": if ingestion_up { "healthy" } else { "stopped" },
                "query": if query_up { "healthy" } else { "stopped" }
            }
        })),
    )
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "{}{}",
        state.ingestion.metrics().render_prometheus(),
        state.query.metrics().render_prometheus()
    );

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}
