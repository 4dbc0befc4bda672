use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use metricsdb_core::{MetricsResult, Row};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::query_engine::{QueryEngine, QueryRequest};

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// `GET /query?metric=<name>[&label=value...]`
///
/// Streams one JSON row per line. An unknown metric yields an empty body.
pub async fn query_handler(
    State(engine): State<Arc<QueryEngine>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    debug!("Received query: {:?}", params);

    let request = match QueryRequest::from_params(&params) {
        Ok(request) => request,
        Err(err) => {
            warn!("Query validation failed: {}", err);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid query",
                    "message": err.to_string()
                })),
            )
                .into_response();
        }
    };

    let encoded = engine.execute(&request).and_then(|rows| encode_rows(&rows));
    match encoded {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(err) => {
            let status_code = match err.category() {
                "validation" => StatusCode::BAD_REQUEST,
                "closed" => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error!("Query execution failed: {}", err);
            (
                status_code,
                Json(json!({
                    "error": "Query execution failed",
                    "message": err.to_string(),
                    "category": err.category()
                })),
            )
                .into_response()
        }
    }
}

/// Newline-delimited JSON encoding of `rows`
pub fn encode_rows(rows: &[Row]) -> MetricsResult<Vec<u8>> {
    let mut body = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut body, row)?;
        body.push(b'\n');
    }
    Ok(body)
}
