//! HTTP handlers for the ingestion API

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::ingestion::IngestionService;

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// List of error messages
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn from_error<S: ToString>(error: S) -> Self {
        Self {
            errors: vec![error.to_string()],
        }
    }
}

/// `POST /write`: line protocol body, 204 on success
pub async fn write_handler(
    State(service): State<Arc<IngestionService>>,
    body: Bytes,
) -> Response {
    let payload = match std::str::from_utf8(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Rejected non UTF-8 write payload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::from_error("Payload is not valid UTF-8")),
            )
                .into_response();
        }
    };

    match service.ingest_line_protocol(payload) {
        Ok(written) => {
            debug!("Write request stored {} points", written);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            let status = match err.category() {
                "parse" | "validation" => StatusCode::BAD_REQUEST,
                "closed" => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            if status.is_server_error() {
                error!("Write request failed: {}", err);
            } else {
                warn!("Write request rejected: {}", err);
            }
            (status, Json(ErrorResponse::from_error(err))).into_response()
        }
    }
}
