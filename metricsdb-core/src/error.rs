//! Error types for metricsdb operations

use thiserror::Error;

/// Result type for metricsdb operations
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Error types shared by the storage, ingestion and query subsystems
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Line protocol error on line {line}: {message}")]
    LineProtocol { line: usize, message: String },

    #[error("Graphite error: {0}")]
    Graphite(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0} subsystem is stopped")]
    Closed(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetricsError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query(message.into())
    }

    /// Create a new graphite error
    pub fn graphite<S: Into<String>>(message: S) -> Self {
        Self::Graphite(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error category for logging and status mapping
    pub fn category(&self) -> &'static str {
        match self {
            MetricsError::LineProtocol { .. } => "parse",
            MetricsError::Graphite(_) => "parse",
            MetricsError::Validation(_) => "validation",
            MetricsError::Query(_) => "query",
            MetricsError::Configuration(_) => "configuration",
            MetricsError::Closed(_) => "closed",
            MetricsError::Internal(_) => "internal",
            MetricsError::Io(_) => "io",
            MetricsError::Json(_) => "json",
        }
    }
}
