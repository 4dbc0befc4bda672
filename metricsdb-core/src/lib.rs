//! # metricsdb Core Library
//!
//! Shared library providing the data types, wire-format parsers and the
//! in-memory series store used by the metricsdb ingest, query and server
//! crates.
//!
//! ## Features
//!
//! - **Data Types**: data points, label sets and exported result rows
//! - **Parsers**: Influx line protocol and Graphite plaintext
//! - **Storage**: a concurrent series store backed by a workspace directory
//! - **Errors**: a single error type shared across the service crates

pub mod datapoint;
pub mod error;
pub mod graphite;
pub mod line_protocol;
pub mod row;
pub mod storage;

// Re-export commonly used types
pub use datapoint::{DataPoint, LabelSet};
pub use error::{MetricsError, MetricsResult};
pub use row::Row;
pub use storage::Storage;

/// Maximum number of labels allowed per data point
pub const MAX_LABELS_PER_POINT: usize = 100;

/// Maximum length for metric names
pub const MAX_METRIC_NAME_LENGTH: usize = 256;
