//! Data point types shared by the ingestion parsers and the store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{MetricsError, MetricsResult};

/// Series identity: label name to label value
///
/// A `BTreeMap` keeps label order canonical so two sets holding the same
/// pairs always serialize, hash and compare identically.
pub type LabelSet = BTreeMap<String, String>;

/// A single sample for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Metric name
    pub name: String,
    /// Labels identifying the series, excluding the name
    pub labels: LabelSet,
    /// Sample time in milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Sample value
    pub value: f64,
}

impl DataPoint {
    /// Create a new data point after validating the name, label count and value
    pub fn new<S: Into<String>>(
        name: S,
        labels: LabelSet,
        timestamp_ms: i64,
        value: f64,
    ) -> MetricsResult<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(MetricsError::validation("Metric name cannot be empty"));
        }

        if name.len() > crate::MAX_METRIC_NAME_LENGTH {
            return Err(MetricsError::validation(format!(
                "Metric name too long: {} > {}",
                name.len(),
                crate::MAX_METRIC_NAME_LENGTH
            )));
        }

        if labels.len() > crate::MAX_LABELS_PER_POINT {
            return Err(MetricsError::validation(format!(
                "Too many labels: {} > {}",
                labels.len(),
                crate::MAX_LABELS_PER_POINT
            )));
        }

        // NaN and infinities have no JSON form
        if !value.is_finite() {
            return Err(MetricsError::validation(format!(
                "Value for {} must be finite, got {}",
                name, value
            )));
        }

        Ok(Self {
            name,
            labels,
            timestamp_ms,
            value,
        })
    }
}
