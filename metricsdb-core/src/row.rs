//! Exported series rows, the wire shape of query results

use serde::{Deserialize, Serialize};

use crate::datapoint::LabelSet;

/// One exported series: its labels plus parallel value/timestamp arrays
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    /// Series labels
    #[serde(default)]
    pub metric: LabelSet,
    /// Sample values in timestamp order
    #[serde(default)]
    pub values: Vec<f64>,
    /// Sample timestamps in milliseconds, same length as `values`
    #[serde(default)]
    pub timestamps: Vec<i64>,
}

impl Row {
    pub fn new(metric: LabelSet) -> Self {
        Self {
            metric,
            values: Vec::new(),
            timestamps: Vec::new(),
        }
    }

    /// Append one sample
    pub fn push(&mut self, timestamp_ms: i64, value: f64) {
        self.timestamps.push(timestamp_ms);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
