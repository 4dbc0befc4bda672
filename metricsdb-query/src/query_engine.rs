//! Query execution over the series store

use metricsdb_core::{LabelSet, MetricsError, MetricsResult, Row, Storage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::metrics::QueryMetrics;

/// Parsed `/query` parameters
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Metric name to export
    pub metric: String,
    /// Every other parameter is an exact label match
    pub filters: LabelSet,
}

impl QueryRequest {
    pub fn from_params(params: &HashMap<String, String>) -> MetricsResult<Self> {
        let metric = params
            .get("metric")
            .filter(|m| !m.is_empty())
            .cloned()
            .ok_or_else(|| MetricsError::validation("Missing required parameter 'metric'"))?;

        let filters = params
            .iter()
            .filter(|(key, _)| key.as_str() != "metric")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self { metric, filters })
    }
}

/// Query subsystem attached to a store
pub struct QueryEngine {
    storage: Arc<Storage>,
    metrics: QueryMetrics,
    stopped: AtomicBool,
}

impl QueryEngine {
    pub fn new(storage: Arc<Storage>) -> Self {
        info!("Query engine attached to {}", storage.path().display());
        Self {
            storage,
            metrics: QueryMetrics::new(),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn metrics(&self) -> &QueryMetrics {
        &self.metrics
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Run a query and return one row per matching series
    pub fn execute(&self, request: &QueryRequest) -> MetricsResult<Vec<Row>> {
        if self.is_stopped() {
            return Err(MetricsError::Closed("query"));
        }

        let start = Instant::now();
        match self.storage.select(&request.metric, &request.filters) {
            Ok(rows) => {
                let samples: usize = rows.iter().map(Row::len).sum();
                self.metrics.record_query(start.elapsed(), rows.len(), samples);
                debug!(
                    "Query for '{}' returned {} series",
                    request.metric,
                    rows.len()
                );
                Ok(rows)
            }
            Err(err) => {
                self.metrics.record_error();
                Err(err)
            }
        }
    }

    /// Reject further queries. Fails if already stopped.
    pub fn stop(&self) -> MetricsResult<()> {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return Err(MetricsError::Closed("query"));
        }
        info!("Query subsystem stopped");
        Ok(())
    }
}
