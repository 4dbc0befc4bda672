//! Metrics collection and reporting for the query subsystem

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe metrics collector for the query subsystem
#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Total queries executed
    pub queries_total: AtomicU64,

    /// Total query errors
    pub errors_total: AtomicU64,

    /// Total series returned
    pub series_returned_total: AtomicU64,

    /// Total samples returned
    pub datapoints_returned_total: AtomicU64,

    /// Total query execution time
    pub query_time_total_ms: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Serialize)]
pub struct QueryMetricsSnapshot {
    pub queries_total: u64,
    pub errors_total: u64,
    pub series_returned_total: u64,
    pub datapoints_returned_total: u64,
    pub avg_query_time_ms: f64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed query
    pub fn record_query(&self, duration: Duration, series: usize, datapoints: usize) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        self.series_returned_total
            .fetch_add(series as u64, Ordering::Relaxed);
        self.datapoints_returned_total
            .fetch_add(datapoints as u64, Ordering::Relaxed);
        self.query_time_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a query error
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueryMetricsSnapshot {
        let queries = self.queries_total.load(Ordering::Relaxed);
        let total_ms = self.query_time_total_ms.load(Ordering::Relaxed);
        QueryMetricsSnapshot {
            queries_total: queries,
            errors_total: self.errors_total.load(Ordering::Relaxed),
            series_returned_total: self.series_returned_total.load(Ordering::Relaxed),
            datapoints_returned_total: self.datapoints_returned_total.load(Ordering::Relaxed),
            avg_query_time_ms: if queries > 0 {
                total_ms as f64 / queries as f64
            } else {
                0.0
            },
        }
    }

    /// Render the counters in Prometheus text exposition format
    pub fn render_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "# HELP metricsdb_queries_total Total number of queries executed\n\
             # TYPE metricsdb_queries_total counter\n\
             metricsdb_queries_total {}\n\
             # HELP metricsdb_query_errors_total Total number of query errors\n\
             # TYPE metricsdb_query_errors_total counter\n\
             metricsdb_query_errors_total {}\n\
             # HELP metricsdb_series_returned_total Total number of series returned\n\
             # TYPE metricsdb_series_returned_total counter\n\
             metricsdb_series_returned_total {}\n\
             # HELP metricsdb_datapoints_returned_total Total number of data points returned\n\
             # TYPE metricsdb_datapoints_returned_total counter\n\
             metricsdb_datapoints_returned_total {}\n\
             # HELP metricsdb_avg_query_time_ms Average query execution time in milliseconds\n\
             # TYPE metricsdb_avg_query_time_ms gauge\n\
             metricsdb_avg_query_time_ms {}\n",
            snapshot.queries_total,
            snapshot.errors_total,
            snapshot.series_returned_total,
            snapshot.datapoints_returned_total,
            snapshot.avg_query_time_ms
        )
    }
}
