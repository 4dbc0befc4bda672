//! Metrics collection and reporting for the ingestion subsystem

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe metrics collector
#[derive(Debug, Default)]
pub struct IngestMetrics {
    /// Total data points stored
    pub datapoints_total: AtomicU64,

    /// Total write requests accepted over HTTP
    pub http_writes_total: AtomicU64,

    /// Total Graphite lines accepted
    pub graphite_lines_total: AtomicU64,

    /// Payloads or lines rejected by a parser
    pub parse_errors_total: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Serialize)]
pub struct IngestMetricsSnapshot {
    pub datapoints_total: u64,
    pub http_writes_total: u64,
    pub graphite_lines_total: u64,
    pub parse_errors_total: u64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_http_write(&self, datapoints: usize) {
        self.http_writes_total.fetch_add(1, Ordering::Relaxed);
        self.datapoints_total
            .fetch_add(datapoints as u64, Ordering::Relaxed);
    }

    pub fn record_graphite_line(&self) {
        self.graphite_lines_total.fetch_add(1, Ordering::Relaxed);
        self.datapoints_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_error(&self) {
        self.parse_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IngestMetricsSnapshot {
        IngestMetricsSnapshot {
            datapoints_total: self.datapoints_total.load(Ordering::Relaxed),
            http_writes_total: self.http_writes_total.load(Ordering::Relaxed),
            graphite_lines_total: self.graphite_lines_total.load(Ordering::Relaxed),
            parse_errors_total: self.parse_errors_total.load(Ordering::Relaxed),
        }
    }

    /// Render the counters in Prometheus text exposition format
    pub fn render_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "# HELP metricsdb_ingest_datapoints_total Total number of data points stored\n\
             # TYPE metricsdb_ingest_datapoints_total counter\n\
             metricsdb_ingest_datapoints_total {}\n\
             # HELP metricsdb_ingest_http_writes_total Total number of accepted write requests\n\
             # TYPE metricsdb_ingest_http_writes_total counter\n\
             metricsdb_ingest_http_writes_total {}\n\
             # HELP metricsdb_ingest_graphite_lines_total Total number of accepted Graphite lines\n\
             # TYPE metricsdb_ingest_graphite_lines_total counter\n\
             metricsdb_ingest_graphite_lines_total {}\n\
             # HELP metricsdb_ingest_parse_errors_total Total number of rejected payloads\n\
             # TYPE metricsdb_ingest_parse_errors_total counter\n\
             metricsdb_ingest_parse_errors_total {}\n",
            snapshot.datapoints_total,
            snapshot.http_writes_total,
            snapshot.graphite_lines_total,
            snapshot.parse_errors_total
        )
    }
}
