//! Ingestion subsystem
//!
//! Owns the write path into storage: line protocol payloads arriving over
//! HTTP and the Graphite plaintext listener on the secondary address.

use metricsdb_core::{
    line_protocol::LineProtocolParser, DataPoint, MetricsError, MetricsResult, Storage,
};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::graphite;
use crate::metrics::IngestMetrics;

/// Running ingestion subsystem
pub struct IngestionService {
    storage: Arc<Storage>,
    parser: LineProtocolParser,
    metrics: Arc<IngestMetrics>,
    graphite_addr: SocketAddr,
    shutdown: CancellationToken,
    graphite_task: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl IngestionService {
    /// Attach to `storage` and start the Graphite listener on `graphite_listen_addr`.
    pub async fn start(storage: Arc<Storage>, graphite_listen_addr: &str) -> MetricsResult<Self> {
        let listener = TcpListener::bind(graphite_listen_addr).await?;
        let graphite_addr = listener.local_addr()?;
        info!("Graphite listener bound to {}", graphite_addr);

        let metrics = Arc::new(IngestMetrics::new());
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(graphite::serve(
            listener,
            storage.clone(),
            metrics.clone(),
            shutdown.clone(),
        ));

        Ok(Self {
            storage,
            parser: LineProtocolParser::default(),
            metrics,
            graphite_addr,
            shutdown,
            graphite_task: Mutex::new(Some(task)),
            stopped: AtomicBool::new(false),
        })
    }

    /// Address the Graphite listener actually bound to
    pub fn graphite_addr(&self) -> SocketAddr {
        self.graphite_addr
    }

    pub fn metrics(&self) -> &IngestMetrics {
        &self.metrics
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Parse and store a line protocol payload; returns the points stored.
    pub fn ingest_line_protocol(&self, payload: &str) -> MetricsResult<usize> {
        if self.is_stopped() {
            return Err(MetricsError::Closed("ingestion"));
        }

        let now_ms = chrono::Utc::now().timestamp_millis();
        let points = self.parser.parse(payload, now_ms).inspect_err(|_| {
            self.metrics.record_parse_error();
        })?;

        let written = self.ingest_points(points)?;
        self.metrics.record_http_write(written);
        Ok(written)
    }

    /// Store already parsed points
    pub fn ingest_points(&self, points: Vec<DataPoint>) -> MetricsResult<usize> {
        let written = self.storage.add_points(points)?;
        debug!("Ingested {} points", written);
        Ok(written)
    }

    /// Stop accepting writes and shut the Graphite listener down.
    pub async fn stop(&self) -> MetricsResult<()> {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return Err(MetricsError::Closed("ingestion"));
        }

        self.shutdown.cancel();
        let task = self.graphite_task.lock().take();
        if let Some(task) = task {
            task.await.map_err(|e| {
                MetricsError::internal(format!("Graphite listener task failed: {}", e))
            })?;
        }

        info!("Ingestion subsystem stopped");
        Ok(())
    }
}
