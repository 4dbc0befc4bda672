//! Graphite plaintext TCP listener
//!
//! Accepts connections on the secondary listen address and stores one sample
//! per line. Malformed lines are counted and logged, never fatal for the
//! connection.

use metricsdb_core::{graphite, Storage};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::metrics::IngestMetrics;

/// Accept loop; returns once `shutdown` is cancelled.
pub(crate) async fn serve(
    listener: TcpListener,
    storage: Arc<Storage>,
    metrics: Arc<IngestMetrics>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Graphite listener shutting down");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!("Graphite connection from {}", peer);
                    let storage = storage.clone();
                    let metrics = metrics.clone();
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, storage, metrics, shutdown).await;
                    });
                }
                Err(e) => warn!("Graphite accept failed: {}", e),
            }
        }
    }
}

async fn handle_connection<R>(
    stream: R,
    storage: Arc<Storage>,
    metrics: Arc<IngestMetrics>,
    shutdown: CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                ingest_line(line, &storage, &metrics);
            }
            Ok(None) => return,
            Err(e) => {
                warn!("Graphite connection read failed: {}", e);
                return;
            }
        }
    }
}

fn ingest_line(line: &str, storage: &Storage, metrics: &IngestMetrics) {
    let now_ms = chrono::Utc::now().timestamp_millis();
    match graphite::parse_line(line, now_ms) {
        Ok(point) => match storage.add_points(vec![point]) {
            Ok(_) => metrics.record_graphite_line(),
            Err(e) => warn!("Dropping Graphite line: {}", e),
        },
        Err(e) => {
            metrics.record_parse_error();
            warn!("Rejected Graphite line '{}': {}", line, e);
        }
    }
}
