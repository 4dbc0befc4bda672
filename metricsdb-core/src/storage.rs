//! In-memory series store backed by a workspace directory
//!
//! Samples live in memory keyed by (metric name, label set). The workspace
//! directory holds a JSON snapshot that is loaded on open and written on
//! stop, so a restarted store over the same path sees earlier data.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::datapoint::{DataPoint, LabelSet};
use crate::error::{MetricsError, MetricsResult};
use crate::row::Row;

const DATA_DIR: &str = "data";
const SNAPSHOT_FILE: &str = "series.json";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SeriesKey {
    name: String,
    labels: LabelSet,
}

/// On-disk form of one series
#[derive(Debug, Serialize, Deserialize)]
struct SeriesSnapshot {
    name: String,
    labels: LabelSet,
    samples: Vec<(i64, f64)>,
}

/// Concurrent series store
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    series: RwLock<BTreeMap<SeriesKey, Vec<(i64, f64)>>>,
    closed: AtomicBool,
}

impl Storage {
    /// Open the store under `path`, creating the directory layout and
    /// loading a previous snapshot if one exists.
    pub fn open<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data_dir = path.join(DATA_DIR);
        fs::create_dir_all(&data_dir)?;

        let mut series = BTreeMap::new();
        let snapshot_path = data_dir.join(SNAPSHOT_FILE);
        if snapshot_path.exists() {
            let bytes = fs::read(&snapshot_path)?;
            let snapshots: Vec<SeriesSnapshot> = serde_json::from_slice(&bytes)?;
            for snapshot in snapshots {
                series.insert(
                    SeriesKey {
                        name: snapshot.name,
                        labels: snapshot.labels,
                    },
                    snapshot.samples,
                );
            }
        }

        info!(
            "Opened storage at {} with {} series",
            path.display(),
            series.len()
        );

        Ok(Self {
            path,
            series: RwLock::new(series),
            closed: AtomicBool::new(false),
        })
    }

    /// Workspace directory of this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Append points to their series; returns the number written.
    pub fn add_points(&self, points: Vec<DataPoint>) -> MetricsResult<usize> {
        if self.is_closed() {
            return Err(MetricsError::Closed("storage"));
        }

        let count = points.len();
        let mut series = self.series.write();
        for point in points {
            let key = SeriesKey {
                name: point.name,
                labels: point.labels,
            };
            series
                .entry(key)
                .or_default()
                .push((point.timestamp_ms, point.value));
        }

        debug!("Stored {} points, {} series total", count, series.len());
        Ok(count)
    }

    /// All series named `name` whose labels contain every pair in `filters`,
    /// samples sorted by timestamp.
    pub fn select(&self, name: &str, filters: &LabelSet) -> MetricsResult<Vec<Row>> {
        if self.is_closed() {
            return Err(MetricsError::Closed("storage"));
        }

        let series = self.series.read();
        let rows = series
            .iter()
            .filter(|(key, _)| key.name == name)
            .filter(|(key, _)| {
                filters
                    .iter()
                    .all(|(k, v)| key.labels.get(k).is_some_and(|actual| actual == v))
            })
            .map(|(key, samples)| {
                let mut samples = samples.clone();
                samples.sort_by_key(|(ts, _)| *ts);

                let mut row = Row::new(key.labels.clone());
                for (ts, value) in samples {
                    row.push(ts, value);
                }
                row
            })
            .collect();

        Ok(rows)
    }

    /// Number of distinct series
    pub fn series_count(&self) -> usize {
        self.series.read().len()
    }

    /// Close the store and write its snapshot. Fails if already stopped.
    pub fn stop(&self) -> MetricsResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(MetricsError::Closed("storage"));
        }

        let snapshots: Vec<SeriesSnapshot> = self
            .series
            .read()
            .iter()
            .map(|(key, samples)| SeriesSnapshot {
                name: key.name.clone(),
                labels: key.labels.clone(),
                samples: samples.clone(),
            })
            .collect();

        let data_dir = self.path.join(DATA_DIR);
        fs::create_dir_all(&data_dir)?;
        let tmp_path = data_dir.join(format!("{}.tmp", SNAPSHOT_FILE));
        fs::write(&tmp_path, serde_json::to_vec(&snapshots)?)?;
        fs::rename(&tmp_path, data_dir.join(SNAPSHOT_FILE))?;

        info!(
            "Storage stopped, persisted {} series to {}",
            snapshots.len(),
            data_dir.display()
        );
        Ok(())
    }
}
