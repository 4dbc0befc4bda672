//! Graphite plaintext protocol parsing
//!
//! One sample per line: `name[;tag=value...] value [timestamp]`, timestamp
//! in (possibly fractional) seconds. A missing timestamp or `-1` takes the
//! server clock.

use crate::datapoint::{DataPoint, LabelSet};
use crate::error::{MetricsError, MetricsResult};

/// Parse a single Graphite plaintext line.
pub fn parse_line(line: &str, now_ms: i64) -> MetricsResult<DataPoint> {
    let mut fields = line.split_whitespace();

    let path = fields
        .next()
        .ok_or_else(|| MetricsError::graphite("empty line"))?;
    let raw_value = fields
        .next()
        .ok_or_else(|| MetricsError::graphite(format!("missing value in '{}'", line)))?;
    let raw_timestamp = fields.next();

    if fields.next().is_some() {
        return Err(MetricsError::graphite(format!(
            "unexpected trailing data in '{}'",
            line
        )));
    }

    let mut path_parts = path.split(';');
    let name = path_parts.next().unwrap_or_default();
    let mut labels = LabelSet::new();
    for tag in path_parts {
        let (key, value) = tag
            .split_once('=')
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| MetricsError::graphite(format!("malformed tag '{}'", tag)))?;
        labels.insert(key.to_string(), value.to_string());
    }

    let value: f64 = raw_value
        .parse()
        .map_err(|_| MetricsError::graphite(format!("invalid value '{}'", raw_value)))?;

    let timestamp_ms = match raw_timestamp {
        None | Some("-1") => now_ms,
        Some(ts) => {
            let seconds: f64 = ts
                .parse()
                .map_err(|_| MetricsError::graphite(format!("invalid timestamp '{}'", ts)))?;
            (seconds * 1000.0) as i64
        }
    };

    DataPoint::new(name, labels, timestamp_ms, value)
}
