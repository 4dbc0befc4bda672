//! Influx line protocol parsing
//!
//! Accepts `measurement[,tag=value...] field=value[,field=value...] [timestamp]`
//! with nanosecond timestamps. The `value` field maps to a metric named after
//! the measurement; any other field `f` maps to `measurement_f`. String
//! fields carry no numeric sample and are skipped.

use tracing::trace;

use crate::datapoint::{DataPoint, LabelSet};
use crate::error::{MetricsError, MetricsResult};

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Line protocol parser for write payloads
#[derive(Debug, Clone)]
pub struct LineProtocolParser {
    /// Maximum number of points accepted from a single payload
    max_points: usize,
}

impl Default for LineProtocolParser {
    fn default() -> Self {
        Self::new(100_000)
    }
}

impl LineProtocolParser {
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    /// Parse a whole payload; `now_ms` stamps lines without a timestamp.
    pub fn parse(&self, payload: &str, now_ms: i64) -> MetricsResult<Vec<DataPoint>> {
        let mut points = Vec::new();

        for (idx, raw) in payload.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            parse_line(line, now_ms, &mut points).map_err(|message| {
                MetricsError::LineProtocol {
                    line: idx + 1,
                    message,
                }
            })?;

            if points.len() > self.max_points {
                return Err(MetricsError::validation(format!(
                    "Payload exceeds {} points",
                    self.max_points
                )));
            }
        }

        trace!("Parsed {} points from line protocol payload", points.len());
        Ok(points)
    }
}

fn parse_line(line: &str, now_ms: i64, out: &mut Vec<DataPoint>) -> Result<(), String> {
    let sections: Vec<&str> = split_unescaped(line, ' ')
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    let (series, fields, timestamp) = match sections.as_slice() {
        [series, fields] => (*series, *fields, None),
        [series, fields, ts] => (*series, *fields, Some(*ts)),
        _ => return Err(format!("expected 2 or 3 sections, found {}", sections.len())),
    };

    let timestamp_ms = match timestamp {
        Some(ts) => {
            let nanos: i64 = ts
                .parse()
                .map_err(|_| format!("invalid timestamp '{}'", ts))?;
            nanos / NANOS_PER_MILLI
        }
        None => now_ms,
    };

    let mut series_parts = split_unescaped(series, ',').into_iter();
    let measurement = series_parts
        .next()
        .map(unescape)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| "missing measurement".to_string())?;

    let mut labels = LabelSet::new();
    for tag in series_parts {
        let (key, value) =
            split_pair(tag).ok_or_else(|| format!("malformed tag '{}'", tag))?;
        labels.insert(key, value);
    }

    for field in split_unescaped(fields, ',') {
        let (key, raw_value) =
            split_pair(field).ok_or_else(|| format!("malformed field '{}'", field))?;
        let Some(value) = parse_field_value(&raw_value)? else {
            continue;
        };

        let name = if key == "value" {
            measurement.clone()
        } else {
            format!("{}_{}", measurement, key)
        };

        let point = DataPoint::new(name, labels.clone(), timestamp_ms, value)
            .map_err(|err| err.to_string())?;
        out.push(point);
    }

    Ok(())
}

/// Numeric value of a field, or `None` for string fields.
fn parse_field_value(raw: &str) -> Result<Option<f64>, String> {
    if raw.starts_with('"') {
        return Ok(None);
    }

    let value = match raw {
        "t" | "T" | "true" | "True" | "TRUE" => 1.0,
        "f" | "F" | "false" | "False" | "FALSE" => 0.0,
        _ if raw.ends_with('i') => raw[..raw.len() - 1]
            .parse::<i64>()
            .map_err(|_| format!("invalid integer '{}'", raw))? as f64,
        _ if raw.ends_with('u') => raw[..raw.len() - 1]
            .parse::<u64>()
            .map_err(|_| format!("invalid unsigned integer '{}'", raw))? as f64,
        _ => raw
            .parse::<f64>()
            .map_err(|_| format!("invalid float '{}'", raw))?,
    };

    Ok(Some(value))
}

fn split_pair(input: &str) -> Option<(String, String)> {
    let key = split_unescaped(input, '=').into_iter().next()?;
    if key.is_empty() || key.len() == input.len() {
        return None;
    }
    // Everything after the first separator belongs to the value
    let value = &input[key.len() + 1..];
    if value.is_empty() {
        return None;
    }
    Some((unescape(key), unescape(value)))
}

/// Split on `sep`, honoring backslash escapes and double-quoted strings.
fn split_unescaped(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    let mut quoted = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => quoted = !quoted,
            c if c == sep && !quoted => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&input[start..]);
    parts
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}
