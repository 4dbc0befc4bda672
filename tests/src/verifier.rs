//! Row-set verification
//!
//! Checks that every expected row appears in the actual result. Rows match
//! when their label sets hold the same pairs and their values are equal in
//! order; timestamps are ignored because the server may assign them. Extra
//! actual rows are allowed.

use metricsdb_core::{LabelSet, Row};

use crate::error::VerificationFailure;

/// Two label sets are equal when they hold the same keys with the same values
pub fn labels_equal(a: &LabelSet, b: &LabelSet) -> bool {
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

/// Value sequences are equal element for element, in order
pub fn values_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Whether `actual` satisfies `expected`
pub fn rows_match(actual: &Row, expected: &Row) -> bool {
    labels_equal(&actual.metric, &expected.metric) && values_equal(&actual.values, &expected.values)
}

/// Verify that `expected` is contained in `actual` by match.
///
/// Each actual row consumes at most one expected row, so duplicated expected
/// rows need as many matching actual rows.
pub fn verify(actual: &[Row], expected: &[Row]) -> Result<(), VerificationFailure> {
    let mut remaining = expected.to_vec();

    for row in actual {
        if let Some(idx) = remaining.iter().position(|candidate| rows_match(row, candidate)) {
            remaining.swap_remove(idx);
        }
        if remaining.is_empty() {
            break;
        }
    }

    if remaining.is_empty() {
        Ok(())
    } else {
        Err(VerificationFailure {
            unmatched: remaining,
            actual: actual.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(labels: &[(&str, &str)], values: &[f64], timestamps: &[i64]) -> Row {
        Row {
            metric: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            values: values.to_vec(),
            timestamps: timestamps.to_vec(),
        }
    }

    #[test]
    fn test_labels_equal() {
        let a = row(&[("host", "a"), ("dc", "eu")], &[], &[]).metric;
        let b = row(&[("dc", "eu"), ("host", "a")], &[], &[]).metric;
        let c = row(&[("host", "a")], &[], &[]).metric;
        let d = row(&[("host", "a"), ("dc", "us")], &[], &[]).metric;

        assert!(labels_equal(&a, &b));
        assert!(!labels_equal(&a, &c));
        assert!(!labels_equal(&c, &a));
        assert!(!labels_equal(&a, &d));
        assert!(labels_equal(&LabelSet::new(), &LabelSet::new()));
    }

    #[test]
    fn test_timestamps_are_ignored() {
        let actual = vec![row(&[("host", "a")], &[1.0, 2.0], &[111, 222])];
        let expected = vec![row(&[("host", "a")], &[1.0, 2.0], &[1, 2])];
        assert!(verify(&actual, &expected).is_ok());
    }

    #[test]
    fn test_value_order_matters() {
        let actual = vec![row(&[("host", "a")], &[2.0, 1.0], &[1, 2])];
        let expected = vec![row(&[("host", "a")], &[1.0, 2.0], &[1, 2])];
        assert!(verify(&actual, &expected).is_err());
    }

    #[test]
    fn test_superset_passes() {
        let expected = vec![row(&[("host", "a")], &[1.0], &[1])];
        let actual = vec![
            row(&[("host", "z")], &[9.0], &[1]),
            row(&[("host", "a")], &[1.0], &[1]),
            row(&[("host", "b")], &[1.0], &[1]),
        ];
        assert!(verify(&actual, &expected).is_ok());
    }

    #[test]
    fn test_reordering_actual_keeps_outcome() {
        let expected = vec![
            row(&[("host", "a")], &[1.0], &[1]),
            row(&[("host", "b")], &[2.0], &[1]),
        ];
        let mut actual = vec![
            row(&[("host", "b")], &[2.0], &[5]),
            row(&[("host", "c")], &[3.0], &[5]),
            row(&[("host", "a")], &[1.0], &[5]),
        ];

        for _ in 0..actual.len() {
            assert!(verify(&actual, &expected).is_ok());
            actual.rotate_left(1);
        }
        actual.reverse();
        assert!(verify(&actual, &expected).is_ok());

        // drop the match for host=b: every ordering fails
        actual.retain(|r| r.metric.get("host").map(String::as_str) != Some("b"));
        for _ in 0..actual.len() {
            assert!(verify(&actual, &expected).is_err());
            actual.rotate_left(1);
        }
    }

    #[test]
    fn test_missing_row_reports_unmatched_and_actual() {
        let expected = vec![
            row(&[("host", "a")], &[1.0], &[1]),
            row(&[("host", "b")], &[2.0], &[1]),
        ];
        let actual = vec![row(&[("host", "a")], &[1.0], &[1])];

        let failure = verify(&actual, &expected).unwrap_err();
        assert_eq!(failure.unmatched, vec![row(&[("host", "b")], &[2.0], &[1])]);
        assert_eq!(failure.actual, actual);
    }

    #[test]
    fn test_empty_actual_fails() {
        let expected = vec![row(&[("host", "a")], &[1.0], &[1])];
        let failure = verify(&[], &expected).unwrap_err();
        assert_eq!(failure.unmatched, expected);
        assert!(failure.actual.is_empty());
    }

    #[test]
    fn test_duplicate_expected_rows_need_distinct_actual_rows() {
        let expected = vec![
            row(&[("host", "a")], &[1.0], &[1]),
            row(&[("host", "a")], &[1.0], &[1]),
        ];

        let once = vec![row(&[("host", "a")], &[1.0], &[1])];
        let failure = verify(&once, &expected).unwrap_err();
        assert_eq!(failure.unmatched.len(), 1);

        let twice = vec![
            row(&[("host", "a")], &[1.0], &[1]),
            row(&[("host", "a")], &[1.0], &[2]),
        ];
        assert!(verify(&twice, &expected).is_ok());
    }

    #[test]
    fn test_expected_is_not_mutated() {
        let expected = vec![row(&[("host", "a")], &[1.0], &[1])];
        let actual = expected.clone();
        verify(&actual, &expected).unwrap();
        assert_eq!(expected.len(), 1);
    }
}
