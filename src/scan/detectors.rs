//! Issue detectors.
//!
//! Each detector is a pure read-only pass over the dataset producing zero or
//! more issues. Detectors never fail: a condition they cannot analyze is
//! either skipped (insufficient signal) or reported as an issue.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::{
    dataset::{Column, DataType, Dataset, Value},
    issue::{Issue, IssueKind, IssueMetrics, Severity},
    stats,
};

/// Offending values carried in a type-inconsistency issue, at most.
const MAX_EXAMPLE_VALUES: usize = 5;

/// Minimum non-missing numeric values before IQR fences mean anything.
const MIN_OUTLIER_SAMPLES: usize = 4;

/// Separator for canonical row keys; never appears in cell encodings.
const ROW_KEY_SEPARATOR: char = '\u{1f}';

/// One issue per column with at least one missing cell.
///
/// Blank text cells count as missing alongside nulls.
pub(crate) fn detect_missing(dataset: &Dataset) -> Vec<Issue> {
    let total_rows = dataset.num_rows();
    if total_rows == 0 {
        return Vec::new();
    }
    let mut issues = Vec::new();
    for column in dataset.columns() {
        let missing_count = column.missing_count();
        if missing_count == 0 {
            continue;
        }
        let percent = missing_count as f64 / total_rows as f64 * 100.0;
        let missing_percent = stats::round1(percent);
        let description = format!(
            "Found {missing_count} missing value(s) ({missing_percent:.1}%) in column '{}'",
            column.name()
        );
        issues.push(Issue::new(
            IssueKind::MissingValues,
            Some(column.name().to_string()),
            Severity::from_percent(percent),
            description,
            IssueMetrics::Missing {
                missing_count,
                total_rows,
                missing_percent,
            },
        ));
    }
    issues
}

/// One issue per numeric or datetime column holding non-missing cells that
/// fail to parse under the declared type.
pub(crate) fn detect_type_inconsistencies(dataset: &Dataset) -> Vec<Issue> {
    let mut issues = Vec::new();
    for column in dataset.columns() {
        if !matches!(column.data_type(), DataType::Numeric | DataType::DateTime) {
            continue;
        }
        let non_null_count = column
            .values()
            .iter()
            .filter(|v| !v.is_missing())
            .count();
        if non_null_count == 0 {
            continue;
        }
        let mut invalid_count = 0;
        let mut examples = Vec::new();
        for value in column.values() {
            if value.is_missing() || value.conforms_to(column.data_type()) {
                continue;
            }
            invalid_count += 1;
            if examples.len() < MAX_EXAMPLE_VALUES {
                examples.push(value.canonical());
            }
        }
        if invalid_count == 0 {
            continue;
        }
        let percent = invalid_count as f64 / non_null_count as f64 * 100.0;
        let description = format!(
            "Column '{}' is declared {} but contains {invalid_count} unparseable value(s)",
            column.name(),
            column.data_type()
        );
        issues.push(Issue::new(
            IssueKind::TypeInconsistency,
            Some(column.name().to_string()),
            Severity::from_percent(percent),
            description,
            IssueMetrics::TypeMismatch {
                invalid_count,
                non_null_count,
                invalid_percent: stats::round1(percent),
                examples,
            },
        ));
    }
    issues
}

/// Row-index groups sharing identical values across the key columns (all
/// columns when `key` is `None`), restricted to groups of more than one row,
/// in first-seen order.
///
/// Shared with the duplicate fixer so detection and removal agree on row
/// identity.
pub(crate) fn duplicate_groups(dataset: &Dataset, key: Option<&[String]>) -> Vec<Vec<usize>> {
    let columns: Vec<&Column> = match key {
        Some(names) => names.iter().filter_map(|n| dataset.column(n)).collect(),
        None => dataset.columns().collect(),
    };
    if columns.is_empty() {
        return Vec::new();
    }
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for row in 0..dataset.num_rows() {
        let mut row_key = String::new();
        for column in &columns {
            if !row_key.is_empty() {
                row_key.push(ROW_KEY_SEPARATOR);
            }
            match column.get(row) {
                Some(value) => row_key.push_str(&value.canonical()),
                None => row_key.push_str("NULL"),
            }
        }
        groups.entry(row_key).or_default().push(row);
    }
    groups.into_values().filter(|g| g.len() > 1).collect()
}

/// A single dataset-level issue when any identical-row group has more than
/// one member.
pub(crate) fn detect_duplicates(dataset: &Dataset, key: Option<&[String]>) -> Vec<Issue> {
    let total_rows = dataset.num_rows();
    if total_rows == 0 {
        return Vec::new();
    }
    let groups = duplicate_groups(dataset, key);
    let duplicate_row_count: usize = groups.iter().map(|g| g.len() - 1).sum();
    if duplicate_row_count == 0 {
        return Vec::new();
    }
    let group_count = groups.len();
    let severity = if duplicate_row_count as f64 > total_rows as f64 * 0.10 {
        Severity::High
    } else {
        Severity::Medium
    };
    let description =
        format!("Found {duplicate_row_count} duplicate row(s) across {group_count} group(s)");
    vec![Issue::new(
        IssueKind::Duplicates,
        None,
        severity,
        description,
        IssueMetrics::Duplicates {
            duplicate_row_count,
            group_count,
            total_rows,
        },
    )]
}

/// One issue per numeric column with values outside its IQR fences.
///
/// Columns with fewer than four usable values or zero IQR are skipped:
/// insufficient signal, not an error. The fences land in the issue metrics
/// so the clip fixer reuses exactly the bounds that flagged the values.
pub(crate) fn detect_outliers(dataset: &Dataset) -> Vec<Issue> {
    let mut issues = Vec::new();
    for column in dataset.columns() {
        if column.data_type() != DataType::Numeric {
            continue;
        }
        let mut values: Vec<f64> = column
            .values()
            .iter()
            .filter(|v| !v.is_missing())
            .filter_map(Value::as_number)
            .filter(|v| v.is_finite())
            .collect();
        if values.len() < MIN_OUTLIER_SAMPLES {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let (Some(q1), Some(q3)) = (
            stats::quantile(&values, 0.25),
            stats::quantile(&values, 0.75),
        ) else {
            continue;
        };
        if q3 - q1 <= 0.0 {
            continue;
        }
        let (lower_bound, upper_bound) = stats::iqr_bounds(q1, q3);
        let outlier_count = values
            .iter()
            .filter(|&&v| v < lower_bound || v > upper_bound)
            .count();
        if outlier_count == 0 {
            continue;
        }
        let non_null_count = values.len();
        let percent = outlier_count as f64 / non_null_count as f64 * 100.0;
        let severity = if percent >= 5.0 {
            Severity::Medium
        } else {
            Severity::Low
        };
        let description = format!(
            "Found {outlier_count} outlier(s) in column '{}' outside [{lower_bound:.2}, {upper_bound:.2}]",
            column.name()
        );
        issues.push(Issue::new(
            IssueKind::Outliers,
            Some(column.name().to_string()),
            severity,
            description,
            IssueMetrics::Outliers {
                outlier_count,
                non_null_count,
                outlier_percent: stats::round1(percent),
                lower_bound,
                upper_bound,
            },
        ));
    }
    issues
}
