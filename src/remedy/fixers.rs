//! Remediation strategies, one per defect class.
//!
//! Fixers mutate the coordinator's working copy in place and report what
//! they did as [`Fix`] records. A fixer that cannot act records
//! `success == false` and leaves the offending cells unchanged so the
//! residual defect resurfaces in the validation re-scan; it never aborts the
//! remediation pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{DataType, Dataset, Value},
    issue::{Issue, IssueKind, IssueMetrics},
    scan::duplicate_groups,
    stats,
};

use super::OutlierPolicy;

/// Remediation strategy identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixMethod {
    /// Fill missing numeric cells with the column median.
    MedianImputation,
    /// Fill missing cells with the most frequent value.
    ModeImputation,
    /// Coerce cells to numeric; unparseable cells become null.
    NumericCoercion,
    /// Coerce cells to timestamps; unparseable cells become null.
    DateTimeCoercion,
    /// Drop all but the first row of each identical-row group.
    RemoveDuplicates,
    /// Clip values to the detection-time IQR fences.
    ClipOutliers,
    /// Drop rows holding values outside the detection-time fences.
    RemoveOutliers,
}

impl FixMethod {
    /// Stable identifier for reporting.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MedianImputation => "median_imputation",
            Self::ModeImputation => "mode_imputation",
            Self::NumericCoercion => "numeric_coercion",
            Self::DateTimeCoercion => "datetime_coercion",
            Self::RemoveDuplicates => "remove_duplicates",
            Self::ClipOutliers => "clip_outliers",
            Self::RemoveOutliers => "remove_outliers",
        }
    }
}

impl std::fmt::Display for FixMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A remediation action applied in response to one issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Defect class this fix responds to.
    pub kind: IssueKind,
    /// Strategy applied (or attempted).
    pub method: FixMethod,
    /// Affected column; `None` for row-level fixes.
    pub column: Option<String>,
    /// What happened, or why nothing could.
    pub description: String,
    /// Whether the strategy was applied.
    pub success: bool,
    /// Cells or rows changed.
    pub rows_affected: usize,
}

impl Fix {
    fn applied(
        kind: IssueKind,
        method: FixMethod,
        column: Option<String>,
        description: String,
        rows_affected: usize,
    ) -> Self {
        Self {
            kind,
            method,
            column,
            description,
            success: true,
            rows_affected,
        }
    }

    fn failed(
        kind: IssueKind,
        method: FixMethod,
        column: Option<String>,
        description: String,
    ) -> Self {
        Self {
            kind,
            method,
            column,
            description,
            success: false,
            rows_affected: 0,
        }
    }
}

fn missing_column_fix(kind: IssueKind, method: FixMethod, issue: &Issue) -> Fix {
    let name = issue.column.clone().unwrap_or_default();
    Fix::failed(
        kind,
        method,
        issue.column.clone(),
        format!("Column '{name}' is no longer present"),
    )
}

/// Impute missing cells: median for numeric columns, first-seen mode for
/// everything else.
pub(crate) fn fix_missing(dataset: &mut Dataset, issue: &Issue) -> Fix {
    let kind = IssueKind::MissingValues;
    let Some(name) = issue.column.clone() else {
        return Fix::failed(
            kind,
            FixMethod::ModeImputation,
            None,
            "Missing-value issue carries no column".to_string(),
        );
    };
    let Some(column) = dataset.column_mut(&name) else {
        return missing_column_fix(kind, FixMethod::ModeImputation, issue);
    };

    if column.data_type() == DataType::Numeric {
        let reference: Vec<f64> = column
            .values()
            .iter()
            .filter(|v| !v.is_missing())
            .filter_map(Value::as_number)
            .filter(|v| v.is_finite())
            .collect();
        let Some(median) = stats::median(&reference) else {
            return Fix::failed(
                kind,
                FixMethod::MedianImputation,
                Some(name.clone()),
                format!("Column '{name}' has no non-missing reference value to impute from"),
            );
        };
        let mut filled = 0;
        for value in column.values_mut() {
            if value.is_missing() {
                *value = Value::Number(median);
                filled += 1;
            }
        }
        return Fix::applied(
            kind,
            FixMethod::MedianImputation,
            Some(name.clone()),
            format!("Filled {filled} missing value(s) in '{name}' with median ({median:.2})"),
            filled,
        );
    }

    // Mode imputation for text, boolean, and datetime columns. Counting is
    // over canonical forms; the first occurrence wins ties.
    let mut first_by_key: IndexMap<String, Value> = IndexMap::new();
    let mut keys = Vec::new();
    for value in column.values() {
        if value.is_missing() {
            continue;
        }
        let key = value.canonical();
        first_by_key.entry(key.clone()).or_insert_with(|| value.clone());
        keys.push(key);
    }
    let Some(mode_key) = stats::mode(keys) else {
        return Fix::failed(
            kind,
            FixMethod::ModeImputation,
            Some(name.clone()),
            format!("Column '{name}' has no non-missing reference value to impute from"),
        );
    };
    let Some(fill) = first_by_key.get(&mode_key).cloned() else {
        return Fix::failed(
            kind,
            FixMethod::ModeImputation,
            Some(name.clone()),
            format!("Column '{name}' has no non-missing reference value to impute from"),
        );
    };
    let mut filled = 0;
    for value in column.values_mut() {
        if value.is_missing() {
            *value = fill.clone();
            filled += 1;
        }
    }
    Fix::applied(
        kind,
        FixMethod::ModeImputation,
        Some(name.clone()),
        format!("Filled {filled} missing value(s) in '{name}' with mode ('{mode_key}')"),
        filled,
    )
}

/// Coerce cells to the column's declared type; cells that cannot be coerced
/// become null.
///
/// Turning a type defect into a missing-value defect is expected: the
/// validation re-scan surfaces the new nulls instead of this fixer silently
/// swallowing them.
pub(crate) fn fix_type(dataset: &mut Dataset, issue: &Issue) -> Fix {
    let kind = IssueKind::TypeInconsistency;
    let Some(name) = issue.column.clone() else {
        return Fix::failed(
            kind,
            FixMethod::NumericCoercion,
            None,
            "Type-inconsistency issue carries no column".to_string(),
        );
    };
    let Some(column) = dataset.column_mut(&name) else {
        return missing_column_fix(kind, FixMethod::NumericCoercion, issue);
    };

    let (method, target) = match column.data_type() {
        DataType::Numeric => (FixMethod::NumericCoercion, DataType::Numeric),
        DataType::DateTime => (FixMethod::DateTimeCoercion, DataType::DateTime),
        other => {
            return Fix::failed(
                kind,
                FixMethod::NumericCoercion,
                Some(name.clone()),
                format!("Column '{name}' is declared {other}, not a coercion target"),
            );
        }
    };

    let mut coerced = 0;
    let mut nulled = 0;
    for value in column.values_mut() {
        if value.is_missing() {
            continue;
        }
        match target {
            DataType::Numeric => {
                if matches!(value, Value::Number(_)) {
                    continue;
                }
                match value.as_number() {
                    Some(n) => {
                        *value = Value::Number(n);
                        coerced += 1;
                    }
                    None => {
                        *value = Value::Null;
                        nulled += 1;
                    }
                }
            }
            _ => {
                if matches!(value, Value::Timestamp(_)) {
                    continue;
                }
                match value.as_timestamp() {
                    Some(t) => {
                        *value = Value::Timestamp(t);
                        coerced += 1;
                    }
                    None => {
                        *value = Value::Null;
                        nulled += 1;
                    }
                }
            }
        }
    }

    Fix::applied(
        kind,
        method,
        Some(name.clone()),
        format!(
            "Coerced {coerced} value(s) in '{name}' to {target}; {nulled} unparseable value(s) set to null"
        ),
        coerced + nulled,
    )
}

/// Drop all but the first row of each identical-row group, preserving row
/// order.
///
/// Groups are recomputed at fix time: earlier fixes may have changed cell
/// contents since detection.
pub(crate) fn fix_duplicates(
    dataset: &mut Dataset,
    _issue: &Issue,
    key: Option<&[String]>,
) -> Fix {
    let groups = duplicate_groups(dataset, key);
    let mut keep = vec![true; dataset.num_rows()];
    let mut removed = 0;
    for group in &groups {
        for &row in &group[1..] {
            if let Some(slot) = keep.get_mut(row) {
                *slot = false;
                removed += 1;
            }
        }
    }
    if removed > 0 {
        dataset.retain_rows(&keep);
    }
    Fix::applied(
        IssueKind::Duplicates,
        FixMethod::RemoveDuplicates,
        None,
        format!("Removed {removed} duplicate row(s), keeping first occurrences"),
        removed,
    )
}

/// Cap or remove values outside the fences carried in the issue metrics.
///
/// Clipping reuses the detection-time bounds rather than recomputing them,
/// so exactly the flagged values are affected.
pub(crate) fn fix_outliers(
    dataset: &mut Dataset,
    issue: &Issue,
    policy: OutlierPolicy,
) -> Fix {
    let kind = IssueKind::Outliers;
    let Some(name) = issue.column.clone() else {
        return Fix::failed(
            kind,
            FixMethod::ClipOutliers,
            None,
            "Outlier issue carries no column".to_string(),
        );
    };
    let IssueMetrics::Outliers {
        lower_bound,
        upper_bound,
        ..
    } = issue.metrics
    else {
        return Fix::failed(
            kind,
            FixMethod::ClipOutliers,
            Some(name.clone()),
            format!("Outlier issue for '{name}' carries no detection bounds"),
        );
    };

    match policy {
        OutlierPolicy::Clip => {
            let Some(column) = dataset.column_mut(&name) else {
                return missing_column_fix(kind, FixMethod::ClipOutliers, issue);
            };
            let mut clipped = 0;
            for value in column.values_mut() {
                if value.is_missing() {
                    continue;
                }
                let Some(n) = value.as_number() else {
                    continue;
                };
                if n < lower_bound {
                    *value = Value::Number(lower_bound);
                    clipped += 1;
                } else if n > upper_bound {
                    *value = Value::Number(upper_bound);
                    clipped += 1;
                }
            }
            Fix::applied(
                kind,
                FixMethod::ClipOutliers,
                Some(name.clone()),
                format!(
                    "Clipped {clipped} value(s) in '{name}' to [{lower_bound:.2}, {upper_bound:.2}]"
                ),
                clipped,
            )
        }
        OutlierPolicy::Remove => {
            let Some(column) = dataset.column(&name) else {
                return missing_column_fix(kind, FixMethod::RemoveOutliers, issue);
            };
            let keep: Vec<bool> = column
                .values()
                .iter()
                .map(|value| {
                    if value.is_missing() {
                        return true;
                    }
                    value
                        .as_number()
                        .map_or(true, |n| n >= lower_bound && n <= upper_bound)
                })
                .collect();
            let removed = keep.iter().filter(|k| !**k).count();
            if removed > 0 {
                dataset.retain_rows(&keep);
            }
            Fix::applied(
                kind,
                FixMethod::RemoveOutliers,
                Some(name.clone()),
                format!("Removed {removed} row(s) with outlier values in '{name}'"),
                removed,
            )
        }
    }
}
