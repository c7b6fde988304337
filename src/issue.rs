//! Issue records produced by detection.
//!
//! Issues are immutable value records created fresh on every scan; there is
//! no identity carried across scans. The validator matches issues between
//! scans by their `(kind, column)` key.

use serde::{Deserialize, Serialize};

/// Severity of a detected issue, ordered `Low < Medium < High < Critical`.
///
/// Severity drives sorting, display, and the scorer's penalty weight. It
/// never gates whether a fixer runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// Minor issue, informational.
    Low,
    /// Standard issue worth addressing.
    Medium,
    /// Major issue requiring attention.
    High,
    /// Data integrity failure.
    Critical,
}

impl Severity {
    /// Severity from an affected percentage, the shared threshold ladder for
    /// missing values and type inconsistencies.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 50.0 {
            Self::Critical
        } else if percent >= 20.0 {
            Self::High
        } else if percent >= 5.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Base penalty weight used by the quality scorer.
    #[must_use]
    pub fn base_weight(&self) -> f64 {
        match self {
            Self::Low => 2.0,
            Self::Medium => 5.0,
            Self::High => 10.0,
            Self::Critical => 20.0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// The closed set of defect classes, in fixed detection order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum IssueKind {
    /// Null or blank cells.
    MissingValues,
    /// Cells that fail to parse under the column's declared type.
    TypeInconsistency,
    /// Identical rows appearing more than once.
    Duplicates,
    /// Values outside the IQR fences of their column.
    Outliers,
}

impl IssueKind {
    /// All kinds in detection order.
    pub const ALL: [Self; 4] = [
        Self::MissingValues,
        Self::TypeInconsistency,
        Self::Duplicates,
        Self::Outliers,
    ];

    /// Position in the fixed detection order.
    #[must_use]
    pub fn rank(&self) -> usize {
        match self {
            Self::MissingValues => 0,
            Self::TypeInconsistency => 1,
            Self::Duplicates => 2,
            Self::Outliers => 3,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValues => write!(f, "missing_values"),
            Self::TypeInconsistency => write!(f, "type_inconsistency"),
            Self::Duplicates => write!(f, "duplicates"),
            Self::Outliers => write!(f, "outliers"),
        }
    }
}

/// Detector-specific numeric payload, one variant per defect class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IssueMetrics {
    /// Missing-value counts for one column.
    Missing {
        /// Null or blank cells in the column.
        missing_count: usize,
        /// Rows in the dataset at detection time.
        total_rows: usize,
        /// `missing_count / total_rows` as a percentage, 1 decimal.
        missing_percent: f64,
    },
    /// Type-inconsistency counts for one column.
    TypeMismatch {
        /// Non-missing cells failing to parse under the declared type.
        invalid_count: usize,
        /// Non-missing cells in the column.
        non_null_count: usize,
        /// `invalid_count / non_null_count` as a percentage, 1 decimal.
        invalid_percent: f64,
        /// Up to five offending values, canonical form.
        examples: Vec<String>,
    },
    /// Duplicate-row counts for the whole dataset.
    Duplicates {
        /// Rows beyond the first in each identical-row group.
        duplicate_row_count: usize,
        /// Number of identical-row groups with more than one row.
        group_count: usize,
        /// Rows in the dataset at detection time.
        total_rows: usize,
    },
    /// IQR outlier counts and fences for one column.
    Outliers {
        /// Values outside the fences.
        outlier_count: usize,
        /// Non-missing numeric values considered.
        non_null_count: usize,
        /// `outlier_count / non_null_count` as a percentage, 1 decimal.
        outlier_percent: f64,
        /// Lower fence computed at detection time.
        lower_bound: f64,
        /// Upper fence computed at detection time.
        upper_bound: f64,
    },
}

/// A detected data-quality defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Defect class.
    pub kind: IssueKind,
    /// Affected column; `None` for row-level defects (duplicates).
    pub column: Option<String>,
    /// Severity derived from the detection parameters.
    pub severity: Severity,
    /// Deterministic human-readable description.
    pub description: String,
    /// Detector-specific payload.
    pub metrics: IssueMetrics,
    /// Opaque annotation attached by an external collaborator, never
    /// produced or interpreted by the pipeline.
    pub insight: Option<String>,
}

impl Issue {
    /// Creates an issue with no annotation.
    #[must_use]
    pub fn new(
        kind: IssueKind,
        column: Option<String>,
        severity: Severity,
        description: String,
        metrics: IssueMetrics,
    ) -> Self {
        Self {
            kind,
            column,
            severity,
            description,
            metrics,
            insight: None,
        }
    }

    /// Resolution identity: an issue counts as resolved only when no issue
    /// with the same key remains after remediation.
    #[must_use]
    pub fn key(&self) -> (IssueKind, Option<&str>) {
        (self.kind, self.column.as_deref())
    }

    /// Fraction of the dataset affected by this issue, in `[0, 1]`.
    ///
    /// Computed from the raw counts rather than the rounded percent so the
    /// scorer sees full precision.
    #[must_use]
    pub fn affected_fraction(&self) -> f64 {
        let ratio = |part: usize, whole: usize| {
            if whole == 0 {
                0.0
            } else {
                part as f64 / whole as f64
            }
        };
        match &self.metrics {
            IssueMetrics::Missing {
                missing_count,
                total_rows,
                ..
            } => ratio(*missing_count, *total_rows),
            IssueMetrics::TypeMismatch {
                invalid_count,
                non_null_count,
                ..
            } => ratio(*invalid_count, *non_null_count),
            IssueMetrics::Duplicates {
                duplicate_row_count,
                total_rows,
                ..
            } => ratio(*duplicate_row_count, *total_rows),
            IssueMetrics::Outliers {
                outlier_count,
                non_null_count,
                ..
            } => ratio(*outlier_count, *non_null_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_from_percent() {
        assert_eq!(Severity::from_percent(75.0), Severity::Critical);
        assert_eq!(Severity::from_percent(50.0), Severity::Critical);
        assert_eq!(Severity::from_percent(49.9), Severity::High);
        assert_eq!(Severity::from_percent(20.0), Severity::High);
        assert_eq!(Severity::from_percent(5.0), Severity::Medium);
        assert_eq!(Severity::from_percent(4.9), Severity::Low);
        assert_eq!(Severity::from_percent(0.1), Severity::Low);
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Low.base_weight(), 2.0);
        assert_eq!(Severity::Medium.base_weight(), 5.0);
        assert_eq!(Severity::High.base_weight(), 10.0);
        assert_eq!(Severity::Critical.base_weight(), 20.0);
    }

    #[test]
    fn test_kind_order() {
        let ranks: Vec<usize> = IssueKind::ALL.iter().map(IssueKind::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert_eq!(IssueKind::MissingValues.to_string(), "missing_values");
        assert_eq!(IssueKind::Outliers.to_string(), "outliers");
    }

    #[test]
    fn test_affected_fraction() {
        let issue = Issue::new(
            IssueKind::MissingValues,
            Some("age".to_string()),
            Severity::High,
            String::new(),
            IssueMetrics::Missing {
                missing_count: 2,
                total_rows: 5,
                missing_percent: 40.0,
            },
        );
        assert!((issue.affected_fraction() - 0.4).abs() < 1e-9);

        let dup = Issue::new(
            IssueKind::Duplicates,
            None,
            Severity::Medium,
            String::new(),
            IssueMetrics::Duplicates {
                duplicate_row_count: 2,
                group_count: 1,
                total_rows: 5,
            },
        );
        assert!((dup.affected_fraction() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_affected_fraction_zero_denominator() {
        let issue = Issue::new(
            IssueKind::MissingValues,
            Some("x".to_string()),
            Severity::Low,
            String::new(),
            IssueMetrics::Missing {
                missing_count: 0,
                total_rows: 0,
                missing_percent: 0.0,
            },
        );
        assert_eq!(issue.affected_fraction(), 0.0);
    }

    #[test]
    fn test_issue_key() {
        let issue = Issue::new(
            IssueKind::Outliers,
            Some("salary".to_string()),
            Severity::Medium,
            String::new(),
            IssueMetrics::Outliers {
                outlier_count: 1,
                non_null_count: 6,
                outlier_percent: 16.7,
                lower_bound: 0.875,
                upper_bound: 3.875,
            },
        );
        assert_eq!(issue.key(), (IssueKind::Outliers, Some("salary")));
    }
}
