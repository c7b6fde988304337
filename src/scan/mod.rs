//! Dataset scanning.
//!
//! The [`Scanner`] runs the four issue detectors over a dataset in a fixed
//! order (missing values, type inconsistencies, duplicates, outliers;
//! columns in dataset order within each) and assembles a [`ScanReport`] with
//! the quality score. Scanning is read-only and idempotent: re-scanning an
//! unchanged dataset yields identical issues and score.
//!
//! The detectors are mutually independent, so the scanner can optionally run
//! them on separate threads; results are reassembled in the fixed order, so
//! parallelism never changes the output.
//!
//! # Example
//!
//! ```
//! use limpiar::{Column, DataType, Dataset, Scanner, Value};
//!
//! let age = Column::new(
//!     "age",
//!     DataType::Numeric,
//!     vec![Value::Number(34.0), Value::Null, Value::Number(29.0)],
//! );
//! let dataset = Dataset::new("patients", vec![age]).unwrap();
//!
//! let report = Scanner::new().scan(&dataset).unwrap();
//! assert_eq!(report.issues.len(), 1);
//! assert!(report.quality_score < 100.0);
//! ```

mod detectors;


use serde::{Deserialize, Serialize};

pub(crate) use detectors::duplicate_groups;

use crate::{
    dataset::Dataset,
    error::{Error, Result},
    issue::{Issue, Severity},
    score::quality_score,
};

/// Scanner configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Columns defining duplicate-row identity; all columns when `None`.
    pub duplicate_key: Option<Vec<String>>,
    /// Run the four detectors on separate threads.
    pub parallel: bool,
}

/// Runs the full detector set over a dataset.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    /// Creates a scanner with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict duplicate-row identity to the given columns.
    #[must_use]
    pub fn with_duplicate_key(mut self, columns: Vec<String>) -> Self {
        self.options.duplicate_key = Some(columns);
        self
    }

    /// Enable or disable parallel detector execution.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.options.parallel = enabled;
        self
    }

    /// Replace the full option set.
    #[must_use]
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the configured options.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans the dataset and returns the ordered issue list plus score.
    ///
    /// # Errors
    ///
    /// Refuses to run on a structurally malformed dataset (column length
    /// mismatch, no columns) or when a configured duplicate key names an
    /// unknown column. Detection itself never fails.
    pub fn scan(&self, dataset: &Dataset) -> Result<ScanReport> {
        dataset.check_integrity()?;
        if let Some(key) = &self.options.duplicate_key {
            if key.is_empty() {
                return Err(Error::invalid_config(
                    "duplicate key must name at least one column",
                ));
            }
            for name in key {
                if dataset.column(name).is_none() {
                    return Err(Error::column_not_found(name));
                }
            }
        }

        let key = self.options.duplicate_key.as_deref();
        let issues = if self.options.parallel {
            detect_parallel(dataset, key)
        } else {
            detect_sequential(dataset, key)
        };
        let quality_score = quality_score(&issues, dataset.num_rows(), dataset.num_columns());

        Ok(ScanReport {
            dataset_name: dataset.name().to_string(),
            row_count: dataset.num_rows(),
            column_count: dataset.num_columns(),
            issues,
            quality_score,
        })
    }
}

fn detect_sequential(dataset: &Dataset, key: Option<&[String]>) -> Vec<Issue> {
    let mut issues = detectors::detect_missing(dataset);
    issues.extend(detectors::detect_type_inconsistencies(dataset));
    issues.extend(detectors::detect_duplicates(dataset, key));
    issues.extend(detectors::detect_outliers(dataset));
    issues
}

fn detect_parallel(dataset: &Dataset, key: Option<&[String]>) -> Vec<Issue> {
    std::thread::scope(|scope| {
        let missing = scope.spawn(|| detectors::detect_missing(dataset));
        let types = scope.spawn(|| detectors::detect_type_inconsistencies(dataset));
        let duplicates = scope.spawn(|| detectors::detect_duplicates(dataset, key));
        let outliers = scope.spawn(|| detectors::detect_outliers(dataset));

        // Reassemble in the fixed detection order regardless of completion
        // order.
        let mut issues = join_detector(missing);
        issues.extend(join_detector(types));
        issues.extend(join_detector(duplicates));
        issues.extend(join_detector(outliers));
        issues
    })
}

fn join_detector(handle: std::thread::ScopedJoinHandle<'_, Vec<Issue>>) -> Vec<Issue> {
    match handle.join() {
        Ok(issues) => issues,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Result of one scan: the ordered issue list and the quality score for the
/// dataset shape at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Name of the scanned dataset.
    pub dataset_name: String,
    /// Rows at scan time.
    pub row_count: usize,
    /// Columns at scan time.
    pub column_count: usize,
    /// Issues in deterministic detection order.
    pub issues: Vec<Issue>,
    /// Quality score in `[0, 100]`.
    pub quality_score: f64,
}

impl ScanReport {
    /// Whether any issues were found.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issues affecting a specific column.
    pub fn column_issues(&self, column: &str) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.column.as_deref() == Some(column))
            .collect()
    }

    /// Highest severity among the issues, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}
