//! Remediation.
//!
//! The [`Remediator`] takes exclusive ownership of a working copy of the
//! dataset, applies one fixer per issue in the deterministic detection order
//! (kind, then column position), and returns the mutated dataset together
//! with the ordered [`Fix`] list. A fixer that cannot act yields
//! `Fix { success: false }` and remediation continues; partial failure is
//! the expected case, never an abort.
//!
//! # Example
//!
//! ```
//! use limpiar::{Column, DataType, Dataset, Remediator, Scanner, Value};
//!
//! let age = Column::new(
//!     "age",
//!     DataType::Numeric,
//!     vec![Value::Number(1.0), Value::Null, Value::Number(3.0)],
//! );
//! let dataset = Dataset::new("t", vec![age]).unwrap();
//! let report = Scanner::new().scan(&dataset).unwrap();
//!
//! let (fixed, fixes) = Remediator::new().remediate(dataset.clone(), &report.issues);
//! assert!(fixes.iter().all(|f| f.success));
//! assert_eq!(fixed.column("age").unwrap().missing_count(), 0);
//! ```

mod fixers;

#[cfg(test)]
mod tests;

pub use fixers::{Fix, FixMethod};

use crate::{
    dataset::Dataset,
    issue::{Issue, IssueKind},
};

/// How outlier issues are remediated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlierPolicy {
    /// Cap values to the detection-time fences, preserving row count.
    #[default]
    Clip,
    /// Drop rows holding out-of-fence values.
    Remove,
}

/// Remediation configuration.
#[derive(Debug, Clone, Default)]
pub struct RemedyPolicy {
    /// Outlier strategy; the non-destructive clip is the default.
    pub outliers: OutlierPolicy,
    /// Columns defining duplicate-row identity; must match the scanner's
    /// configuration so removal agrees with detection.
    pub duplicate_key: Option<Vec<String>>,
}

/// Orders and applies fixers over a working copy of the dataset.
#[derive(Debug, Clone, Default)]
pub struct Remediator {
    policy: RemedyPolicy,
}

impl Remediator {
    /// Creates a remediator with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RemedyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the outlier strategy.
    #[must_use]
    pub fn with_outlier_policy(mut self, policy: OutlierPolicy) -> Self {
        self.policy.outliers = policy;
        self
    }

    /// Restrict duplicate-row identity to the given columns.
    #[must_use]
    pub fn with_duplicate_key(mut self, columns: Vec<String>) -> Self {
        self.policy.duplicate_key = Some(columns);
        self
    }

    /// Returns the configured policy.
    pub fn policy(&self) -> &RemedyPolicy {
        &self.policy
    }

    /// Applies one fix per issue and returns the mutated working copy plus
    /// the ordered fix list.
    ///
    /// Ownership of `dataset` transfers here for the duration of the pass;
    /// the caller keeps its own copy if it needs the original.
    pub fn remediate(&self, dataset: Dataset, issues: &[Issue]) -> (Dataset, Vec<Fix>) {
        let mut working = dataset;

        // Issues arrive in detection order from the scanner; sort anyway so
        // a caller-assembled list behaves the same.
        let mut ordered: Vec<(usize, usize, &Issue)> = issues
            .iter()
            .map(|issue| {
                let position = issue
                    .column
                    .as_deref()
                    .and_then(|c| working.column_position(c))
                    .unwrap_or(usize::MAX);
                (issue.kind.rank(), position, issue)
            })
            .collect();
        ordered.sort_by_key(|(rank, position, _)| (*rank, *position));

        let mut fixes = Vec::with_capacity(ordered.len());
        for (_, _, issue) in ordered {
            let fix = match issue.kind {
                IssueKind::MissingValues => fixers::fix_missing(&mut working, issue),
                IssueKind::TypeInconsistency => fixers::fix_type(&mut working, issue),
                IssueKind::Duplicates => fixers::fix_duplicates(
                    &mut working,
                    issue,
                    self.policy.duplicate_key.as_deref(),
                ),
                IssueKind::Outliers => {
                    fixers::fix_outliers(&mut working, issue, self.policy.outliers)
                }
            };
            fixes.push(fix);
        }
        (working, fixes)
    }
}
