//! Post-remediation validation.
//!
//! The [`Validator`] re-runs the scanner on the fixed dataset (the only
//! re-scan point in the pipeline) and compares the result against the
//! initial [`ScanReport`]. The before score is carried from that report,
//! never recomputed, so the comparison reflects what the caller actually
//! observed before remediation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    error::Result,
    issue::{Issue, IssueKind},
    scan::{ScanReport, Scanner},
};

/// Outcome of comparing a dataset before and after remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Score from the initial scan.
    pub before_quality_score: f64,
    /// Score from the post-fix re-scan.
    pub after_quality_score: f64,
    /// `after - before`. Negative means a nominally successful fix made
    /// things worse; that is representable, not an error, and policy on it
    /// belongs to the caller.
    pub improvement: f64,
    /// Issues still present after remediation.
    pub residual_issues: Vec<Issue>,
    /// Original issues whose `(kind, column)` key no longer appears.
    ///
    /// An issue counts as resolved only when no issue with its key remains,
    /// not merely when counts dropped.
    pub resolved_issue_count: usize,
    /// Residual issues whose key was absent from the initial scan, e.g.
    /// missing values created by type coercion.
    pub new_issue_count: usize,
}

impl ValidationResult {
    /// Whether the re-scan found nothing at all.
    pub fn is_clean(&self) -> bool {
        self.residual_issues.is_empty()
    }
}

/// Re-scans a fixed dataset and compares it to the initial report.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    scanner: Scanner,
}

impl Validator {
    /// Creates a validator using a default scanner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator re-using an existing scanner configuration.
    ///
    /// The re-scan must run with the same options as the initial scan
    /// (duplicate keys in particular), or residual comparison is
    /// meaningless.
    pub fn with_scanner(scanner: Scanner) -> Self {
        Self { scanner }
    }

    /// Re-scans `fixed` and compares against `before`.
    ///
    /// # Errors
    ///
    /// Fails only if the fixed dataset is structurally malformed; see
    /// [`Scanner::scan`].
    pub fn validate(&self, before: &ScanReport, fixed: &Dataset) -> Result<ValidationResult> {
        let after = self.scanner.scan(fixed)?;

        let residual_keys: HashSet<(IssueKind, Option<&str>)> =
            after.issues.iter().map(Issue::key).collect();
        let original_keys: HashSet<(IssueKind, Option<&str>)> =
            before.issues.iter().map(Issue::key).collect();

        let resolved_issue_count = before
            .issues
            .iter()
            .filter(|issue| !residual_keys.contains(&issue.key()))
            .count();
        let new_issue_count = after
            .issues
            .iter()
            .filter(|issue| !original_keys.contains(&issue.key()))
            .count();

        Ok(ValidationResult {
            before_quality_score: before.quality_score,
            after_quality_score: after.quality_score,
            improvement: after.quality_score - before.quality_score,
            residual_issues: after.issues,
            resolved_issue_count,
            new_issue_count,
        })
    }
}
