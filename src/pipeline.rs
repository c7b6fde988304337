//! End-to-end pipeline.
//!
//! [`QualityPipeline`] wires the stages together in their mandatory order:
//! scan, then remediate on a working copy, then validate against the fixed
//! dataset. Each stage consumes the previous stage's output, so the sequence
//! is strictly serial by contract even when the scanner itself runs its
//! detectors in parallel.
//!
//! # Example
//!
//! ```
//! use limpiar::{Column, DataType, Dataset, QualityPipeline, Value};
//!
//! let age = Column::new(
//!     "age",
//!     DataType::Numeric,
//!     vec![
//!         Value::Number(30.0),
//!         Value::Null,
//!         Value::Number(29.0),
//!         Value::Number(31.0),
//!         Value::Number(30.0),
//!     ],
//! );
//! let dataset = Dataset::new("patients", vec![age]).unwrap();
//!
//! let outcome = QualityPipeline::new().run(&dataset).unwrap();
//! assert!(outcome.validation.is_clean());
//! assert!(outcome.validation.improvement > 0.0);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    error::Result,
    insight::{annotate_issues, InsightAnnotator},
    remedy::{Fix, OutlierPolicy, RemedyPolicy, Remediator},
    scan::{ScanOptions, ScanReport, Scanner},
    validate::{ValidationResult, Validator},
};

/// Runs scan, remediation, and validation as one library call.
#[derive(Debug, Clone, Default)]
pub struct QualityPipeline {
    scanner: Scanner,
    remediator: Remediator,
}

impl QualityPipeline {
    /// Creates a pipeline with default scanning and remediation settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scanner options. The validator re-scan uses the same
    /// options automatically.
    #[must_use]
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scanner = Scanner::new().with_options(options);
        self
    }

    /// Replace the remediation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RemedyPolicy) -> Self {
        self.remediator = Remediator::new().with_policy(policy);
        self
    }

    /// Restrict duplicate-row identity to the given columns, for both
    /// detection and removal.
    #[must_use]
    pub fn with_duplicate_key(mut self, columns: Vec<String>) -> Self {
        self.scanner = self.scanner.with_duplicate_key(columns.clone());
        self.remediator = self.remediator.with_duplicate_key(columns);
        self
    }

    /// Run the four detectors on separate threads.
    #[must_use]
    pub fn with_parallel_scan(mut self, enabled: bool) -> Self {
        self.scanner = self.scanner.with_parallel(enabled);
        self
    }

    /// Set the outlier remediation strategy.
    #[must_use]
    pub fn with_outlier_policy(mut self, policy: OutlierPolicy) -> Self {
        self.remediator = self.remediator.with_outlier_policy(policy);
        self
    }

    /// Diagnose, remediate, and validate the dataset.
    ///
    /// The input is never mutated; remediation works on a clone whose
    /// ownership transfers to the coordinator for the duration of the pass.
    ///
    /// # Errors
    ///
    /// Fails only on a structurally malformed dataset or invalid
    /// configuration; see [`Scanner::scan`].
    pub fn run(&self, dataset: &Dataset) -> Result<PipelineReport> {
        self.execute(dataset, None)
    }

    /// Like [`QualityPipeline::run`], attaching annotations to the detected
    /// issues before remediation.
    ///
    /// # Errors
    ///
    /// Same conditions as [`QualityPipeline::run`]; annotation itself cannot
    /// fail the pipeline.
    pub fn run_with_annotator(
        &self,
        dataset: &Dataset,
        annotator: &dyn InsightAnnotator,
    ) -> Result<PipelineReport> {
        self.execute(dataset, Some(annotator))
    }

    fn execute(
        &self,
        dataset: &Dataset,
        annotator: Option<&dyn InsightAnnotator>,
    ) -> Result<PipelineReport> {
        let mut report = self.scanner.scan(dataset)?;
        if let Some(annotator) = annotator {
            annotate_issues(&mut report.issues, annotator);
        }

        let (cleaned, fixes) = self.remediator.remediate(dataset.clone(), &report.issues);
        let validation =
            Validator::with_scanner(self.scanner.clone()).validate(&report, &cleaned)?;

        Ok(PipelineReport {
            report,
            fixes,
            validation,
            cleaned,
        })
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// The initial scan: ordered issues and the before score.
    pub report: ScanReport,
    /// Fixes in application order.
    pub fixes: Vec<Fix>,
    /// Before/after comparison from the validation re-scan.
    pub validation: ValidationResult,
    /// The remediated dataset.
    pub cleaned: Dataset,
}

impl PipelineReport {
    /// Aggregate counts for reporting.
    #[must_use]
    pub fn summary(&self) -> PipelineSummary {
        let mut issues_by_kind: IndexMap<String, usize> = IndexMap::new();
        let mut issues_by_severity: IndexMap<String, usize> = IndexMap::new();
        for issue in &self.report.issues {
            *issues_by_kind.entry(issue.kind.to_string()).or_insert(0) += 1;
            *issues_by_severity
                .entry(issue.severity.to_string())
                .or_insert(0) += 1;
        }
        PipelineSummary {
            dataset_name: self.report.dataset_name.clone(),
            rows_before: self.report.row_count,
            rows_after: self.cleaned.num_rows(),
            total_issues: self.report.issues.len(),
            total_fixes: self.fixes.len(),
            failed_fix_count: self.fixes.iter().filter(|f| !f.success).count(),
            issues_by_kind,
            issues_by_severity,
            before_quality_score: self.validation.before_quality_score,
            after_quality_score: self.validation.after_quality_score,
            improvement: self.validation.improvement,
            resolved_issue_count: self.validation.resolved_issue_count,
            residual_issue_count: self.validation.residual_issues.len(),
        }
    }

    /// Serialize the full report for a downstream consumer.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if any record cannot be encoded.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Aggregate counts over one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Name of the processed dataset.
    pub dataset_name: String,
    /// Rows before remediation.
    pub rows_before: usize,
    /// Rows after remediation.
    pub rows_after: usize,
    /// Issues found by the initial scan.
    pub total_issues: usize,
    /// Fixes attempted.
    pub total_fixes: usize,
    /// Fixes that could not be applied.
    pub failed_fix_count: usize,
    /// Issue counts keyed by kind name.
    pub issues_by_kind: IndexMap<String, usize>,
    /// Issue counts keyed by severity name.
    pub issues_by_severity: IndexMap<String, usize>,
    /// Score before remediation.
    pub before_quality_score: f64,
    /// Score after remediation.
    pub after_quality_score: f64,
    /// Score delta; negative is possible.
    pub improvement: f64,
    /// Original issues fully resolved.
    pub resolved_issue_count: usize,
    /// Issues remaining after remediation.
    pub residual_issue_count: usize,
}
