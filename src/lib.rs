//! limpiar - Data Quality Diagnosis and Repair in Pure Rust
//!
//! Diagnoses structural quality defects in tabular datasets (missing values,
//! type inconsistencies, duplicate rows, statistical outliers), repairs them,
//! and quantifies the improvement with a reproducible 0-100 quality score.
//!
//! # Design Principles
//!
//! 1. **Library-first** - a pure in-memory transformation pipeline; no CLI,
//!    network, or file-format surface of its own
//! 2. **Detection never fails** - defects become [`Issue`] records, failed
//!    repairs become [`Fix`] records; only a malformed dataset is an error
//! 3. **Deterministic** - fixed detector order, documented statistical
//!    conventions, idempotent re-scans
//!
//! # Quick Start
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
//! println!(
//!     "quality {} -> {}",
//!     outcome.validation.before_quality_score,
//!     outcome.validation.after_quality_score
//! );
//! assert!(outcome.validation.is_clean());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::redundant_clone,
        clippy::similar_names
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

pub mod dataset;
pub mod error;
pub mod ingest;
pub mod insight;
pub mod issue;
pub mod pipeline;
pub mod remedy;
pub mod scan;
pub mod score;
pub mod stats;
pub mod validate;

// Re-exports for convenience
pub use dataset::{Column, DataType, Dataset, Value};
pub use error::{Error, Result};
pub use ingest::{CsvOptions, JsonOptions};
pub use insight::{annotate_issues, InsightAnnotator, NoAnnotator};
pub use issue::{Issue, IssueKind, IssueMetrics, Severity};
pub use pipeline::{PipelineReport, PipelineSummary, QualityPipeline};
pub use remedy::{Fix, FixMethod, OutlierPolicy, RemedyPolicy, Remediator};
pub use scan::{ScanOptions, ScanReport, Scanner};
pub use score::quality_score;
pub use validate::{ValidationResult, Validator};
