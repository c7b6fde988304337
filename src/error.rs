//! Error types for limpiar.

use std::path::PathBuf;

/// Result type alias for limpiar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in limpiar operations.
///
/// Only structural violations of the dataset model are fatal. Detected data
/// defects are reported as [`crate::Issue`] values and failed remediations as
/// [`crate::Fix`] records with `success == false`; neither ever surfaces here.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error during ingestion.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error during file operations.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Column lengths disagree; the dataset is malformed and cannot be
    /// scanned.
    #[error("Column '{column}' has {actual} values but the dataset has {expected} rows")]
    LengthMismatch {
        /// The offending column.
        column: String,
        /// Row count established by the first column.
        expected: usize,
        /// Actual value count in the offending column.
        actual: usize,
    },

    /// Two columns share a name.
    #[error("Duplicate column name '{name}'")]
    DuplicateColumn {
        /// The repeated column name.
        name: String,
    },

    /// Dataset has no columns.
    #[error("Dataset has no columns")]
    EmptySchema,

    /// Empty dataset error (ingestion produced no rows).
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Column not found in the dataset.
    #[error("Column '{name}' not found in dataset")]
    ColumnNotFound {
        /// The name of the missing column.
        name: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Unsupported file format.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The unsupported format name or extension.
        format: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}
