//! Dataset types for limpiar.
//!
//! Provides the in-memory columnar [`Dataset`] the pipeline operates on:
//! named, typed [`Column`]s of equal length, with [`Value::Null`] as the
//! distinguished missing marker. A cell's runtime variant may disagree with
//! its column's declared [`DataType`]; that disagreement is what the
//! type-inconsistency detector reports, so construction never coerces.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Floating-point or integer measurements.
    Numeric,
    /// Free text or categorical labels.
    Text,
    /// Points in time, stored as Unix epoch seconds.
    DateTime,
    /// True/false flags.
    Boolean,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Text => write!(f, "text"),
            Self::DateTime => write!(f, "datetime"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// A single cell value.
///
/// Missing data is always the explicit [`Value::Null`] marker, never an
/// absent element; every column holds exactly one `Value` per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value marker.
    Null,
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Unix epoch seconds.
    Timestamp(i64),
    /// Boolean value.
    Bool(bool),
}

/// Datetime formats accepted when interpreting text cells as timestamps.
/// Fixed list; the same formats drive detection and coercion so the two
/// always agree.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a text cell as a timestamp (epoch seconds).
pub(crate) fn parse_datetime(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(text, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Some(dt.and_utc().timestamp());
            }
        }
    }
    None
}

impl Value {
    /// Returns true if this is the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this cell counts as missing: null, or text that is
    /// empty after trimming whitespace.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Interpret the cell as a number, parsing text if necessary.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Interpret the cell as epoch seconds, parsing text if necessary.
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Self::Timestamp(t) => Some(*t),
            Self::Text(s) => parse_datetime(s),
            _ => None,
        }
    }

    /// Whether the cell satisfies the declared type without coercion loss.
    ///
    /// Missing cells vacuously conform; they belong to the missing-value
    /// detector, not the type detector.
    pub fn conforms_to(&self, data_type: DataType) -> bool {
        if self.is_missing() {
            return true;
        }
        match data_type {
            DataType::Numeric => self.as_number().is_some(),
            DataType::DateTime => self.as_timestamp().is_some(),
            DataType::Boolean => matches!(self, Self::Bool(_)),
            DataType::Text => true,
        }
    }

    /// Canonical string form, used for row identity and mode counting.
    pub fn canonical(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Timestamp(t) => chrono::DateTime::from_timestamp(*t, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| t.to_string()),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// A named, typed column of cells.
///
/// Columns are owned exclusively by their [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data_type: DataType,
    values: Vec<Value>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the cells in row order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns mutable access to the cells.
    ///
    /// Pushing or removing values here can break the equal-length invariant;
    /// the scanner re-verifies it and refuses to run on a malformed dataset.
    pub fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the cell at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Count of missing cells.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// An in-memory table of named, typed columns with equal length.
///
/// Column order is insertion order and is significant: detectors emit issues
/// in this order and fixers process columns in it.
///
/// # Example
///
/// ```
/// use limpiar::{Column, DataType, Dataset, Value};
///
/// let age = Column::new(
///     "age",
///     DataType::Numeric,
///     vec![Value::Number(34.0), Value::Null, Value::Number(29.0)],
/// );
/// let dataset = Dataset::new("patients", vec![age]).unwrap();
/// assert_eq!(dataset.num_rows(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    columns: IndexMap<String, Column>,
}

impl Dataset {
    /// Creates a dataset from columns, enforcing the structural invariants:
    /// at least one column, unique names, equal lengths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySchema`], [`Error::DuplicateColumn`], or
    /// [`Error::LengthMismatch`] when an invariant is violated.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::EmptySchema);
        }
        let expected = columns[0].len();
        let mut map = IndexMap::with_capacity(columns.len());
        for column in columns {
            if column.len() != expected {
                return Err(Error::LengthMismatch {
                    column: column.name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
            let key = column.name.clone();
            if map.insert(key.clone(), column).is_some() {
                return Err(Error::DuplicateColumn { name: key });
            }
        }
        Ok(Self {
            name: name.into(),
            columns: map,
        })
    }

    /// Returns the dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Returns a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Returns mutable access to a column by name.
    ///
    /// Length-changing edits can break the equal-length invariant; the
    /// scanner re-verifies it before running.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }

    /// Iterates over the columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Position of a column in the dataset order.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Re-verifies the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Dataset::new`] if a mutation broke an
    /// invariant since construction.
    pub fn check_integrity(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::EmptySchema);
        }
        let expected = self.num_rows();
        for column in self.columns.values() {
            if column.len() != expected {
                return Err(Error::LengthMismatch {
                    column: column.name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(())
    }

    /// Keep only the rows where `keep[i]` is true, across every column.
    ///
    /// Preserves relative row order. Used by fixers that shrink the dataset.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for column in self.columns.values_mut() {
            let mut index = 0;
            column.values.retain(|_| {
                let kept = keep.get(index).copied().unwrap_or(true);
                index += 1;
                kept
            });
        }
    }
}
