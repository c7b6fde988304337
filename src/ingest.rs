//! Ingestion boundary adapters.
//!
//! The pipeline consumes a fully materialized [`Dataset`]; it never parses
//! files or streams itself. These adapters sit at that boundary and build a
//! `Dataset` from Arrow record batches or from CSV, JSON Lines, and Parquet
//! files.
//!
//! Arrow nulls map to [`Value::Null`]; Arrow types map onto the four
//! declared [`DataType`]s, with unrecognized types degrading to text.

// Numeric cells are f64; integer conversions are inherently lossy at the
// extremes.
#![allow(clippy::cast_precision_loss)]

use std::{path::Path, sync::Arc};

use arrow::{
    array::{
        Array, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array, Int16Array,
        Int32Array, Int64Array, Int8Array, LargeStringArray, RecordBatch, StringArray,
        TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
        TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
    },
    datatypes::{DataType as ArrowDataType, Schema},
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::{
    dataset::{Column, DataType, Dataset, Value},
    error::{Error, Result},
};

/// Options for CSV ingestion.
#[derive(Debug)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row.
    pub has_header: bool,
    /// Delimiter character (default is comma).
    pub delimiter: Option<u8>,
    /// Batch size for reading.
    pub batch_size: usize,
    /// Optional schema (inferred if not provided).
    pub schema: Option<Schema>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: None,
            batch_size: 8192,
            schema: None,
        }
    }
}

/// Options for JSON Lines ingestion.
#[derive(Debug)]
pub struct JsonOptions {
    /// Batch size for reading.
    pub batch_size: usize,
    /// Optional schema (inferred if not provided).
    pub schema: Option<Schema>,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            batch_size: 8192,
            schema: None,
        }
    }
}

/// Loads a dataset from a file, dispatching on its extension.
///
/// Recognizes `csv`, `json`/`jsonl`/`ndjson`, and `parquet`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for any other extension, or the
/// format loader's error.
pub fn from_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => from_csv(path),
        Some("json" | "jsonl" | "ndjson") => from_json(path),
        Some("parquet") => from_parquet(path),
        Some(other) => Err(Error::unsupported_format(other)),
        None => Err(Error::unsupported_format(path.display().to_string())),
    }
}

/// Builds a dataset from Arrow record batches.
///
/// # Errors
///
/// Returns an error if `batches` is empty, the batches disagree on schema,
/// or the resulting columns violate the dataset invariants.
pub fn from_record_batches(name: impl Into<String>, batches: &[RecordBatch]) -> Result<Dataset> {
    let Some(first) = batches.first() else {
        return Err(Error::EmptyDataset);
    };
    let schema = first.schema();
    for (i, batch) in batches.iter().enumerate().skip(1) {
        if batch.schema() != schema {
            return Err(Error::invalid_config(format!(
                "Batch {i} has a different schema than batch 0"
            )));
        }
    }

    let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut columns = Vec::with_capacity(schema.fields().len());
    for (col_idx, field) in schema.fields().iter().enumerate() {
        let mut values = Vec::with_capacity(total_rows);
        for batch in batches {
            let array = batch.column(col_idx);
            for row in 0..array.len() {
                values.push(value_at(array.as_ref(), row));
            }
        }
        columns.push(Column::new(
            field.name().clone(),
            map_data_type(field.data_type()),
            values,
        ));
    }
    Dataset::new(name, columns)
}

/// Loads a dataset from a CSV file with default options.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, parsed, or is empty.
pub fn from_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    from_csv_with_options(path, CsvOptions::default())
}

/// Loads a dataset from a CSV file.
///
/// The schema is inferred from the first thousand rows unless provided.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, parsed, or is empty.
pub fn from_csv_with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Dataset> {
    use std::io::{BufReader, Seek, SeekFrom};

    use arrow_csv::{reader::Format, ReaderBuilder};

    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
    let mut buf_reader = BufReader::new(file);

    let schema = if let Some(schema) = options.schema {
        Arc::new(schema)
    } else {
        let mut format = Format::default().with_header(options.has_header);
        if let Some(delim) = options.delimiter {
            format = format.with_delimiter(delim);
        }
        let (inferred, _) = format
            .infer_schema(&mut buf_reader, Some(1000))
            .map_err(Error::Arrow)?;
        buf_reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::io(e, path))?;
        Arc::new(inferred)
    };

    let mut builder = ReaderBuilder::new(schema)
        .with_batch_size(options.batch_size)
        .with_header(options.has_header);
    if let Some(delim) = options.delimiter {
        builder = builder.with_delimiter(delim);
    }
    let reader = builder.build(buf_reader).map_err(Error::Arrow)?;

    let batches: Vec<RecordBatch> = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::Arrow)?;
    if batches.is_empty() {
        return Err(Error::EmptyDataset);
    }
    from_record_batches(dataset_name(path), &batches)
}

/// Loads a dataset from a JSON Lines file, one JSON object per line.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, parsed, or is empty.
pub fn from_json(path: impl AsRef<Path>) -> Result<Dataset> {
    from_json_with_options(path, JsonOptions::default())
}

/// Loads a dataset from a JSON Lines file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, parsed, or is empty.
pub fn from_json_with_options(path: impl AsRef<Path>, options: JsonOptions) -> Result<Dataset> {
    use std::io::BufReader;

    use arrow_json::ReaderBuilder;

    let path = path.as_ref();

    let schema = if let Some(schema) = options.schema {
        Arc::new(schema)
    } else {
        let infer_file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let infer_reader = BufReader::new(infer_file);
        let (inferred, _) = arrow_json::reader::infer_json_schema(infer_reader, Some(1000))
            .map_err(Error::Arrow)?;
        Arc::new(inferred)
    };

    let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
    let buf_reader = BufReader::new(file);
    let reader = ReaderBuilder::new(schema)
        .with_batch_size(options.batch_size)
        .build(buf_reader)
        .map_err(Error::Arrow)?;

    let batches: Vec<RecordBatch> = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::Arrow)?;
    if batches.is_empty() {
        return Err(Error::EmptyDataset);
    }
    from_record_batches(dataset_name(path), &batches)
}

/// Loads a dataset from a Parquet file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not valid Parquet, or
/// is empty.
pub fn from_parquet(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(Error::Parquet)?;
    let reader = builder.build().map_err(Error::Parquet)?;

    let batches: Vec<RecordBatch> = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::Arrow)?;
    if batches.is_empty() {
        return Err(Error::EmptyDataset);
    }
    from_record_batches(dataset_name(path), &batches)
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("dataset")
        .to_string()
}

fn map_data_type(data_type: &ArrowDataType) -> DataType {
    match data_type {
        ArrowDataType::Int8
        | ArrowDataType::Int16
        | ArrowDataType::Int32
        | ArrowDataType::Int64
        | ArrowDataType::UInt8
        | ArrowDataType::UInt16
        | ArrowDataType::UInt32
        | ArrowDataType::UInt64
        | ArrowDataType::Float32
        | ArrowDataType::Float64 => DataType::Numeric,
        ArrowDataType::Boolean => DataType::Boolean,
        ArrowDataType::Date32 | ArrowDataType::Date64 | ArrowDataType::Timestamp(_, _) => {
            DataType::DateTime
        }
        _ => DataType::Text,
    }
}

fn value_at(array: &dyn Array, index: usize) -> Value {
    if array.is_null(index) {
        return Value::Null;
    }
    let any = array.as_any();
    if let Some(a) = any.downcast_ref::<StringArray>() {
        Value::Text(a.value(index).to_string())
    } else if let Some(a) = any.downcast_ref::<LargeStringArray>() {
        Value::Text(a.value(index).to_string())
    } else if let Some(a) = any.downcast_ref::<Int8Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<Int16Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<Int32Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<Int64Array>() {
        Value::Number(a.value(index) as f64)
    } else if let Some(a) = any.downcast_ref::<UInt8Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<UInt16Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<UInt32Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<UInt64Array>() {
        Value::Number(a.value(index) as f64)
    } else if let Some(a) = any.downcast_ref::<Float32Array>() {
        Value::Number(f64::from(a.value(index)))
    } else if let Some(a) = any.downcast_ref::<Float64Array>() {
        Value::Number(a.value(index))
    } else if let Some(a) = any.downcast_ref::<BooleanArray>() {
        Value::Bool(a.value(index))
    } else if let Some(a) = any.downcast_ref::<Date32Array>() {
        Value::Timestamp(i64::from(a.value(index)) * 86_400)
    } else if let Some(a) = any.downcast_ref::<Date64Array>() {
        Value::Timestamp(a.value(index) / 1_000)
    } else if let Some(a) = any.downcast_ref::<TimestampSecondArray>() {
        Value::Timestamp(a.value(index))
    } else if let Some(a) = any.downcast_ref::<TimestampMillisecondArray>() {
        Value::Timestamp(a.value(index) / 1_000)
    } else if let Some(a) = any.downcast_ref::<TimestampMicrosecondArray>() {
        Value::Timestamp(a.value(index) / 1_000_000)
    } else if let Some(a) = any.downcast_ref::<TimestampNanosecondArray>() {
        Value::Timestamp(a.value(index) / 1_000_000_000)
    } else {
        Value::Text("?".to_string())
    }
}
