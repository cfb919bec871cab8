//! Decoding object contents into an untyped column-major table

use crate::error::{TablonError, TablonResult};
use arrow::array::Array;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

/// Encoding of the source object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Parquet,
    Csv,
}

impl SourceFormat {
    /// Guess the format from an object path; anything not ending in `.csv` is parquet.
    pub fn from_path(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with(".csv") {
            Self::Csv
        } else {
            Self::Parquet
        }
    }
}

/// Decoded table before typing: every cell is its textual rendering, `None` for nulls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

/// Decode a parquet object.
///
/// Every arrow type is rendered through arrow's display formatter; the
/// normalizer parses the text back according to the schema registry.
pub fn decode_parquet(bytes: Bytes) -> TablonResult<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let options = FormatOptions::default();
    for batch in reader {
        let batch = batch?;
        for (position, array) in batch.columns().iter().enumerate() {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            let column = &mut columns[position];
            column.reserve(array.len());
            for row in 0..array.len() {
                if array.is_null(row) {
                    column.push(None);
                } else {
                    column.push(Some(formatter.value(row).to_string()));
                }
            }
        }
    }

    Ok(RawTable { headers, columns })
}

/// Decode a CSV object with a header row. Empty fields are nulls.
pub fn decode_csv(bytes: &[u8]) -> TablonResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TablonError::dataset_unavailable(format!("malformed CSV header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            TablonError::dataset_unavailable(format!("malformed CSV record {}: {}", line + 1, e))
        })?;
        for (position, column) in columns.iter_mut().enumerate() {
            let value = record.get(position).filter(|v| !v.is_empty());
            column.push(value.map(str::to_string));
        }
    }

    Ok(RawTable { headers, columns })
}
