//! From trait implementations for TablonError conversions

use super::types::TablonError;
use crate::predicate::PredicateFault;

impl From<PredicateFault> for TablonError {
    fn from(fault: PredicateFault) -> Self {
        Self::Predicate(fault)
    }
}

impl From<std::io::Error> for TablonError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for TablonError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for TablonError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
            context: None,
        }
    }
}

impl From<object_store::Error> for TablonError {
    fn from(error: object_store::Error) -> Self {
        Self::dataset_unavailable(error.to_string())
    }
}

impl From<parquet::errors::ParquetError> for TablonError {
    fn from(error: parquet::errors::ParquetError) -> Self {
        Self::dataset_unavailable(format!("malformed parquet object: {}", error))
    }
}

impl From<arrow::error::ArrowError> for TablonError {
    fn from(error: arrow::error::ArrowError) -> Self {
        Self::dataset_unavailable(format!("columnar decode failed: {}", error))
    }
}

impl From<csv::Error> for TablonError {
    fn from(error: csv::Error) -> Self {
        Self::other(format!("CSV error: {}", error))
    }
}

impl From<zip::result::ZipError> for TablonError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::export(format!("archive error: {}", error))
    }
}

impl From<rust_xlsxwriter::XlsxError> for TablonError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::export(format!("spreadsheet error: {}", error))
    }
}
