//! Core error types and traits for Tablon

use crate::predicate::PredicateFault;
use thiserror::Error;

/// Result type alias for Tablon operations
pub type TablonResult<T> = Result<T, TablonError>;

/// Unified error trait implemented by every Tablon error.
///
/// - error_code(): unique code for programmatic error identification
/// - message(): human-readable error message
/// - context(): optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Whether the user can reasonably resubmit the same request.
    ///
    /// Nothing in the core retries on its own; this only drives the hint the
    /// shell prints next to the error.
    fn is_user_retryable(&self) -> bool {
        false
    }
}

/// Main error type for Tablon
#[derive(Error, Debug, Clone)]
pub enum TablonError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The source dataset could not be fetched or decoded
    #[error("Dataset unavailable: {message}")]
    DatasetUnavailable {
        message: String,
        source_label: Option<String>,
        context: Option<String>,
    },

    /// The text-generation backend failed or returned nothing usable
    #[error("Translation unavailable: {message}")]
    TranslationUnavailable {
        message: String,
        provider: Option<String>,
        context: Option<String>,
    },

    /// The generated predicate was rejected by the sandbox
    #[error("Predicate fault: {0}")]
    Predicate(PredicateFault),

    /// Export packaging errors
    #[error("Export error: {message}")]
    Export {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// HTTP request errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
