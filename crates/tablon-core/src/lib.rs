//! Tablon Core Library
//!
//! Turns a free-text request about the vehicle import table into a filter
//! predicate, runs it in a sandbox against the session dataset and packages
//! the matching rows as a zip archive.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod extract;
pub mod llm;
pub mod predicate;
pub mod prompt;
pub mod schema;
pub mod session;

// Re-export commonly used types
pub use config::{BackendConfig, LlmProvider, StorageConfig, TablonConfig};
pub use dataset::{Cell, Column, Dataset, DatasetProvider, DatasetSource};
pub use error::{TablonError, TablonResult, UnifiedError};
pub use export::{ExportFormat, ResultExporter};
pub use extract::CodeExtractor;
pub use llm::{LlmClient, TextGenerator};
pub use predicate::{FilteredResult, GeneratedPredicate, PredicateFault, PredicateSandbox};
pub use prompt::{PromptCompiler, PromptLanguage};
pub use schema::{ColumnSpec, SchemaRegistry, SemanticType};
pub use session::{FilterOutcome, FilterRequest, FilterSession};
