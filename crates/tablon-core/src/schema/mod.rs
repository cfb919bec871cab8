//! Schema registry
//!
//! Static description of the dataset's columns: semantic type, controlled
//! vocabulary, casing rule and redirects. The registry is built once at startup
//! and shared read-only (`Arc<SchemaRegistry>`) by the prompt compiler, the
//! dataset normalizer and the predicate sandbox.

mod registry;
mod types;

pub use registry::SchemaRegistry;
pub use types::{CasingRule, ColumnSpec, SemanticType};
