//! Error types for Tablon
//!
//! Every fallible operation in the core returns [`TablonResult`]. Errors carry a
//! stable code (see [`UnifiedError::error_code`]) so the shell can decide how
//! to present them:
//! - `DatasetUnavailable` halts the session before any request is served
//! - `TranslationUnavailable` fails a single request and leaves the session usable
//! - `Predicate` wraps a sandbox fault for the request that produced it

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{TablonError, TablonResult, UnifiedError};
