//! In-memory dataset and its provider
//!
//! - [`Dataset`]: column-major table of typed [`Cell`]s, never mutated after load
//! - [`RawTable`]: decoded but untyped object contents (parquet or CSV)
//! - [`DatasetProvider`]: fetches, decodes and normalizes once per session

mod normalize;
pub mod provider;
mod reader;
mod table;

pub use normalize::{parse_datetime, Normalizer};
pub use provider::{DatasetProvider, DatasetSource};
pub use reader::{decode_csv, decode_parquet, RawTable, SourceFormat};
pub use table::{Cell, Column, Dataset, DATETIME_FORMAT};
