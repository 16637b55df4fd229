//! Extracted records and the field machinery that produces them

pub mod field;
pub mod types;

pub use field::{safe_extract, ExtractFn, FieldSpec, FieldValue, RowContext, MISSING_VALUE};
pub use types::{AssetReference, Record, RunStats, ScrapeResult};
