//! Persistence sinks for finished runs
//!
//! Two sinks exist: a CSV sink for the records themselves and a directory
//! sink for downloaded assets. They are independent; each reports its own
//! outcome so a failed asset write never loses the CSV and vice versa.

pub mod assets;
pub mod csv_sink;

pub use assets::{asset_filename, infer_extension, sanitize_key, AssetDirSink};
pub use csv_sink::CsvSink;
