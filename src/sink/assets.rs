//! Asset directory sink and asset filename derivation
//!
//! Asset filenames are built from a record key (say, a player name) plus an
//! extension inferred from the source URL. Keys are sanitized down to a
//! filesystem-safe form; URLs that hide their extension fall back to `.bin`.

use crate::record::Record;
use crate::SinkResult;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

lazy_static! {
    // A 3-4 letter extension at the end of the path, query string allowed
    static ref EXTENSION: Regex =
        Regex::new(r"(\.[A-Za-z]{3,4})(?:\?|$)").expect("Invalid regex");
}

/// Pulls a lowercased file extension (dot included) out of an asset URL
pub fn infer_extension(url: &str) -> Option<String> {
    EXTENSION
        .captures(url)
        .map(|captures| captures[1].to_ascii_lowercase())
}

/// Reduces a record key to a filesystem-safe filename stem
///
/// Alphanumerics survive; runs of whitespace, hyphens, and underscores
/// collapse into single underscores; everything else is dropped.
pub fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if (c.is_whitespace() || c == '-' || c == '_') && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Builds the filename an asset will be stored under
pub fn asset_filename(key: &str, url: &str) -> String {
    let stem = sanitize_key(key);
    let stem = if stem.is_empty() {
        "asset".to_string()
    } else {
        stem
    };
    match infer_extension(url) {
        Some(extension) => format!("{}{}", stem, extension),
        None => {
            tracing::warn!("Could not infer an extension for {}", url);
            format!("{}.bin", stem)
        }
    }
}

/// Writes downloaded assets into one directory
pub struct AssetDirSink {
    dir: PathBuf,
}

impl AssetDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        AssetDirSink { dir: dir.into() }
    }

    /// Writes every record's downloaded asset, returning the file count
    ///
    /// Records without an asset, or whose download failed, are skipped.
    /// A single unwritable file is logged and skipped as well; only an
    /// uncreatable directory fails the whole write.
    pub fn write(&self, records: &[Record]) -> SinkResult<usize> {
        std::fs::create_dir_all(&self.dir)?;

        let mut written = 0;
        for record in records {
            let Some(asset) = &record.asset else { continue };
            let Some(data) = &asset.data else {
                tracing::debug!("No data for asset {}", asset.filename);
                continue;
            };
            let path = self.dir.join(&asset.filename);
            match std::fs::write(&path, data) {
                Ok(()) => written += 1,
                Err(e) => {
                    tracing::warn!("Error while writing asset {}: {}", asset.filename, e);
                }
            }
        }
        Ok(written)
    }
}
