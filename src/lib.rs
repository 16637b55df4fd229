//! Fieldrake: a paginated listing scraper
//!
//! This crate implements a concurrent fetch-parse-extract pipeline that turns
//! paginated listing pages into flat records. Rows are located with CSS
//! selectors and every field of a row is extracted independently, so one
//! malformed cell never costs more than its own column.

pub mod config;
pub mod record;
pub mod scrape;
pub mod sink;
pub mod sites;

use thiserror::Error;

/// Main error type for Fieldrake operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: &'static str, value: String },
}

/// Persistence errors raised by record and asset sinks
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Fieldrake operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{AssetReference, FieldSpec, FieldValue, Record, RunStats, ScrapeResult, MISSING_VALUE};
pub use scrape::{Orchestrator, PageFetcher, PagePolicy};
pub use sites::SiteSpec;
