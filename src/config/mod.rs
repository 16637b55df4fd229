//! Configuration module for Fieldrake
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a built-in default, so runs work without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use fieldrake::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Pipeline will use {} workers", config.pipeline.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, OutputConfig, PipelineConfig};

// Re-export parser functions
pub use parser::load_config;
