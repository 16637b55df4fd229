//! Scraping engine: fetching, pagination, extraction, orchestration
//!
//! The pieces compose in one direction: `pagination` plans page requests,
//! `fetcher` turns them into page results, `extractor` turns page bodies
//! into records, and `orchestrator` wires the three together over a bounded
//! worker pool.

pub mod extractor;
pub mod fetcher;
pub mod orchestrator;
pub mod pagination;

pub use extractor::extract_records;
pub use fetcher::{build_http_client, PageFetcher, PageRequest, PageResult, PageStatus};
pub use orchestrator::Orchestrator;
pub use pagination::{bounded_plan, Discovery, PageHintFn, PagePolicy, PageUrlFn, StopReason};
