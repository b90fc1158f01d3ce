//! Harvest: sitemap-driven crawl-and-extract pipeline
//!
//! Crawls a site's sitemap hierarchy, fetches each listed page under a fixed
//! concurrency bound, extracts labeled text fragments from a designated
//! content region, deduplicates repeated content across the whole run, and
//! emits a JSON record set for downstream indexing. A set of offline
//! transforms reshapes that record set for later pipeline stages.

pub mod config;
pub mod crawl;
pub mod records;
pub mod types;
pub mod util;

pub use config::Config;
pub use crawl::{CrawlCoordinator, CrawlStats};
pub use types::{CrawlResult, Fragment, PageRecord};
