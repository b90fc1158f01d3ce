//! Sitemap-driven crawl-and-extract pipeline
//!
//! Resolves a site's sitemap hierarchy into a flat page list, fetches each
//! in-domain page under a fixed concurrency bound, extracts labeled text
//! fragments from the designated content region, and deduplicates repeated
//! content across the whole run.
//!
//! Key components:
//! - `PageFetcher`: HTTP GET with a timeout, one attempt per URL
//! - `SitemapResolver`: recursive sitemap / sitemap-index flattening
//! - `ContentExtractor`: allow-listed block extraction from the content region
//! - `FragmentDeduplicator`: process-wide (URL, text) seen-set
//! - `extract_keywords`: pure term-frequency keyword ranking
//! - `CrawlCoordinator`: semaphore-gated fan-out and record accumulation

pub mod coordinator;
pub mod dedup;
pub mod extractor;
pub mod fetcher;
pub mod keywords;
pub mod sitemap;

pub use coordinator::{CrawlConfig, CrawlCoordinator, CrawlError, CrawlStats};
pub use dedup::FragmentDeduplicator;
pub use extractor::{ContentExtractor, ExtractorConfig};
pub use fetcher::{FetchConfig, FetchError, PageFetcher};
pub use keywords::extract_keywords;
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapResolver};
