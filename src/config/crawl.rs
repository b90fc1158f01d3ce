//! Crawl and extraction configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::DEFAULT_USER_AGENT;

/// Crawl configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Site root; the sitemap is expected at `<base_url>/sitemap.xml` and
    /// only pages on this host are crawled
    pub base_url: String,
    /// Where the resulting JSON document is written
    pub output_path: PathBuf,
    /// Maximum concurrent in-flight page tasks (admission gate width)
    pub max_concurrent_fetches: usize,
    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,
    /// Cap on sitemap documents fetched during resolution
    pub max_sitemaps: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://kamchatgtu.ru/".to_string(),
            output_path: PathBuf::from("parsed_data.json"),
            max_concurrent_fetches: 40,
            request_timeout_secs: 10,
            connect_timeout_secs: 10,
            max_sitemaps: 100,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Content extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// CSS selector locating the content region of a page
    pub content_selector: String,
    /// Block-level tags extracted from the region
    pub target_tags: Vec<String>,
    /// Keywords attached per fragment
    pub keyword_top_n: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            content_selector: "div#content".to_string(),
            target_tags: ["p", "h1", "h2", "h3", "div", "li"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            keyword_top_n: 5,
        }
    }
}
