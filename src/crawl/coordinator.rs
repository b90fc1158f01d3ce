//! Crawl coordinator orchestrating the whole pipeline
//!
//! Resolves the site's sitemap hierarchy, filters the resulting URLs to the
//! target host, and fans page processing out across tokio tasks gated by a
//! semaphore. Each page task runs fetch then extract (deduplication and
//! keyword derivation happen inside extraction) and appends at most one
//! record to the shared result sequence. Nothing a single page does can
//! abort the run, up to and including a panic.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock, Semaphore};
use tracing::{debug, info, warn};
use url::Url;

use super::{
    dedup::FragmentDeduplicator,
    extractor::{ContentExtractor, ExtractError, ExtractorConfig},
    fetcher::{FetchConfig, FetchError, PageFetcher},
    sitemap::SitemapResolver,
};
use crate::types::{CrawlResult, PageRecord};

/// Errors that prevent a crawl from starting
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base url '{0}' has no host")]
    MissingHost(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Runtime configuration for the crawl coordinator
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Site root; the sitemap lives at `<base_url>sitemap.xml`
    pub base_url: Url,
    /// Maximum concurrent in-flight page tasks
    pub max_concurrent_fetches: usize,
    /// Cap on sitemap documents fetched during resolution
    pub max_sitemaps: usize,
    /// Fetch configuration
    pub fetch: FetchConfig,
    /// Extractor configuration
    pub extractor: ExtractorConfig,
}

impl CrawlConfig {
    /// Build a runtime CrawlConfig from the TOML configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, CrawlError> {
        let base_url =
            Url::parse(&config.crawl.base_url).map_err(|source| CrawlError::InvalidBaseUrl {
                url: config.crawl.base_url.clone(),
                source,
            })?;
        if base_url.host_str().is_none() {
            return Err(CrawlError::MissingHost(config.crawl.base_url.clone()));
        }

        Ok(Self {
            base_url,
            max_concurrent_fetches: config.crawl.max_concurrent_fetches,
            max_sitemaps: config.crawl.max_sitemaps,
            fetch: FetchConfig {
                user_agent: config.crawl.user_agent.clone(),
                timeout: std::time::Duration::from_secs(config.crawl.request_timeout_secs),
                connect_timeout: std::time::Duration::from_secs(config.crawl.connect_timeout_secs),
            },
            extractor: ExtractorConfig {
                content_selector: config.extraction.content_selector.clone(),
                target_tags: config.extraction.target_tags.clone(),
                keyword_top_n: config.extraction.keyword_top_n,
            },
        })
    }
}

/// Statistics from one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// URLs listed across all resolved sitemaps
    pub urls_discovered: u64,
    /// URLs remaining after the host filter
    pub urls_in_scope: u64,
    /// Pages that produced a record
    pub pages_crawled: u64,
    /// Pages whose fetch failed
    pub pages_failed: u64,
    /// Pages with no content region or no surviving fragments
    pub pages_empty: u64,
    /// Fragments across all records
    pub fragments_extracted: u64,
    /// Blocks suppressed by the deduplicator
    pub duplicates_skipped: u64,
}

/// Outcome of one page task
enum PageOutcome {
    Record(PageRecord),
    Empty,
    Failed,
}

/// Crawl coordinator owning the shared pipeline state
pub struct CrawlCoordinator {
    config: CrawlConfig,
    fetcher: Arc<PageFetcher>,
    extractor: Arc<ContentExtractor>,
    dedup: Arc<FragmentDeduplicator>,
    stats: Arc<RwLock<CrawlStats>>,
}

impl CrawlCoordinator {
    /// Create a new coordinator. Fails only on a broken fetch or extraction
    /// setup; once constructed, a run always completes.
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = Arc::new(PageFetcher::new(&config.fetch)?);
        let extractor = Arc::new(ContentExtractor::new(&config.extractor)?);

        Ok(Self {
            config,
            fetcher,
            extractor,
            dedup: Arc::new(FragmentDeduplicator::new()),
            stats: Arc::new(RwLock::new(CrawlStats::default())),
        })
    }

    /// Run one full crawl: sitemap resolution, host filtering, bounded
    /// fan-out, record accumulation. Every failure is contained at the page
    /// or sitemap-branch level, so the run itself cannot fail.
    pub async fn run(&self) -> CrawlResult {
        let started = Instant::now();

        let sitemap_url = match self.config.base_url.join("sitemap.xml") {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    "Cannot derive sitemap location from {}: {}",
                    self.config.base_url, e
                );
                return CrawlResult::default();
            }
        };

        let resolver = SitemapResolver::new(Arc::clone(&self.fetcher), self.config.max_sitemaps);
        let discovered = resolver.resolve(sitemap_url.as_str()).await;

        // Keep only pages on exactly the base host and port; no subdomain
        // wildcarding.
        let host = self.config.base_url.host_str().unwrap_or_default().to_string();
        let port = self.config.base_url.port_or_known_default();
        let targets: Vec<Url> = discovered
            .iter()
            .filter_map(|raw| Url::parse(raw).ok())
            .filter(|url| {
                url.host_str() == Some(host.as_str()) && url.port_or_known_default() == port
            })
            .collect();

        info!(
            "Resolved {} URLs from sitemaps, {} on host {}",
            discovered.len(),
            targets.len(),
            host
        );

        {
            let mut stats = self.stats.write().await;
            stats.urls_discovered = discovered.len() as u64;
            stats.urls_in_scope = targets.len() as u64;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_fetches.max(1)));
        let records: Arc<Mutex<Vec<PageRecord>>> = Arc::new(Mutex::new(Vec::new()));

        let mut tasks = Vec::with_capacity(targets.len());
        for url in targets {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let dedup = Arc::clone(&self.dedup);
            let records = Arc::clone(&records);
            let stats = Arc::clone(&self.stats);

            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit, // held until the task completes
                    Err(_) => return,     // semaphore closed
                };

                let outcome = process_page(&url, &fetcher, &extractor, &dedup).await;

                let mut stats = stats.write().await;
                match outcome {
                    PageOutcome::Record(record) => {
                        stats.pages_crawled += 1;
                        stats.fragments_extracted += record.props.len() as u64;
                        drop(stats);
                        records.lock().await.push(record);
                    }
                    PageOutcome::Empty => stats.pages_empty += 1,
                    PageOutcome::Failed => stats.pages_failed += 1,
                }
            }));
        }

        for task in tasks {
            if let Err(e) = task.await {
                warn!("Page task aborted: {}", e);
            }
        }

        {
            let mut stats = self.stats.write().await;
            stats.duplicates_skipped = self.dedup.duplicates_skipped();
        }

        let records = {
            let mut guard = records.lock().await;
            std::mem::take(&mut *guard)
        };

        info!(
            "Crawl finished: {} records in {:.2}s",
            records.len(),
            started.elapsed().as_secs_f64()
        );

        CrawlResult { records }
    }

    /// Snapshot of the run statistics.
    pub async fn stats(&self) -> CrawlStats {
        self.stats.read().await.clone()
    }
}

/// Process one page: fetch, extract, build a record.
///
/// Every failure is logged with the page identifier and converted into a
/// zero-yield outcome.
async fn process_page(
    url: &Url,
    fetcher: &PageFetcher,
    extractor: &Arc<ContentExtractor>,
    dedup: &Arc<FragmentDeduplicator>,
) -> PageOutcome {
    debug!("Processing page: {}", url);

    let html = match fetcher.fetch_text(url.as_str()).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to fetch {}: {}", url, e);
            return PageOutcome::Failed;
        }
    };

    // HTML parsing is CPU-bound; run it on the blocking pool so forty
    // concurrent parses cannot starve the async runtime.
    let extractor = Arc::clone(extractor);
    let dedup = Arc::clone(dedup);
    let source_url = url.as_str().to_string();
    let extraction =
        tokio::task::spawn_blocking(move || extractor.extract(&html, &source_url, &dedup)).await;

    let fragments = match extraction {
        Ok(fragments) => fragments,
        Err(e) => {
            warn!("Extraction task failed for {}: {}", url, e);
            return PageOutcome::Failed;
        }
    };

    if fragments.is_empty() {
        debug!("No content extracted from {}", url);
        return PageOutcome::Empty;
    }

    PageOutcome::Record(PageRecord::new(url.as_str(), fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn runtime_config(base: &str) -> CrawlConfig {
        let mut config = Config::default();
        config.crawl.base_url = base.to_string();
        CrawlConfig::from_config(&config).unwrap()
    }

    #[test]
    fn test_from_config_parses_base_url() {
        let config = runtime_config("https://example.com/");
        assert_eq!(config.base_url.host_str(), Some("example.com"));
        assert_eq!(config.max_concurrent_fetches, 40);
    }

    #[test]
    fn test_from_config_rejects_invalid_base_url() {
        let mut config = Config::default();
        config.crawl.base_url = "definitely not a url".to_string();
        assert!(matches!(
            CrawlConfig::from_config(&config),
            Err(CrawlError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_coordinator_builds() {
        let coordinator = CrawlCoordinator::new(runtime_config("https://example.com/"));
        assert!(coordinator.is_ok());
    }

    #[test]
    fn test_coordinator_rejects_broken_selector() {
        let mut config = runtime_config("https://example.com/");
        config.extractor.content_selector = "div#[broken".to_string();
        assert!(matches!(
            CrawlCoordinator::new(config),
            Err(CrawlError::Extract(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_start_at_zero() {
        let coordinator = CrawlCoordinator::new(runtime_config("https://example.com/")).unwrap();
        let stats = coordinator.stats().await;
        assert_eq!(stats.urls_discovered, 0);
        assert_eq!(stats.pages_crawled, 0);
        assert_eq!(stats.duplicates_skipped, 0);
    }
}
