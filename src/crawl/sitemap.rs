//! Sitemap and sitemap-index resolution
//!
//! A sitemap location either lists pages directly (`<urlset>`) or lists
//! further sitemaps (`<sitemapindex>`). Resolution flattens the hierarchy
//! depth-first into a single page-URL sequence, preserving child order and
//! the order within each child. Any failure along the way costs only that
//! branch; the run continues.

use std::collections::HashSet;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;
use tracing::{info, warn};

use super::fetcher::PageFetcher;

/// Errors during sitemap parsing
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unrecognized root element <{0}>")]
    UnrecognizedRoot(String),
    #[error("document has no root element")]
    Empty,
}

/// A parsed sitemap document: either an index of further sitemaps or a flat
/// list of page locations. Transient; exists only during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: child sitemap locations in document order
    Index(Vec<String>),
    /// `<urlset>`: page locations in document order
    UrlSet(Vec<String>),
}

/// Parse sitemap XML into its document kind.
///
/// Collects every non-empty `<loc>` text value in document order; an index
/// document carries only sitemap locations and a urlset only page locations,
/// so a flat scan is sufficient for both. XML entities are unescaped.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    #[derive(Clone, Copy)]
    enum Root {
        Index,
        UrlSet,
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<Root> = None;
    let mut locs: Vec<String> = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = start.local_name();
                match name.as_ref() {
                    b"sitemapindex" if root.is_none() => root = Some(Root::Index),
                    b"urlset" if root.is_none() => root = Some(Root::UrlSet),
                    b"loc" => in_loc = true,
                    other if root.is_none() => {
                        return Err(SitemapError::UnrecognizedRoot(
                            String::from_utf8_lossy(other).into_owned(),
                        ));
                    }
                    _ => {}
                }
            }
            Event::Text(text) if in_loc => {
                let loc = text.unescape()?.trim().to_string();
                if !loc.is_empty() {
                    locs.push(loc);
                }
            }
            Event::End(end) => {
                if end.local_name().as_ref() == b"loc" {
                    in_loc = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match root {
        Some(Root::Index) => Ok(SitemapDocument::Index(locs)),
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        None => Err(SitemapError::Empty),
    }
}

/// Resolves a sitemap hierarchy into a flat page-URL sequence.
pub struct SitemapResolver {
    fetcher: Arc<PageFetcher>,
    /// Cap on total sitemap documents fetched per resolution. Together with
    /// the visited set this bounds cyclic or degenerate indexes.
    max_sitemaps: usize,
}

impl SitemapResolver {
    pub fn new(fetcher: Arc<PageFetcher>, max_sitemaps: usize) -> Self {
        Self {
            fetcher,
            max_sitemaps: max_sitemaps.max(1),
        }
    }

    /// Resolve `root` recursively, returning every page URL it reaches.
    ///
    /// Children of an index are resolved one at a time, depth-first, and
    /// their results concatenated in child order, so resolving the same
    /// index twice yields the same sequence. Failed branches yield nothing.
    pub async fn resolve(&self, root: &str) -> Vec<String> {
        let mut pages: Vec<String> = Vec::new();
        // Depth-first work stack; children are pushed in reverse so they pop
        // in document order.
        let mut pending: Vec<String> = vec![root.to_string()];
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(location) = pending.pop() {
            if !visited.insert(location.clone()) {
                warn!("Skipping already-visited sitemap: {}", location);
                continue;
            }
            if visited.len() > self.max_sitemaps {
                warn!(
                    "Sitemap cap of {} reached; ignoring {}",
                    self.max_sitemaps, location
                );
                continue;
            }

            info!("Loading sitemap: {}", location);
            let xml = match self.fetcher.fetch_text(&location).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to fetch sitemap {}: {}", location, e);
                    continue;
                }
            };

            match parse_sitemap(&xml) {
                Ok(SitemapDocument::Index(children)) => {
                    for child in children.into_iter().rev() {
                        if !visited.contains(&child) {
                            pending.push(child);
                        }
                    }
                }
                Ok(SitemapDocument::UrlSet(urls)) => {
                    info!("Found {} page URLs in {}", urls.len(), location);
                    pages.extend(urls);
                }
                Err(e) => {
                    warn!("Unusable sitemap {}: {}", location, e);
                }
            }
        }

        pages
    }
}
