//! Core record types emitted by the crawl pipeline

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Class discriminator carried by every crawled page record.
///
/// Downstream consumers key on this value to tell crawled pages apart from
/// externally produced records (e.g. `"Document"`), so it is part of the
/// output contract.
pub const PAGE_RECORD_CLASS: &str = "general_motors";

/// One extracted text block from a page's content region.
///
/// Invariant: `content` is never empty, and no two fragments in a run share
/// both the same source URL and the same `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Uppercased tag name of the source element (e.g. "P", "H1", "LI").
    pub title: String,
    /// Trimmed visible text of the element.
    pub content: String,
    /// Ranked keywords derived from `content`, highest frequency first.
    pub keywords: Vec<String>,
}

impl Fragment {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            keywords,
        }
    }
}

/// One crawled page with its surviving fragments.
///
/// Created once per successfully parsed page that yielded at least one
/// fragment; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Record discriminator; always [`PAGE_RECORD_CLASS`] for crawled pages.
    #[serde(rename = "class")]
    pub kind: String,
    /// Globally unique record id, assigned at creation.
    pub id: String,
    /// Canonical source URL of the page.
    pub url: String,
    /// Extracted fragments in document order.
    pub props: Vec<Fragment>,
}

impl PageRecord {
    /// Create a record for `url` with a fresh UUID.
    pub fn new(url: impl Into<String>, props: Vec<Fragment>) -> Self {
        Self {
            kind: PAGE_RECORD_CLASS.to_string(),
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            props,
        }
    }
}

/// The full record set produced by one crawl run.
///
/// Serializes as a bare JSON array of records. Record order is completion
/// order and carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlResult {
    pub records: Vec<PageRecord>,
}

impl CrawlResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total fragments across all records.
    pub fn fragment_count(&self) -> usize {
        self.records.iter().map(|r| r.props.len()).sum()
    }
}
