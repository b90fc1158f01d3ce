//! Content-block extraction from HTML
//!
//! Pages carry their meaningful text inside a single designated content
//! region. Extraction walks that subtree in document order, takes the
//! visible text of every allow-listed block element, drops blocks the
//! process-wide deduplicator has already seen, and attaches derived
//! keywords to each surviving fragment.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::dedup::FragmentDeduplicator;
use super::keywords::extract_keywords;
use crate::types::Fragment;

/// Errors during extractor construction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// CSS selector locating the single content region of a page
    pub content_selector: String,
    /// Block-level tag names extracted from the region, in allow-list form
    pub target_tags: Vec<String>,
    /// Maximum keywords attached per fragment
    pub keyword_top_n: usize,
}

impl Default for ExtractorConfig {
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

/// Content extractor with precompiled selectors
pub struct ContentExtractor {
    region_selector: Selector,
    block_selector: Selector,
    keyword_top_n: usize,
}

impl ContentExtractor {
    /// Create a new content extractor. Fails if the configured selectors do
    /// not parse; a crawl never starts with a broken extraction setup.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let region_selector = parse_selector(&config.content_selector)?;
        let block_selector = parse_selector(&config.target_tags.join(", "))?;

        Ok(Self {
            region_selector,
            block_selector,
            keyword_top_n: config.keyword_top_n,
        })
    }

    /// Extract deduplicated fragments from `html`.
    ///
    /// Returns an empty vec when the content region is absent; the page
    /// then contributes no record. Document order is preserved.
    pub fn extract(
        &self,
        html: &str,
        source_url: &str,
        dedup: &FragmentDeduplicator,
    ) -> Vec<Fragment> {
        let document = Html::parse_document(html);

        let Some(region) = document.select(&self.region_selector).next() else {
            return Vec::new();
        };

        let mut fragments = Vec::new();
        for element in region.select(&self.block_selector) {
            let text = visible_text(&element);
            if text.is_empty() {
                continue;
            }
            if dedup.seen_or_mark(source_url, &text) {
                continue;
            }

            let keywords = extract_keywords(&text, self.keyword_top_n);
            let label = element.value().name().to_uppercase();
            fragments.push(Fragment::new(label, text, keywords));
        }

        fragments
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Concatenated descendant text with insignificant whitespace collapsed to
/// single spaces and the ends trimmed.
fn visible_text(element: &ElementRef) -> String {
    let mut text = String::new();
    for part in element.text() {
        for word in part.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(&ExtractorConfig::default()).unwrap()
    }

    const URL: &str = "https://example.com/page";

    #[test]
    fn test_missing_content_region_yields_nothing() {
        let html = "<html><body><p>Outside any region</p></body></html>";
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        assert!(fragments.is_empty());
        assert!(dedup.is_empty());
    }

    #[test]
    fn test_extracts_allow_listed_blocks_in_document_order() {
        let html = r#"<html><body>
            <div id="content">
                <h1>Faculty news</h1>
                <p>First paragraph</p>
                <span>Ignored inline element</span>
                <li>List entry</li>
            </div>
        </body></html>"#;
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        let labels: Vec<&str> = fragments.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(labels, vec!["H1", "P", "LI"]);
        assert_eq!(fragments[0].content, "Faculty news");
        assert_eq!(fragments[1].content, "First paragraph");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let html = r#"<div id="content"><p>  spread
                across   <b>several</b>
            lines  </p></div>"#;
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].content, "spread across several lines");
    }

    #[test]
    fn test_empty_blocks_skipped() {
        let html = r#"<div id="content"><p>   </p><p></p><p>kept</p></div>"#;
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].content, "kept");
    }

    #[test]
    fn test_duplicate_blocks_within_page_collapse() {
        let html = r#"<div id="content">
            <p>Repeated announcement</p>
            <p>Repeated announcement</p>
        </div>"#;
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        assert_eq!(fragments.len(), 1);
        assert_eq!(dedup.duplicates_skipped(), 1);
    }

    #[test]
    fn test_same_text_on_other_page_survives() {
        let html = r#"<div id="content"><p>Shared footer text</p></div>"#;
        let dedup = FragmentDeduplicator::new();
        let ex = extractor();

        let first = ex.extract(html, "https://example.com/a", &dedup);
        let second = ex.extract(html, "https://example.com/b", &dedup);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_nested_div_yields_both_outer_and_inner() {
        // An outer div's text includes its children; the inner block is a
        // separate element with different text, so both survive.
        let html = r#"<div id="content">
            <div>Intro <p>Body paragraph</p></div>
        </div>"#;
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].title, "DIV");
        assert_eq!(fragments[0].content, "Intro Body paragraph");
        assert_eq!(fragments[1].title, "P");
        assert_eq!(fragments[1].content, "Body paragraph");
    }

    #[test]
    fn test_keywords_attached() {
        let html = r#"<div id="content"><p>rust rust rust crab crab pointer</p></div>"#;
        let dedup = FragmentDeduplicator::new();

        let fragments = extractor().extract(html, URL, &dedup);
        assert_eq!(
            fragments[0].keywords,
            vec!["rust".to_string(), "crab".to_string(), "pointer".to_string()]
        );
    }

    #[test]
    fn test_invalid_selector_is_a_construction_error() {
        let config = ExtractorConfig {
            content_selector: "div#[broken".to_string(),
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            ContentExtractor::new(&config),
            Err(ExtractError::Selector { .. })
        ));
    }
}
