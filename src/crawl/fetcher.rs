//! HTTP fetch engine for sitemap and page retrieval
//!
//! One attempt per URL: a connection error, a timeout, or a non-success
//! status all yield the same failure outcome. The error variants exist so
//! the caller can log the specific cause, not to drive different recovery
//! paths; a failed page simply contributes nothing to the run.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during fetching
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Configuration for the fetch engine
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP fetcher shared by the sitemap resolver and the page tasks.
///
/// Wraps a single pooled reqwest client; cloning the client is cheap, so one
/// instance serves all concurrent tasks.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher from the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_builds_with_defaults() {
        let fetcher = PageFetcher::new(&FetchConfig::default());
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_connection_error_is_a_fetch_error() {
        let fetcher = PageFetcher::new(&FetchConfig {
            timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(500),
            ..FetchConfig::default()
        })
        .unwrap();

        // Nothing listens on this port
        let result = fetcher.fetch_text("http://127.0.0.1:9/page").await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
