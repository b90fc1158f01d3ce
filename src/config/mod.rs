//! Configuration for the harvest crawler

mod crawl;
mod logging;

pub use crawl::{CrawlConfig, ExtractionConfig};
pub use logging::{LogLevel, LoggingConfig};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default user agent for all HTTP requests
pub const DEFAULT_USER_AGENT: &str = "HarvestBot/0.1 (+https://github.com/harvest)";

/// Main configuration, loaded from a TOML file or defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Crawl configuration
    #[serde(default)]
    pub crawl: CrawlConfig,
    /// Content extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass rather than playing whack-a-mole.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        match url::Url::parse(&self.crawl.base_url) {
            Ok(parsed) if parsed.host_str().is_none() => {
                errors.push(format!("base_url '{}' has no host", self.crawl.base_url));
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(format!("base_url '{}' is invalid: {}", self.crawl.base_url, e));
            }
        }

        if self.crawl.max_concurrent_fetches == 0 {
            errors.push("max_concurrent_fetches must be positive".to_string());
        }
        if self.crawl.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if self.crawl.max_sitemaps == 0 {
            errors.push("max_sitemaps must be positive".to_string());
        }

        if self.extraction.content_selector.trim().is_empty() {
            errors.push("content_selector must not be empty".to_string());
        }
        if self.extraction.target_tags.is_empty() {
            errors.push("target_tags must not be empty".to_string());
        }
        if self.extraction.keyword_top_n == 0 {
            errors.push("keyword_top_n must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "))
        }
    }

    /// Render the default configuration as a TOML document (for `init`).
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Config::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_toml_round_trips() {
        let rendered = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.crawl.max_concurrent_fetches, 40);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[crawl]
base_url = "https://example.com/"
"#,
        )
        .unwrap();
        assert_eq!(parsed.crawl.base_url, "https://example.com/");
        assert_eq!(parsed.crawl.request_timeout_secs, 10);
        assert_eq!(parsed.extraction.keyword_top_n, 5);
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = Config::default();
        config.crawl.base_url = "not a url".to_string();
        config.crawl.max_concurrent_fetches = 0;
        config.extraction.target_tags.clear();

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("max_concurrent_fetches"));
        assert!(message.contains("target_tags"));
    }
}
