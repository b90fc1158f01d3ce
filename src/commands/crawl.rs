use anyhow::{Context, Result};
use harvest::{
    config::Config,
    crawl::{CrawlConfig, CrawlCoordinator},
    util::truncate_for_display,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Run one full crawl against the configured site and write the record set.
pub async fn run_crawl(
    mut config: Config,
    base_url: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(base_url) = base_url {
        config.crawl.base_url = base_url;
    }
    if let Some(output) = output {
        config.crawl.output_path = output;
    }
    config.validate()?;

    let started = Instant::now();
    info!("Starting crawl of {}", config.crawl.base_url);

    let coordinator = CrawlCoordinator::new(CrawlConfig::from_config(&config)?)?;
    let result = coordinator.run().await;

    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&config.crawl.output_path, json).with_context(|| {
        format!(
            "Failed to write output to {}",
            config.crawl.output_path.display()
        )
    })?;

    let stats = coordinator.stats().await;
    println!("\nCrawl complete!");
    println!("==================");
    println!("Site: {}", truncate_for_display(&config.crawl.base_url, 60));
    println!("URLs discovered: {}", stats.urls_discovered);
    println!("URLs in scope: {}", stats.urls_in_scope);
    println!("Pages with records: {}", stats.pages_crawled);
    println!("Pages failed: {}", stats.pages_failed);
    println!("Pages without content: {}", stats.pages_empty);
    println!("Fragments extracted: {}", stats.fragments_extracted);
    println!("Duplicates skipped: {}", stats.duplicates_skipped);

    info!(
        "Finished in {:.2}s; {} records written to {}",
        started.elapsed().as_secs_f64(),
        result.len(),
        config.crawl.output_path.display()
    );

    Ok(())
}
