//! Crawler module for site traversal
//!
//! This module contains the core crawling logic, including:
//! - The deduplicated frontier of page paths
//! - Page fetching over HTTP
//! - HTML link extraction
//! - Worker coordination and termination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlSettings};
pub use fetcher::{
    build_http_client, read_body, BodyError, HttpPageReader, PageReader, PageResponse,
    STATUS_FAILED, STATUS_TIMEOUT,
};
pub use frontier::{Frontier, PagePath};
pub use parser::extract_child_paths;

use crate::config::Config;
use crate::output::{generate_markdown_summary, CrawlStatistics, StatsCollector};
use crate::SitewalkError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for crawling a site. It will:
/// 1. Build the HTTP page reader
/// 2. Crawl every page under `seed_url` with the configured workers
/// 3. Write the markdown summary if `[output] summary-path` is set
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed_url` - Absolute URL of the first page
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed successfully
/// * `Err(SitewalkError)` - Crawl failed
pub fn crawl_site(config: &Config, seed_url: &str) -> Result<CrawlStatistics, SitewalkError> {
    let reader = HttpPageReader::new(&config.http)?;
    let coordinator = Coordinator::new(reader, CrawlSettings::from(&config.crawler));
    let collector = StatsCollector::new();

    coordinator.crawl(seed_url, &collector)?;
    let stats = collector.snapshot();

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&stats, Path::new(path))?;
    }

    Ok(stats)
}
