//! Crawl statistics
//!
//! [`StatsCollector`] is a [`ContentHandler`] that tallies every fetched page
//! so the CLI can print and export a summary when the crawl finishes.

use crate::output::{ContentHandler, FetchedPage};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Domain of the crawled site
    pub site: String,

    /// Total number of pages fetched
    pub pages_fetched: u64,

    /// Pages answered with a 2xx status
    pub pages_succeeded: u64,

    /// Pages answered with any other status
    pub pages_failed: u64,

    /// Count of pages by HTTP status
    pub pages_by_status: BTreeMap<u16, u64>,

    /// Count of pages by depth
    pub pages_by_depth: BTreeMap<u32, u64>,

    /// Same-site links found across all pages (before deduplication)
    pub links_discovered: u64,

    /// Total body bytes received
    pub bytes_fetched: u64,

    /// URLs that did not return 2xx, with their status
    pub failed_urls: Vec<(String, u16)>,

    /// When the collector was created
    pub started_at: DateTime<Utc>,

    /// When the crawl reported completion
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            site: String::new(),
            pages_fetched: 0,
            pages_succeeded: 0,
            pages_failed: 0,
            pages_by_status: BTreeMap::new(),
            pages_by_depth: BTreeMap::new(),
            links_discovered: 0,
            bytes_fetched: 0,
            failed_urls: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Adds one fetched page to the tallies
    pub fn record(&mut self, page: &FetchedPage<'_>) {
        if self.site.is_empty() {
            self.site = page.site_domain.to_string();
        }

        self.pages_fetched += 1;
        if page.is_success() {
            self.pages_succeeded += 1;
        } else {
            self.pages_failed += 1;
            self.failed_urls.push((page.url.to_string(), page.status));
        }

        *self.pages_by_status.entry(page.status).or_insert(0) += 1;
        *self.pages_by_depth.entry(page.depth).or_insert(0) += 1;
        self.links_discovered += page.child_paths.len() as u64;
        self.bytes_fetched += page.body.len() as u64;
    }

    /// Returns the deepest depth any page was fetched at
    pub fn max_depth_reached(&self) -> u32 {
        self.pages_by_depth.keys().next_back().copied().unwrap_or(0)
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            return 0.0;
        }
        (self.pages_succeeded as f64 / self.pages_fetched as f64) * 100.0
    }

    /// Returns the crawl duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe [`ContentHandler`] accumulating [`CrawlStatistics`]
#[derive(Debug, Default)]
pub struct StatsCollector {
    stats: Mutex<CrawlStatistics>,
    finished: AtomicBool,
}

impl StatsCollector {
    /// Creates an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the statistics gathered so far
    pub fn snapshot(&self) -> CrawlStatistics {
        self.lock().clone()
    }

    /// Returns true once the crawler has called `finish`
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, CrawlStatistics> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentHandler for StatsCollector {
    fn process_page_content(&self, page: &FetchedPage<'_>) {
        tracing::debug!(
            "Processed {} (HTTP {}, depth {}, {} bytes, {} links)",
            page.url,
            page.status,
            page.depth,
            page.body.len(),
            page.child_paths.len()
        );
        self.lock().record(page);
    }

    fn finish(&self) {
        let mut stats = self.lock();
        stats.finished_at = Some(Utc::now());
        self.finished.store(true, Ordering::SeqCst);

        tracing::info!(
            "Crawl of {} finished: {} pages ({} ok, {} failed) in {:.2}s",
            stats.site,
            stats.pages_fetched,
            stats.pages_succeeded,
            stats.pages_failed,
            stats.duration_seconds().unwrap_or_default()
        );
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Sitewalk Crawl Statistics ===\n");

    println!("Site: {}", stats.site);
    if let Some(seconds) = stats.duration_seconds() {
        println!("Duration: {:.2}s", seconds);
    }

    println!("\nPages:");
    println!("  Fetched:   {}", stats.pages_fetched);
    println!(
        "  Succeeded: {} ({:.1}%)",
        stats.pages_succeeded,
        stats.success_rate()
    );
    println!("  Failed:    {}", stats.pages_failed);
    println!("  Links found: {}", stats.links_discovered);
    println!("  Bytes received: {}", stats.bytes_fetched);

    if !stats.pages_by_status.is_empty() {
        println!("\nBy HTTP status:");
        for (status, count) in &stats.pages_by_status {
            println!("  {}: {}", status, count);
        }
    }

    if !stats.pages_by_depth.is_empty() {
        println!("\nBy depth:");
        for (depth, count) in &stats.pages_by_depth {
            println!("  {}: {}", depth, count);
        }
    }

    if !stats.failed_urls.is_empty() {
        println!("\nFailed pages:");
        for (url, status) in &stats.failed_urls {
            println!("  [{}] {}", status, url);
        }
    }
}
