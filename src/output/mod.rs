//! Output module for crawl results and reports
//!
//! This module handles:
//! - The [`ContentHandler`] interface the crawler reports pages to
//! - Recording crawl statistics
//! - Generating markdown summaries of crawl results

mod markdown;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics, StatsCollector};
pub use traits::{ContentHandler, FetchedPage, OutputError, OutputResult};
