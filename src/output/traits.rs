//! Content handler trait and types
//!
//! This module defines the interface the crawler reports fetched pages to,
//! along with the error type for output operations.

use crate::crawler::PagePath;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One fetched page as reported to a [`ContentHandler`]
#[derive(Debug, Clone, Copy)]
pub struct FetchedPage<'a> {
    /// Absolute URL that was fetched
    pub url: &'a str,

    /// Domain of the crawl root, scheme included
    pub site_domain: &'a str,

    /// HTTP status returned by the page reader
    pub status: u16,

    /// Depth of the page; the seed is depth 1
    pub depth: u32,

    /// Same-site links found on the page
    pub child_paths: &'a [PagePath],

    /// Raw page body
    pub body: &'a str,
}

impl FetchedPage<'_> {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Receives crawl results
///
/// `process_page_content` is called once per fetched page, concurrently from
/// every worker, so implementations must synchronize internally.
/// `finish` is called exactly once, after all crawling activity has ended.
pub trait ContentHandler: Sync {
    /// Records one fetched page
    fn process_page_content(&self, page: &FetchedPage<'_>);

    /// Called once when the crawl is complete
    fn finish(&self);
}
