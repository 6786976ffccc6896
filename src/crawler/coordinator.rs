//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator runs one [`CrawlSession`] per crawl on the worker pool.
//! Every worker repeatedly pops a page from the shared frontier, fetches it,
//! merges its same-site links back into the frontier and reports the page to
//! the content handler.
//!
//! # Termination
//!
//! A worker that finds the frontier empty counts itself as waiting and parks
//! on the wake signal. The crawl is over when every worker is waiting at once:
//! the last one to arrive releases the wake signal, and each worker it wakes
//! releases it again on its way out. A worker that pops a page while others
//! are parked and more work is queued releases the signal once so an idle
//! worker can pick up the rest.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageReader;
use crate::crawler::frontier::{Frontier, PagePath};
use crate::crawler::parser::extract_child_paths;
use crate::output::{ContentHandler, FetchedPage};
use crate::pool::{Launcher, Operation, OsThreads, Semaphore, WorkerPool};
use crate::url::decompose;
use crate::CrawlError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Parameters for one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Number of worker threads
    pub workers: usize,

    /// Deepest page whose links are merged into the frontier; `None` means
    /// unbounded
    pub max_depth: Option<u32>,
}

impl CrawlSettings {
    /// Creates settings for `workers` threads with no depth limit
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            max_depth: None,
        }
    }

    /// Sets the depth limit
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Returns true if links found on a page at `depth` should be followed
    pub fn follows_links_from(&self, depth: u32) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            workers: config.workers,
            max_depth: config.max_depth,
        }
    }
}

/// Main crawler coordinator structure
///
/// Holds the page reader and pool configuration. Each call to
/// [`Coordinator::crawl`] builds a fresh frontier and session, so a
/// coordinator can run any number of crawls one after another.
#[derive(Debug)]
pub struct Coordinator<R, L = OsThreads> {
    reader: R,
    settings: CrawlSettings,
    pool: WorkerPool<L>,
}

impl<R: PageReader> Coordinator<R> {
    /// Creates a coordinator running on named OS threads (`crawl-<n>`)
    pub fn new(reader: R, settings: CrawlSettings) -> Self {
        Self::with_pool(reader, settings, WorkerPool::with_launcher(OsThreads::new("crawl")))
    }
}

impl<R: PageReader, L: Launcher> Coordinator<R, L> {
    /// Creates a coordinator running on a caller-supplied pool
    pub fn with_pool(reader: R, settings: CrawlSettings, pool: WorkerPool<L>) -> Self {
        Self {
            reader,
            settings,
            pool,
        }
    }

    /// Returns the crawl settings
    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Returns the page reader
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Crawls every page under `seed_url` reachable through same-site links
    ///
    /// # Arguments
    ///
    /// * `seed_url` - Absolute URL of the first page; its domain and path
    ///   bound the crawl
    /// * `handler` - Receives every fetched page, then `finish` once
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The crawl ran to completion and `handler.finish()` was
    ///   called
    /// * `Err(CrawlError::InvalidUrl)` - The seed has no recognizable domain;
    ///   nothing was started and the handler was not touched
    /// * `Err(CrawlError::ThreadCreation)` - A worker could not be launched;
    ///   the started workers were wound down and `finish` was not called
    pub fn crawl<H: ContentHandler>(&self, seed_url: &str, handler: &H) -> Result<(), CrawlError> {
        let root = decompose(seed_url, false);
        if root.domain.is_empty() {
            tracing::error!("Seed URL {} has no recognizable domain", seed_url);
            return Err(CrawlError::InvalidUrl {
                url: seed_url.to_string(),
            });
        }

        let workers = self.settings.workers.max(1);
        tracing::info!(
            "Starting crawl of {}{} with {} workers",
            root.domain,
            root.page_key(),
            workers
        );

        let session = CrawlSession::new(
            Frontier::new(root),
            &self.reader,
            handler,
            self.settings,
            workers,
        );

        if let Err(source) = self.pool.run(&session, workers) {
            tracing::error!("Crawl of {} aborted: {}", seed_url, source);
            return Err(CrawlError::ThreadCreation { source });
        }

        tracing::info!(
            "Crawl of {} complete: {} distinct pages registered",
            seed_url,
            session.frontier.seen_count()
        );
        handler.finish();
        Ok(())
    }
}

/// Per-crawl shared state; every worker runs [`CrawlSession::process_next`]
struct CrawlSession<'a, R, H> {
    frontier: Frontier,
    reader: &'a R,
    handler: &'a H,
    settings: CrawlSettings,
    max_threads: usize,
    waiting: AtomicUsize,
    wake: Semaphore,
    aborted: AtomicBool,
}

impl<'a, R: PageReader, H: ContentHandler> CrawlSession<'a, R, H> {
    fn new(
        frontier: Frontier,
        reader: &'a R,
        handler: &'a H,
        settings: CrawlSettings,
        max_threads: usize,
    ) -> Self {
        Self {
            frontier,
            reader,
            handler,
            settings,
            max_threads,
            waiting: AtomicUsize::new(0),
            wake: Semaphore::new(0),
            aborted: AtomicBool::new(false),
        }
    }

    /// Runs one step; returns false once the calling worker should exit
    fn process_next(&self) -> bool {
        if let Some(page) = self.frontier.pop_next() {
            if self.frontier.pending_count() > 0 && self.waiting.load(Ordering::SeqCst) > 0 {
                self.wake.release();
            }
            self.process_page(&page);
            return true;
        }

        let mut done = self.is_aborted()
            || self.waiting.fetch_add(1, Ordering::SeqCst) + 1 >= self.max_threads;

        if !done {
            self.wake.acquire();
            done = self.is_aborted() || self.waiting.load(Ordering::SeqCst) >= self.max_threads;
        }

        if done {
            // Pass the wake-up on so every parked worker sees the end
            self.wake.release();
        } else {
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }

        !done
    }

    fn process_page(&self, page: &PagePath) {
        let url = self.frontier.to_absolute_url(page);
        let response = self.reader.fetch(&url);

        let children = if response.is_success() {
            extract_child_paths(&response.body, page, &self.frontier)
        } else {
            tracing::debug!("{} returned {}; not following links", url, response.status);
            Vec::new()
        };

        if self.settings.follows_links_from(page.depth) {
            let added = self.frontier.merge_new_paths(&children);
            tracing::debug!(
                "{} (depth {}): {} links, {} new",
                url,
                page.depth,
                children.len(),
                added
            );
        } else {
            tracing::debug!("{} is at depth {}; links not followed", url, page.depth);
        }

        self.handler.process_page_content(&FetchedPage {
            url: &url,
            site_domain: &self.frontier.root().domain,
            status: response.status,
            depth: page.depth,
            child_paths: &children,
            body: &response.body,
        });
    }

    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

impl<R: PageReader, H: ContentHandler> Operation for CrawlSession<'_, R, H> {
    fn run(&self) -> bool {
        self.process_next()
    }

    fn stop(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.wake.release();
    }
}
