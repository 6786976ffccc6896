//! Crawl frontier: the registry of discovered page paths
//!
//! The frontier owns:
//! - The site's deconstructed root URL
//! - The set of every page key ever registered (deduplication)
//! - The FIFO of registered paths that no worker has popped yet
//!
//! A key is registered at most once for the lifetime of the frontier and is
//! queued exactly when its registration was new. All mutation happens under
//! one mutex that is never held during page I/O.

use crate::url::{is_path_descendant, make_page_path, DeconstructedUrl};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One crawlable location relative to the site root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagePath {
    /// Directory portion, e.g. `/install`
    pub path: String,

    /// Page portion, e.g. `index.html` (may be empty)
    pub page: String,

    /// Distance from the seed page, which has depth 1
    pub depth: u32,
}

impl PagePath {
    /// Creates a page path
    pub fn new(path: impl Into<String>, page: impl Into<String>, depth: u32) -> Self {
        Self {
            path: path.into(),
            page: page.into(),
            depth,
        }
    }

    /// Returns the normalized key used for deduplication
    pub fn key(&self) -> String {
        make_page_path(&self.path, &self.page)
    }
}

#[derive(Debug, Default)]
struct FrontierQueues {
    seen: HashSet<String>,
    pending: VecDeque<PagePath>,
}

/// Deduplicated work queue shared by every crawl worker
#[derive(Debug)]
pub struct Frontier {
    root: DeconstructedUrl,
    queues: Mutex<FrontierQueues>,
}

impl Frontier {
    /// Creates a frontier seeded with the root page at depth 1
    ///
    /// # Arguments
    ///
    /// * `root` - The decomposed seed URL; its domain anchors every fetch
    pub fn new(root: DeconstructedUrl) -> Self {
        let seed = PagePath::new(root.path.clone(), root.page.clone(), 1);
        let frontier = Self {
            root,
            queues: Mutex::new(FrontierQueues::default()),
        };
        frontier.merge_new_paths(std::slice::from_ref(&seed));
        frontier
    }

    /// Returns the site root this frontier was created from
    pub fn root(&self) -> &DeconstructedUrl {
        &self.root
    }

    /// Registers paths and queues the ones never seen before
    ///
    /// The check-insert-enqueue sequence for the whole batch runs under one
    /// lock, so two workers merging the same key cannot both queue it.
    ///
    /// # Returns
    ///
    /// The number of paths that were newly queued
    pub fn merge_new_paths(&self, paths: &[PagePath]) -> usize {
        let mut queues = self.lock();
        let mut added = 0;

        for path in paths {
            if queues.seen.insert(path.key()) {
                queues.pending.push_back(path.clone());
                added += 1;
            }
        }

        added
    }

    /// Removes and returns the oldest queued path
    pub fn pop_next(&self) -> Option<PagePath> {
        self.lock().pending.pop_front()
    }

    /// Returns the current queue length
    ///
    /// Other workers may change the queue right after this returns; the value
    /// is only a hint for waking idle workers.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Returns the number of distinct keys registered so far
    pub fn seen_count(&self) -> usize {
        self.lock().seen.len()
    }

    /// Checks whether a candidate link belongs under the crawl root
    ///
    /// # Arguments
    ///
    /// * `domain` - The candidate's domain; empty means same-site relative
    /// * `key` - The candidate's normalized `path` + `page`
    ///
    /// # Returns
    ///
    /// `true` if the domain is empty or matches the root's (ignoring ASCII
    /// case), and the key lies at or below the root path on a `/` boundary
    pub fn is_same_site_descendant(&self, domain: &str, key: &str) -> bool {
        let same_site = domain.is_empty() || domain.eq_ignore_ascii_case(&self.root.domain);
        same_site && is_path_descendant(&self.root.path, key)
    }

    /// Builds the absolute URL to fetch for a page path
    pub fn to_absolute_url(&self, page: &PagePath) -> String {
        format!("{}{}", self.root.domain, page.key())
    }

    // Queue state is never left half-updated, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, FrontierQueues> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
