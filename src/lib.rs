//! Sitewalk: a worker-pool site crawler
//!
//! This crate crawls a single website with a fixed pool of OS threads. Workers
//! share one deduplicated frontier of page paths and agree on termination when
//! every one of them runs out of work at the same time.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pool;
pub mod url;

use thiserror::Error;

/// Main error type for Sitewalk operations
#[derive(Debug, Error)]
pub enum SitewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Errors returned by a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL has no recognizable `scheme://domain` prefix
    #[error("invalid url: {url}")]
    InvalidUrl { url: String },

    /// A worker thread could not be launched; the pool was wound down
    #[error("thread creation system error: {source}")]
    ThreadCreation {
        #[source]
        source: pool::PoolError,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Sitewalk operations
pub type Result<T> = std::result::Result<T, SitewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlSettings, Frontier, PagePath};
pub use output::{ContentHandler, FetchedPage};
pub use pool::{Operation, WorkerPool};
pub use url::{decompose, make_page_path, DeconstructedUrl};
