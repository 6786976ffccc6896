//! Page fetching
//!
//! This module handles all page loads for the crawler:
//! - The [`PageReader`] interface the coordinator fetches through
//! - Building the blocking HTTP client from `[http]` configuration
//! - [`HttpPageReader`], which maps every failure to a status code
//!
//! A fetch never fails as far as the crawler is concerned. Transport errors
//! become non-2xx responses with an empty body.

use crate::config::HttpConfig;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::io::{self, Read};
use std::time::Duration;
use thiserror::Error;

/// Status reported when a request times out
pub const STATUS_TIMEOUT: u16 = 408;

/// Status reported for any other failed load
pub const STATUS_FAILED: u16 = 500;

/// The outcome of loading one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status, or a synthesized one for transport failures
    pub status: u16,

    /// Response body; empty for transport failures
    pub body: String,
}

impl PageResponse {
    /// Creates a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A failed load with no body
    pub fn failed(status: u16) -> Self {
        Self::new(status, String::new())
    }

    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Loads pages for the crawler
///
/// Called concurrently from every worker. Implementations must return in
/// bounded time and must not panic.
pub trait PageReader: Sync {
    /// Fetches an absolute URL
    fn fetch(&self, url: &str) -> PageResponse;
}

/// Errors raised while reading a response body
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("failed to read body: {0}")]
    Io(#[from] io::Error),
}

impl BodyError {
    /// Maps the error to the status reported to the crawler
    pub fn status(&self) -> u16 {
        match self {
            BodyError::Io(e) if e.kind() == io::ErrorKind::TimedOut => STATUS_TIMEOUT,
            _ => STATUS_FAILED,
        }
    }
}

/// Builds a blocking HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The `[http]` configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitewalk::config::HttpConfig;
/// use sitewalk::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Reads at most `limit` bytes of body, failing if there are more
///
/// Invalid UTF-8 is replaced rather than rejected; link extraction only needs
/// the markup.
pub fn read_body<R: Read>(reader: R, limit: u64) -> Result<String, BodyError> {
    let mut buf = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut buf)?;

    if buf.len() as u64 > limit {
        return Err(BodyError::TooLarge { limit });
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// [`PageReader`] backed by a blocking `reqwest` client
///
/// The client is built once and shared by every worker.
#[derive(Debug, Clone)]
pub struct HttpPageReader {
    client: Client,
    max_body_bytes: u64,
}

impl HttpPageReader {
    /// Creates a reader from `[http]` configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

impl PageReader for HttpPageReader {
    fn fetch(&self, url: &str) -> PageResponse {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => {
                let status = if e.is_timeout() {
                    STATUS_TIMEOUT
                } else {
                    STATUS_FAILED
                };
                tracing::warn!("Failed to fetch {}: {} (reporting {})", url, e, status);
                return PageResponse::failed(status);
            }
        };

        let status = response.status().as_u16();
        match read_body(response, self.max_body_bytes) {
            Ok(body) => {
                tracing::debug!("Fetched {} -> {} ({} bytes)", url, status, body.len());
                PageResponse::new(status, body)
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", url, e);
                PageResponse::failed(e.status())
            }
        }
    }
}
