use serde::Deserialize;

/// Main configuration structure for Sitewalk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Deepest page whose links are still followed (seed is depth 1)
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_depth: None,
        }
    }
}

/// Page reader configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total time allowed for one page load (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Time allowed to establish a connection (milliseconds)
    #[serde(rename = "connect-timeout-ms", default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Maximum number of redirects followed per page
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Largest body accepted; larger pages count as failed fetches
    #[serde(rename = "max-body-bytes", default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the markdown summary written after the crawl
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

fn default_workers() -> usize {
    4
}

fn default_user_agent() -> String {
    format!("sitewalk/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_connect_timeout_ms() -> u64 {
    4_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_body_bytes() -> u64 {
    10 * 1024 * 1024
}
