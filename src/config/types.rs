use serde::Deserialize;

/// Main configuration structure for Bookdrift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    pub reference: ReferenceConfig,
    /// Category labels to crawl, matched case-insensitively against the
    /// site's navigation menu
    pub categories: Vec<String>,
}

/// Catalog site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the catalog site
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of listing pages to walk per category
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Fan-out for concurrent detail-page fetches within one listing page
    #[serde(rename = "max-concurrent-details")]
    pub max_concurrent_details: u32,

    /// Default per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory holding one subdirectory per category
    #[serde(rename = "data-dir")]
    pub data_dir: String,
}

/// Reference-data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    /// Endpoint returning the reference list (minimal field projection)
    #[serde(rename = "source-url")]
    pub source_url: String,

    /// Path of the persisted reference cache file
    #[serde(rename = "cache-path")]
    pub cache_path: String,

    /// Per-request timeout for the reference fetch, in seconds
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,
}
