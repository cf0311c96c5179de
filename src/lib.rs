//! Bookdrift: a bookshop catalog snapshot pipeline
//!
//! This crate crawls a paginated catalog website category by category,
//! extracts structured book records, persists immutable timestamped snapshots,
//! and enriches the newest snapshot per category with a reference attribute
//! drawn from a TTL-cached external list.

pub mod config;
pub mod crawler;
pub mod enrich;
pub mod reference;
pub mod snapshot;

use thiserror::Error;

/// Main error type for Bookdrift operations
#[derive(Debug, Error)]
pub enum BookdriftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP {status} fetching {url}")]
    Fetch { url: String, status: u16 },

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Category '{category}' not found in the navigation menu")]
    CategoryNotFound { category: String },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Reference data source unavailable: fetch yielded no usable names")]
    SourceUnavailable,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Bookdrift operations
pub type Result<T> = std::result::Result<T, BookdriftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Category, Tile};
pub use snapshot::BookRecord;
