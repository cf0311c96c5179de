//! Time-boxed reference-data cache
//!
//! The cache file is a single JSON object `{cached_at, countries}`. A read
//! yields a tagged state: `Fresh` with the stored list, or `Miss` with the
//! reason (absent, unreadable, missing timestamp, stale, empty) — every miss
//! triggers the same refetch, but the reasons stay distinguishable in logs
//! and tests. The fetched list is deduplicated and sorted before it is
//! persisted, so a cache hit returns it unchanged.

use crate::config::ReferenceConfig;
use crate::{BookdriftError, Result};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Freshness window: entries older than this are refetched
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Why a cache read did not produce a usable list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// The cache file does not exist
    Absent,

    /// The file exists but could not be read or parsed
    Unreadable,

    /// The payload has no `cached_at` timestamp, regardless of file age
    MissingTimestamp,

    /// The entry's age reached the TTL
    Stale,

    /// The stored list is empty
    Empty,
}

/// Tagged result of a cache read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// A usable list, returned unchanged
    Fresh(Vec<String>),

    /// No usable list; the reason is logged and a refetch follows
    Miss(MissReason),
}

/// On-disk cache payload
#[derive(Debug, Serialize, Deserialize)]
struct CachePayload {
    /// Unix seconds at write time; absence always invalidates the entry
    cached_at: Option<f64>,

    #[serde(default)]
    countries: Vec<String>,
}

/// One entry of the reference endpoint's response
#[derive(Debug, Deserialize)]
struct CountryEntry {
    name: Option<CountryName>,
}

/// The name field is either a plain string or a structured object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountryName {
    Plain(String),
    Structured {
        common: Option<String>,
        official: Option<String>,
    },
}

impl CountryEntry {
    /// Display name per entry: prefer `common` over `official`, drop blanks
    fn display_name(self) -> Option<String> {
        match self.name? {
            CountryName::Plain(name) => non_blank(name),
            CountryName::Structured { common, official } => {
                common.and_then(non_blank).or_else(|| official.and_then(non_blank))
            }
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// TTL-bounded cache over the external reference list
pub struct ReferenceCache {
    path: PathBuf,
    source_url: String,
    fetch_timeout: Duration,
}

impl ReferenceCache {
    /// Creates a cache handle from the reference configuration
    pub fn new(config: &ReferenceConfig) -> Self {
        Self {
            path: PathBuf::from(&config.cache_path),
            source_url: config.source_url.clone(),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }

    /// Returns the reference list, from cache when fresh, else refetched
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Deduplicated, sorted reference names
    /// * `Err(BookdriftError::SourceUnavailable)` - A refetch was attempted
    ///   and yielded no usable names
    /// * `Err(_)` - The refetch itself failed (transport or HTTP status)
    pub async fn get(&self, client: &Client) -> Result<Vec<String>> {
        match self.read_cached() {
            CacheState::Fresh(countries) => {
                tracing::info!("Using cached reference list ({} names)", countries.len());
                Ok(countries)
            }
            CacheState::Miss(reason) => {
                tracing::debug!("Reference cache miss: {:?}", reason);
                self.refresh(client).await
            }
        }
    }

    /// Reads the cache file into a tagged state without touching the network
    pub fn read_cached(&self) -> CacheState {
        if !self.path.exists() {
            return CacheState::Miss(MissReason::Absent);
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return CacheState::Miss(MissReason::Unreadable),
        };

        let payload: CachePayload = match serde_json::from_str(&content) {
            Ok(payload) => payload,
            Err(_) => return CacheState::Miss(MissReason::Unreadable),
        };

        let cached_at = match payload.cached_at {
            Some(ts) => ts,
            None => return CacheState::Miss(MissReason::MissingTimestamp),
        };

        let age = now_unix_seconds() - cached_at;
        if age >= CACHE_TTL.as_secs_f64() {
            return CacheState::Miss(MissReason::Stale);
        }

        if payload.countries.is_empty() {
            return CacheState::Miss(MissReason::Empty);
        }

        CacheState::Fresh(payload.countries)
    }

    /// Fetches the reference list, normalizes it, and rewrites the cache
    async fn refresh(&self, client: &Client) -> Result<Vec<String>> {
        tracing::info!("Fetching reference list from {}", self.source_url);

        let response = client
            .get(&self.source_url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| BookdriftError::Transport {
                url: self.source_url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookdriftError::Fetch {
                url: self.source_url.clone(),
                status: status.as_u16(),
            });
        }

        let entries: Vec<CountryEntry> =
            response.json().await.map_err(|e| BookdriftError::Transport {
                url: self.source_url.clone(),
                source: e,
            })?;

        // Dedup and sort once, at write time
        let names: BTreeSet<String> = entries
            .into_iter()
            .filter_map(CountryEntry::display_name)
            .collect();

        if names.is_empty() {
            return Err(BookdriftError::SourceUnavailable);
        }

        let countries: Vec<String> = names.into_iter().collect();
        self.write_cache(&countries)?;

        tracing::info!("Cached {} reference names", countries.len());

        Ok(countries)
    }

    /// Rewrites the cache file with the current timestamp
    fn write_cache(&self, countries: &[String]) -> Result<()> {
        let payload = CachePayload {
            cached_at: Some(now_unix_seconds()),
            countries: countries.to_vec(),
        };

        std::fs::write(&self.path, serde_json::to_string_pretty(&payload)?)?;
        Ok(())
    }
}

fn now_unix_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
