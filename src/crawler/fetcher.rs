//! HTTP fetcher implementation
//!
//! One client is built per pipeline run with the configured identification
//! header; every page is fetched with a single GET and no retries. A
//! non-success status is an error, never silently tolerated.

use crate::config::SiteConfig;
use crate::{BookdriftError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `site` - The catalog site configuration (supplies the User-Agent)
/// * `timeout_secs` - Default per-request timeout in seconds
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    site: &SiteConfig,
    timeout_secs: u64,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(site.user_agent.clone())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as text
///
/// A transport failure maps to [`BookdriftError::Transport`]; any non-success
/// HTTP status maps to [`BookdriftError::Fetch`]. Callers decide what a fetch
/// failure aborts (for the crawl: the whole category).
pub async fn fetch_html(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| BookdriftError::Transport {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BookdriftError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| BookdriftError::Transport {
            url: url.to_string(),
            source: e,
        })
}
