//! Pagination walker
//!
//! Walks a category's listing pages up to the configured page limit,
//! augments every tile with its detail-page availability, captures the raw
//! detail HTML under the category's backup directory, and returns the
//! assembled records in crawl order. Detail pages are fetched through a
//! bounded fan-out that preserves tile order, so the output is identical to
//! a sequential walk. Any fetch or parse failure aborts the whole category:
//! no partial snapshot is ever produced.

use crate::config::CrawlerConfig;
use crate::crawler::category::Category;
use crate::crawler::detail::parse_availability;
use crate::crawler::fetcher::fetch_html;
use crate::crawler::listing::{parse_listing, Tile};
use crate::snapshot::BookRecord;
use crate::{BookdriftError, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::path::Path;

/// Subdirectory of each category directory holding raw detail-page captures
pub const HTML_BACKUP_DIR: &str = "html_backup";

/// Backup file names are truncated to this many characters before ".html"
const MAX_SLUG_CHARS: usize = 80;

/// Crawls one category into an ordered record sequence
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `category` - The resolved category to walk
/// * `config` - Crawler behavior (page limit, detail fan-out)
/// * `cat_dir` - The category's output directory (created if absent)
///
/// # Returns
///
/// * `Ok(Vec<BookRecord>)` - Records in crawl order: page order, tile order
/// * `Err(_)` - First fetch or parse failure; the category yields nothing
pub async fn crawl_category(
    client: &Client,
    category: &Category,
    config: &CrawlerConfig,
    cat_dir: &Path,
) -> Result<Vec<BookRecord>> {
    let backup_dir = cat_dir.join(HTML_BACKUP_DIR);
    std::fs::create_dir_all(&backup_dir)?;

    let mut records = Vec::new();
    let mut page_url = category.url.clone();

    for page in 1..=config.max_pages {
        tracing::info!("Scraping {} category - page {}", category.name, page);

        let html = fetch_html(client, &page_url).await?;
        let listing = parse_listing(&html, &page_url);

        let details = fetch_details(client, listing.tiles, config.max_concurrent_details).await?;

        for (tile, detail_html, availability) in details {
            let backup_name = format!("{}.html", title_slug(&tile.title));
            std::fs::write(backup_dir.join(backup_name), &detail_html)?;

            records.push(BookRecord {
                title: tile.title,
                price: tile.price,
                availability,
                product_page: tile.detail_url.to_string(),
                star_rating: tile.star_rating,
                publisher_country: None,
            });
        }

        match listing.next_url {
            Some(next) => page_url = next,
            None => {
                tracing::debug!("No next link on page {}, stopping", page);
                break;
            }
        }
    }

    Ok(records)
}

/// Fetches every tile's detail page with a bounded fan-out
///
/// `buffered` polls at most `fan_out` fetches at once and yields results in
/// input order, so tile order survives the parallelism. The first error
/// short-circuits the stream.
async fn fetch_details(
    client: &Client,
    tiles: Vec<Tile>,
    fan_out: u32,
) -> Result<Vec<(Tile, String, String)>> {
    stream::iter(tiles)
        .map(|tile| {
            let client = client.clone();
            async move {
                let detail_html = fetch_html(&client, &tile.detail_url).await?;
                let availability = parse_availability(&detail_html, &tile.detail_url)?;
                Ok::<_, BookdriftError>((tile, detail_html, availability))
            }
        })
        .buffered(fan_out.max(1) as usize)
        .try_collect()
        .await
}

/// Filesystem-safe backup name for a title
///
/// Runs of characters outside `[A-Za-z0-9_-]` (and their unicode
/// alphanumeric equivalents) collapse to a single underscore; the result is
/// truncated to a bounded length to avoid path-length issues.
fn title_slug(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }

    slug.chars().take(MAX_SLUG_CHARS).collect()
}
