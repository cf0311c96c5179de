//! Category resolution from the site navigation menu
//!
//! The catalog root page carries a nested navigation list of category links.
//! Resolution performs an exact case-insensitive match of the link text
//! against the configured label and returns the first hit as an absolute URL.

use crate::crawler::fetcher::fetch_html;
use crate::{BookdriftError, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// A resolved catalog category
///
/// Created at resolution time and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Category {
    /// The configured label, as given
    pub name: String,

    /// Absolute URL of the category's first listing page
    pub url: Url,

    /// On-disk directory slug (lowercased, spaces to underscores)
    pub slug: String,
}

/// Derives the on-disk directory slug for a category label
pub fn category_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Resolves a category label to its listing URL via the site root page
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `root_url` - The catalog site root
/// * `name` - Category label, matched case-insensitively
///
/// # Returns
///
/// * `Ok(Category)` - The first matching navigation entry
/// * `Err(BookdriftError::CategoryNotFound)` - No menu entry matches
/// * `Err(_)` - The root fetch failed; the whole category crawl aborts
pub async fn resolve_category(client: &Client, root_url: &Url, name: &str) -> Result<Category> {
    let html = fetch_html(client, root_url).await?;

    let url = find_category_link(&html, root_url, name).ok_or_else(|| {
        BookdriftError::CategoryNotFound {
            category: name.to_string(),
        }
    })?;

    tracing::debug!("Resolved category '{}' to {}", name, url);

    Ok(Category {
        name: name.to_string(),
        url,
        slug: category_slug(name),
    })
}

/// Scans the navigation menu for the first link whose text matches the label
fn find_category_link(html: &str, root_url: &Url, name: &str) -> Option<Url> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("ul.nav-list ul li a").ok()?;
    let wanted = name.trim().to_lowercase();

    for element in document.select(&selector) {
        let label = element.text().collect::<String>();
        if label.trim().to_lowercase() == wanted {
            if let Some(href) = element.value().attr("href") {
                if let Ok(resolved) = root_url.join(href) {
                    return Some(resolved);
                }
            }
        }
    }

    None
}
