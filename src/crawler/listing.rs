//! Listing-page parser
//!
//! Pure transformation of one listing page's HTML into tile records and the
//! optional "next page" link. Missing optional elements (price, star rating)
//! are omitted rather than treated as failures; a tile without a usable
//! title or detail link is dropped entirely.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A single listing-page entry before detail-page augmentation
///
/// Lifetime: one page-parse call.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Book title from the anchor's title attribute (never empty)
    pub title: String,

    /// Detail link resolved against the listing page URL
    pub detail_url: Url,

    /// Price text verbatim, not parsed to a number
    pub price: Option<String>,

    /// Star rating mapped from the rating CSS class word
    pub star_rating: Option<u8>,
}

/// Parse result for one listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Tiles in document order
    pub tiles: Vec<Tile>,

    /// Absolute URL of the next listing page, if a pagination control exists
    pub next_url: Option<Url>,
}

/// Parses one listing page into tiles and the optional next-page link
///
/// # Arguments
///
/// * `html` - Raw HTML of the listing page
/// * `page_url` - URL the page was fetched from, for resolving relative links
pub fn parse_listing(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    ListingPage {
        tiles: extract_tiles(&document, page_url),
        next_url: extract_next_link(&document, page_url),
    }
}

/// Extracts all product tiles in document order
fn extract_tiles(document: &Html, page_url: &Url) -> Vec<Tile> {
    let mut tiles = Vec::new();

    if let Ok(pod_selector) = Selector::parse("article.product_pod") {
        for pod in document.select(&pod_selector) {
            if let Some(tile) = extract_tile(&pod, page_url) {
                tiles.push(tile);
            }
        }
    }

    tiles
}

/// Extracts one tile; None drops the tile (no title, no resolvable link)
fn extract_tile(pod: &ElementRef, page_url: &Url) -> Option<Tile> {
    let link_selector = Selector::parse("h3 a").ok()?;
    let link = pod.select(&link_selector).next()?;

    let title = link.value().attr("title")?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    let href = link.value().attr("href")?;
    let detail_url = page_url.join(href).ok()?;

    Some(Tile {
        title,
        detail_url,
        price: extract_price(pod),
        star_rating: extract_star_rating(pod),
    })
}

/// Price text verbatim; None when the element is absent or empty
fn extract_price(pod: &ElementRef) -> Option<String> {
    let selector = Selector::parse("p.price_color").ok()?;

    pod.select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Maps the rating element's class list through the fixed word table
fn extract_star_rating(pod: &ElementRef) -> Option<u8> {
    let selector = Selector::parse("p.star-rating").ok()?;
    let element = pod.select(&selector).next()?;

    element.value().classes().find_map(star_rating_from_word)
}

/// The fixed rating-word table
///
/// Any word outside the table is "no rating", never zero.
pub fn star_rating_from_word(word: &str) -> Option<u8> {
    match word {
        "One" => Some(1),
        "Two" => Some(2),
        "Three" => Some(3),
        "Four" => Some(4),
        "Five" => Some(5),
        _ => None,
    }
}

/// Extracts the "next page" link if a pagination control is present
fn extract_next_link(document: &Html, page_url: &Url) -> Option<Url> {
    let selector = Selector::parse("li.next a").ok()?;
    let element = document.select(&selector).next()?;
    let href = element.value().attr("href")?;

    page_url.join(href).ok()
}
