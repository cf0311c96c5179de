//! Crawler module for catalog fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP client construction and single-page fetching
//! - Category resolution from the site navigation menu
//! - Listing-page and detail-page parsing
//! - Pagination walking with a bounded detail-fetch fan-out

mod category;
mod detail;
mod fetcher;
mod listing;
mod walker;

pub use category::{resolve_category, Category};
pub use detail::parse_availability;
pub use fetcher::{build_http_client, fetch_html};
pub use listing::{parse_listing, ListingPage, Tile};
pub use walker::crawl_category;
