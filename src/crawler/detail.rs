//! Detail-page parser
//!
//! A detail page is expected to carry exactly one in-stock availability
//! element. Its absence is a hard parse error that aborts the category run;
//! availability is never defaulted.

use crate::{BookdriftError, Result};
use scraper::{Html, Selector};
use url::Url;

/// Extracts the availability text from a detail page
///
/// # Arguments
///
/// * `html` - Raw HTML of the detail page
/// * `url` - The page URL, used for error reporting only
///
/// # Returns
///
/// * `Ok(String)` - Trimmed availability text
/// * `Err(BookdriftError::Parse)` - The expected element is missing
pub fn parse_availability(html: &str, url: &Url) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p.instock.availability").map_err(|_| BookdriftError::Parse {
        url: url.to_string(),
        message: "invalid availability selector".to_string(),
    })?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .ok_or_else(|| BookdriftError::Parse {
            url: url.to_string(),
            message: "missing p.instock.availability element".to_string(),
        })
}
