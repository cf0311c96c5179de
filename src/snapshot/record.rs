//! Persisted book record model

use serde::{Deserialize, Serialize};

/// One persisted book record
///
/// Serialized as a flat JSON object with the historical capitalized keys;
/// lowercase spellings are accepted on read for older files. A record is
/// immutable once written to a snapshot. `publisher_country` is absent until
/// enrichment attaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "Title", alias = "title")]
    pub title: String,

    #[serde(
        rename = "Price",
        alias = "price",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,

    #[serde(rename = "Availability", alias = "availability")]
    pub availability: String,

    #[serde(rename = "Product Page Link", alias = "product_page_link")]
    pub product_page: String,

    #[serde(
        rename = "Star Rating",
        alias = "star_rating",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub star_rating: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_country: Option<String>,
}
