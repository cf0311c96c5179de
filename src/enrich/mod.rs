//! Enrichment module
//!
//! Derives each category's fixed-name enriched file from its newest
//! snapshot plus a per-record reference value.

mod enricher;

pub use enricher::{enrich_all, enrich_snapshot};
