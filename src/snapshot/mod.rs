//! Snapshot module for persisted record batches
//!
//! This module handles:
//! - The persisted book record model and its JSON field names
//! - Writing immutable, timestamped snapshot files per category
//! - Selecting the newest snapshot in a category directory

mod record;
mod writer;

pub use record::BookRecord;
pub use writer::{newest_snapshot, read_snapshot, write_snapshot, ENRICHED_FILE_NAME};
