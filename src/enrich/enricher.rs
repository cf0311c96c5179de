//! Snapshot enricher
//!
//! For every category directory the newest snapshot is loaded, each record
//! gets one reference value drawn independently and uniformly at random, and
//! the result is written to the fixed enriched file name — the one place
//! in-place overwriting is intentional. The snapshot itself is never
//! touched. The RNG is a caller-supplied parameter so tests can seed it.

use crate::snapshot::{newest_snapshot, read_snapshot, ENRICHED_FILE_NAME};
use crate::{BookdriftError, Result};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Enriches the newest snapshot of every category under the data directory
///
/// Categories without any snapshot are skipped. Returns the number of
/// enriched files written.
pub fn enrich_all<R: Rng>(data_dir: &Path, countries: &[String], rng: &mut R) -> Result<usize> {
    let mut enriched = 0;

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let cat_dir = entry.path();
        match newest_snapshot(&cat_dir)? {
            Some(snapshot) => {
                let out = enrich_snapshot(&snapshot, countries, rng)?;
                tracing::info!("Enriched {} -> {}", snapshot.display(), out.display());
                enriched += 1;
            }
            None => {
                tracing::debug!("No snapshot in {}, skipping", cat_dir.display());
            }
        }
    }

    Ok(enriched)
}

/// Attaches a reference value to every record of one snapshot
///
/// # Arguments
///
/// * `path` - The snapshot file to enrich
/// * `countries` - Non-empty pool of reference values
/// * `rng` - Random source; each record draws independently
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the enriched file, overwritten if it existed
/// * `Err(BookdriftError::SourceUnavailable)` - The pool is empty
pub fn enrich_snapshot<R: Rng>(
    path: &Path,
    countries: &[String],
    rng: &mut R,
) -> Result<PathBuf> {
    if countries.is_empty() {
        return Err(BookdriftError::SourceUnavailable);
    }

    let mut records = read_snapshot(path)?;
    for record in &mut records {
        let pick = &countries[rng.gen_range(0..countries.len())];
        record.publisher_country = Some(pick.clone());
    }

    let out_path = match path.parent() {
        Some(dir) => dir.join(ENRICHED_FILE_NAME),
        None => PathBuf::from(ENRICHED_FILE_NAME),
    };
    std::fs::write(&out_path, serde_json::to_string_pretty(&records)?)?;

    Ok(out_path)
}
