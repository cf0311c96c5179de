//! Snapshot writer and newest-file selection
//!
//! Snapshots are append-only artifacts: every crawl run creates a new file
//! named with the category and a second-resolution timestamp, and an existing
//! file is never overwritten. "Newest" is defined purely by filesystem
//! modification time among a category's snapshot files; the fixed-name
//! enriched file and the HTML backup subdirectory are not snapshots.

use crate::snapshot::record::BookRecord;
use crate::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Fixed name of the derived enriched file, one per category directory
pub const ENRICHED_FILE_NAME: &str = "books_with_country.json";

/// Writes a category's records to a new timestamped snapshot file
///
/// # Arguments
///
/// * `cat_dir` - The category directory (created if absent)
/// * `category_name` - The category label; lowercased into the file name
/// * `records` - Records in crawl order
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the newly created snapshot
/// * `Err(_)` - IO or serialization failure; also if the target file already
///   exists (two runs within the same second), since overwriting is refused
pub fn write_snapshot(
    cat_dir: &Path,
    category_name: &str,
    records: &[BookRecord],
) -> Result<PathBuf> {
    std::fs::create_dir_all(cat_dir)?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let file_name = format!("books_{}_{}.json", category_name.to_lowercase(), stamp);
    let path = cat_dir.join(file_name);

    let json = serde_json::to_string_pretty(records)?;

    // create_new enforces the never-overwrite invariant
    let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
    file.write_all(json.as_bytes())?;

    tracing::debug!("Wrote {} records to {}", records.len(), path.display());

    Ok(path)
}

/// Returns the snapshot file with the greatest modification time
///
/// Scans only the top-level `.json` files of the category directory,
/// skipping subdirectories and the fixed-name enriched file. `None` when no
/// snapshot exists yet.
pub fn newest_snapshot(cat_dir: &Path) -> Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in std::fs::read_dir(cat_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(ENRICHED_FILE_NAME) {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let is_newer = match &newest {
            Some((best, _)) => modified > *best,
            None => true,
        };
        if is_newer {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// Reads a snapshot file back into records
pub fn read_snapshot(path: &Path) -> Result<Vec<BookRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_records() -> Vec<BookRecord> {
        vec![BookRecord {
            title: "A Book".to_string(),
            price: Some("£10.00".to_string()),
            availability: "In stock".to_string(),
            product_page: "https://example.com/a.html".to_string(),
            star_rating: Some(3),
            publisher_country: None,
        }]
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let cat_dir = dir.path().join("mystery");

        let path = write_snapshot(&cat_dir, "Mystery", &sample_records()).unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("books_mystery_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let records = sample_records();

        let path = write_snapshot(dir.path(), "Mystery", &records).unwrap();
        let read_back = read_snapshot(&path).unwrap();

        assert_eq!(read_back, records);
    }

    #[test]
    fn test_newest_none_on_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(newest_snapshot(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_newest_picks_max_mtime() {
        let dir = tempdir().unwrap();

        for name in ["books_mystery_20240101-000000.json", "books_mystery_20240102-000000.json"] {
            std::fs::write(dir.path().join(name), "[]").unwrap();
            // Distinct modification times
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let newest = newest_snapshot(dir.path()).unwrap().unwrap();
        assert_eq!(
            newest.file_name().unwrap().to_str().unwrap(),
            "books_mystery_20240102-000000.json"
        );
    }

    #[test]
    fn test_newest_ignores_enriched_file_and_subdirs() {
        let dir = tempdir().unwrap();

        std::fs::write(dir.path().join("books_mystery_20240101-000000.json"), "[]").unwrap();
        std::fs::create_dir(dir.path().join("html_backup")).unwrap();
        std::fs::write(dir.path().join("html_backup").join("inner.json"), "[]").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        // Enriched file is newer but is not a snapshot
        std::fs::write(dir.path().join(ENRICHED_FILE_NAME), "[]").unwrap();

        let newest = newest_snapshot(dir.path()).unwrap().unwrap();
        assert_eq!(
            newest.file_name().unwrap().to_str().unwrap(),
            "books_mystery_20240101-000000.json"
        );
    }

    #[test]
    fn test_newest_ignores_non_json_files() {
        let dir = tempdir().unwrap();

        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert!(newest_snapshot(dir.path()).unwrap().is_none());
    }
}
