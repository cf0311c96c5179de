//! Integration tests for the reference cache and enrichment step
//!
//! These tests use wiremock to mock the reference-data endpoint and temp
//! directories for cache and snapshot files.

use bookdrift::config::{ReferenceConfig, SiteConfig};
use bookdrift::crawler::build_http_client;
use bookdrift::enrich::enrich_all;
use bookdrift::reference::{CacheState, MissReason, ReferenceCache, CACHE_TTL};
use bookdrift::snapshot::{read_snapshot, write_snapshot, BookRecord, ENRICHED_FILE_NAME};
use bookdrift::BookdriftError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> reqwest::Client {
    let site = SiteConfig {
        root_url: "http://localhost/".to_string(),
        user_agent: "TestBot/1.0".to_string(),
    };
    build_http_client(&site, 5).expect("Failed to build client")
}

fn reference_config(server_uri: &str, cache_path: &Path) -> ReferenceConfig {
    ReferenceConfig {
        source_url: format!("{}/countries", server_uri),
        cache_path: cache_path.to_str().unwrap().to_string(),
        fetch_timeout_secs: 5,
    }
}

fn write_cache_payload(cache_path: &Path, cached_at: f64, countries: &[&str]) {
    let payload = serde_json::json!({
        "cached_at": cached_at,
        "countries": countries,
    });
    std::fs::write(cache_path, serde_json::to_string_pretty(&payload).unwrap()).unwrap();
}

fn now_unix_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

fn sample_records(count: usize) -> Vec<BookRecord> {
    (0..count)
        .map(|i| BookRecord {
            title: format!("Book {}", i),
            price: Some(format!("£{}.00", i)),
            availability: "In stock".to_string(),
            product_page: format!("https://example.com/{}.html", i),
            star_rating: Some((i % 5 + 1) as u8),
            publisher_country: None,
        })
        .collect()
}

#[tokio::test]
async fn test_fresh_cache_avoids_the_network() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    // Cached list is deliberately unsorted: a hit must return it unchanged
    write_cache_payload(&cache_path, now_unix_seconds(), &["Zimbabwe", "Albania"]);

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0) // A fresh cache must never trigger a fetch
        .mount(&mock_server)
        .await;

    let cache = ReferenceCache::new(&reference_config(&mock_server.uri(), &cache_path));
    let countries = cache.get(&test_client()).await.expect("Cache get failed");

    assert_eq!(countries, vec!["Zimbabwe".to_string(), "Albania".to_string()]);
}

#[tokio::test]
async fn test_stale_cache_triggers_refetch_and_normalization() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    let stale = now_unix_seconds() - CACHE_TTL.as_secs_f64() - 60.0;
    write_cache_payload(&cache_path, stale, &["Old Entry"]);

    // Unsorted, with a duplicate, a plain-string name, and an unusable entry
    let body = serde_json::json!([
        {"name": {"common": "Peru", "official": "Republic of Peru"}},
        {"name": {"common": "France", "official": "French Republic"}},
        {"name": {"common": "France"}},
        {"name": "Albania"},
        {"name": {"official": "Kingdom of Norway"}},
        {}
    ]);
    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = ReferenceCache::new(&reference_config(&mock_server.uri(), &cache_path));
    let countries = cache.get(&test_client()).await.expect("Cache get failed");

    // Deduplicated and sorted, common preferred over official
    assert_eq!(
        countries,
        vec![
            "Albania".to_string(),
            "France".to_string(),
            "Kingdom of Norway".to_string(),
            "Peru".to_string(),
        ]
    );

    // The rewritten cache is fresh and already normalized
    assert_eq!(cache.read_cached(), CacheState::Fresh(countries));
}

#[tokio::test]
async fn test_missing_timestamp_is_a_miss_even_when_recent() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    // Freshly written file, but no cached_at field
    let payload = serde_json::json!({ "countries": ["France"] });
    std::fs::write(&cache_path, serde_json::to_string(&payload).unwrap()).unwrap();

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "Peru"}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = ReferenceCache::new(&reference_config(&mock_server.uri(), &cache_path));
    assert_eq!(
        cache.read_cached(),
        CacheState::Miss(MissReason::MissingTimestamp)
    );

    let countries = cache.get(&test_client()).await.expect("Cache get failed");
    assert_eq!(countries, vec!["Peru".to_string()]);
}

#[tokio::test]
async fn test_empty_fetch_with_unusable_cache_is_source_unavailable() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    let stale = now_unix_seconds() - CACHE_TTL.as_secs_f64() - 60.0;
    write_cache_payload(&cache_path, stale, &["Old Entry"]);

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let cache = ReferenceCache::new(&reference_config(&mock_server.uri(), &cache_path));
    let result = cache.get(&test_client()).await;

    assert!(matches!(result, Err(BookdriftError::SourceUnavailable)));
}

#[tokio::test]
async fn test_fetch_http_error_propagates() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let cache = ReferenceCache::new(&reference_config(&mock_server.uri(), &cache_path));
    let result = cache.get(&test_client()).await;

    assert!(matches!(
        result,
        Err(BookdriftError::Fetch { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_cache_miss_then_enrich_all_categories() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let data_dir = dir.path().join("books_output");

    // Two categories with snapshots, one without
    let mystery = data_dir.join("mystery");
    let health = data_dir.join("health");
    let empty = data_dir.join("travel");
    std::fs::create_dir_all(&empty).unwrap();
    write_snapshot(&mystery, "Mystery", &sample_records(25)).unwrap();
    write_snapshot(&health, "Health", &sample_records(3)).unwrap();

    let body = serde_json::json!([
        {"name": "Chile"}, {"name": "France"}, {"name": "Japan"},
        {"name": "Kenya"}, {"name": "Peru"}
    ]);
    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = ReferenceCache::new(&reference_config(&mock_server.uri(), &cache_path));
    let countries = cache.get(&test_client()).await.expect("Cache get failed");
    assert_eq!(countries.len(), 5);

    let mut rng = StdRng::seed_from_u64(11);
    let enriched = enrich_all(&data_dir, &countries, &mut rng).expect("Enrichment failed");
    assert_eq!(enriched, 2);

    let enriched_records = read_snapshot(&mystery.join(ENRICHED_FILE_NAME)).unwrap();
    assert_eq!(enriched_records.len(), 25);
    for record in &enriched_records {
        let country = record.publisher_country.as_deref().expect("Missing country");
        assert!(countries.iter().any(|name| name == country));
    }

    // The category without a snapshot got no enriched file
    assert!(!empty.join(ENRICHED_FILE_NAME).exists());
}
