//! Bookdrift main entry point
//!
//! This is the command-line interface for the Bookdrift snapshot pipeline.

use anyhow::Context;
use bookdrift::config::{load_config, Config};
use bookdrift::crawler::{build_http_client, crawl_category, resolve_category};
use bookdrift::enrich::enrich_all;
use bookdrift::reference::ReferenceCache;
use bookdrift::snapshot::write_snapshot;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Bookdrift: a bookshop catalog snapshot pipeline
///
/// Bookdrift crawls configured catalog categories into immutable timestamped
/// snapshots, then enriches each category's newest snapshot with a reference
/// attribute drawn from a TTL-cached external list.
#[derive(Parser, Debug)]
#[command(name = "bookdrift")]
#[command(version = "0.1.0")]
#[command(about = "A bookshop catalog snapshot pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long, conflicts_with_all = ["skip_enrich", "enrich_only"])]
    dry_run: bool,

    /// Crawl snapshots but skip the enrichment step
    #[arg(long, conflicts_with = "enrich_only")]
    skip_enrich: bool,

    /// Enrich the newest existing snapshots without crawling
    #[arg(long)]
    enrich_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let client = build_http_client(&config.site, config.crawler.request_timeout_secs)
        .context("failed to build HTTP client")?;

    let mut scraped = 0;
    if !cli.enrich_only {
        scraped = handle_scrape(&config, &client).await?;
        if scraped == 0 {
            anyhow::bail!("no category crawl succeeded");
        }
    }

    if cli.skip_enrich {
        tracing::info!("Skipping enrichment: {} categories scraped", scraped);
        return Ok(());
    }

    let enriched = handle_enrich(&config, &client).await?;
    tracing::info!(
        "Pipeline complete: {} categories scraped, {} enriched files written",
        scraped,
        enriched
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookdrift=info,warn"),
            1 => EnvFilter::new("bookdrift=debug,info"),
            2 => EnvFilter::new("bookdrift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &Config) {
    println!("=== Bookdrift Dry Run ===\n");

    println!("Site:");
    println!("  Root URL: {}", config.site.root_url);
    println!("  User agent: {}", config.site.user_agent);

    println!("\nCrawler:");
    println!("  Max pages per category: {}", config.crawler.max_pages);
    println!(
        "  Detail fetch fan-out: {}",
        config.crawler.max_concurrent_details
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nOutput:");
    println!("  Data dir: {}", config.output.data_dir);

    println!("\nReference source:");
    println!("  URL: {}", config.reference.source_url);
    println!("  Cache: {}", config.reference.cache_path);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        println!("  - {}", category);
    }

    println!("\n✓ Configuration is valid");
}

/// Crawls every configured category; one failure never stops the others
async fn handle_scrape(config: &Config, client: &reqwest::Client) -> anyhow::Result<usize> {
    let root_url = Url::parse(&config.site.root_url).context("invalid root-url")?;
    let data_dir = Path::new(&config.output.data_dir);

    let mut succeeded = 0;
    for name in &config.categories {
        match scrape_category(config, client, &root_url, data_dir, name).await {
            Ok(path) => {
                tracing::info!("Category '{}' snapshot written to {}", name, path.display());
                succeeded += 1;
            }
            Err(e) => {
                tracing::error!("Category '{}' failed: {}", name, e);
            }
        }
    }

    Ok(succeeded)
}

/// Resolves, crawls, and snapshots one category
async fn scrape_category(
    config: &Config,
    client: &reqwest::Client,
    root_url: &Url,
    data_dir: &Path,
    name: &str,
) -> bookdrift::Result<PathBuf> {
    let category = resolve_category(client, root_url, name).await?;
    let cat_dir = data_dir.join(&category.slug);

    let records = crawl_category(client, &category, &config.crawler, &cat_dir).await?;
    let path = write_snapshot(&cat_dir, &category.name, &records)?;

    tracing::info!("Done: saved {} books to {}", records.len(), path.display());

    Ok(path)
}

/// Fetches the reference list (cache-first) and enriches every category
async fn handle_enrich(config: &Config, client: &reqwest::Client) -> anyhow::Result<usize> {
    let cache = ReferenceCache::new(&config.reference);
    let countries = cache
        .get(client)
        .await
        .context("reference data unavailable")?;
    tracing::info!("Using {} reference names", countries.len());

    let data_dir = Path::new(&config.output.data_dir);
    let mut rng = rand::thread_rng();
    let enriched = enrich_all(data_dir, &countries, &mut rng).context("enrichment failed")?;

    Ok(enriched)
}
