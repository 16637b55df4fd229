//! Fieldrake main entry point
//!
//! This is the command-line interface for the Fieldrake listing scraper.

use anyhow::Context;
use clap::Parser;
use fieldrake::config::{load_config, Config};
use fieldrake::scrape::{Orchestrator, PageFetcher, PagePolicy};
use fieldrake::sink::{AssetDirSink, CsvSink};
use fieldrake::sites::{self, SiteSpec};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Fieldrake: a paginated listing scraper
///
/// Fieldrake fetches paginated listing pages concurrently, extracts one
/// record per row with per-field fault tolerance, and writes the results
/// to CSV plus an optional asset directory.
#[derive(Parser, Debug)]
#[command(name = "fieldrake")]
#[command(version = "0.1.0")]
#[command(about = "A paginated listing scraper", long_about = None)]
struct Cli {
    /// Site to scrape (books, countries, hockey, transfers)
    #[arg(value_name = "SITE")]
    site: String,

    /// Path to TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Fetch exactly this many pages, overriding the site's policy
    #[arg(long)]
    pages: Option<u32>,

    /// Number of concurrent fetches
    #[arg(long)]
    workers: Option<u32>,

    /// Path of the output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for downloaded assets
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Skip the asset download round
    #[arg(long)]
    no_assets: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let Some(site) = sites::by_name(&cli.site) else {
        anyhow::bail!(
            "unknown site '{}' (available: {})",
            cli.site,
            sites::SITE_NAMES.join(", ")
        );
    };

    let policy = resolve_policy(&cli, &config, &site);
    anyhow::ensure!(policy.ceiling() >= 1, "page count must be at least 1");

    let workers = cli.workers.unwrap_or(config.pipeline.workers);
    anyhow::ensure!(workers >= 1, "workers must be at least 1");

    let fetch_assets = config.pipeline.fetch_assets && !cli.no_assets && site.asset.is_some();
    let csv_path = cli
        .output
        .clone()
        .unwrap_or_else(|| Path::new(&config.output.directory).join(site.csv_filename));
    let assets_dir = resolve_assets_dir(&cli, &config, &site);

    if cli.dry_run {
        handle_dry_run(&site, policy, workers, fetch_assets, &csv_path, assets_dir.as_deref());
        return Ok(());
    }

    handle_scrape(
        site,
        policy,
        &config,
        workers,
        fetch_assets,
        &csv_path,
        assets_dir.as_deref(),
    )
    .await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fieldrake=info,warn"),
            1 => EnvFilter::new("fieldrake=debug,info"),
            2 => EnvFilter::new("fieldrake=trace,debug"),
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

/// Page policy after CLI and config overrides
fn resolve_policy(cli: &Cli, config: &Config, site: &SiteSpec) -> PagePolicy {
    if let Some(pages) = cli.pages {
        return PagePolicy::Bounded { pages };
    }
    match (site.default_policy, config.pipeline.page_ceiling) {
        (PagePolicy::Adaptive { .. }, Some(ceiling)) => PagePolicy::Adaptive { ceiling },
        (policy, _) => policy,
    }
}

/// Asset directory after CLI and config overrides, `None` for sites
/// without assets
fn resolve_assets_dir(cli: &Cli, config: &Config, site: &SiteSpec) -> Option<PathBuf> {
    let asset = site.asset.as_ref()?;
    if let Some(dir) = &cli.assets_dir {
        return Some(dir.clone());
    }
    if let Some(dir) = &config.output.assets_directory {
        return Some(PathBuf::from(dir));
    }
    Some(Path::new(&config.output.directory).join(asset.directory))
}

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(
    site: &SiteSpec,
    policy: PagePolicy,
    workers: u32,
    fetch_assets: bool,
    csv_path: &Path,
    assets_dir: Option<&Path>,
) {
    println!("=== Fieldrake Dry Run ===\n");

    println!("Site: {}", site.name);
    println!("  Listing URL: {}", site.base);
    println!("  Fields: {}", site.fields.len());
    match policy {
        PagePolicy::Bounded { pages } => println!("  Pages: 1..={} (bounded)", pages),
        PagePolicy::Adaptive { ceiling } => {
            println!("  Pages: adaptive discovery, ceiling {}", ceiling)
        }
    }
    println!("  Workers: {}", workers);

    println!("\nOutput:");
    println!("  CSV: {}", csv_path.display());
    match (fetch_assets, assets_dir) {
        (true, Some(dir)) => println!("  Assets: {}", dir.display()),
        _ => println!("  Assets: disabled"),
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would fetch up to {} pages", policy.ceiling());
}

/// Handles the scrape itself: run the pipeline, then the sinks
async fn handle_scrape(
    site: SiteSpec,
    policy: PagePolicy,
    config: &Config,
    workers: u32,
    fetch_assets: bool,
    csv_path: &Path,
    assets_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let fetcher = PageFetcher::new(&config.fetcher)?;
    let orchestrator = Orchestrator::new(site, policy, fetcher, workers as usize, fetch_assets);

    let result = orchestrator.run().await?;

    // Each sink reports its own outcome; a failed asset write never loses
    // the records
    if fetch_assets {
        if let Some(dir) = assets_dir {
            match AssetDirSink::new(dir).write(&result.records) {
                Ok(written) => {
                    println!(
                        "{} asset files have been written to {}",
                        written,
                        dir.display()
                    );
                }
                Err(e) => {
                    eprintln!("There was an error while writing assets: {}", e);
                }
            }
        }
    }

    match CsvSink::new(csv_path).write(orchestrator.site(), &result.records) {
        Ok(rows) => {
            println!("{} rows have been written to {}", rows, csv_path.display());
        }
        Err(e) => {
            eprintln!("There was an error while writing the csv: {}", e);
            return Err(e.into());
        }
    }

    if result.stats.pages_failed > 0 {
        println!("{} pages could not be fetched", result.stats.pages_failed);
    }

    Ok(())
}
