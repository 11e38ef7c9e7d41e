//! Strata crawler main entry point
//!
//! This is the command-line interface for the Strata breadth-first crawler.

use clap::Parser;
use std::path::PathBuf;
use strata_crawler::config::{load_config_with_hash, validate, Config};
use strata_crawler::crawler::crawl;
use strata_crawler::output::{print_statistics, write_statistics};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Strata: a polite breadth-first web crawler
///
/// Strata crawls outward from a list of seed URLs, honoring robots.txt and
/// per-site rate limits, and stores every HTML page it fetches for later
/// indexing.
#[derive(Parser, Debug)]
#[command(name = "strata-crawler")]
#[command(version)]
#[command(about = "A polite breadth-first web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed file to use instead of the one in the config
    #[arg(long, value_name = "FILE")]
    seeds: Option<PathBuf>,

    /// Override the maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_urls: Option<u64>,

    /// Override the maximum link depth from the seeds
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Override the delay between requests to one site, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Only follow links to the seeds' hosts
    #[arg(long)]
    same_domain_only: bool,

    /// Do not fetch or honor robots.txt
    #[arg(long)]
    ignore_robots: bool,

    /// Override the documents directory
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(seeds) = &self.seeds {
            config.seeds.file = Some(seeds.to_string_lossy().to_string());
        }
        if let Some(max_urls) = self.max_urls {
            config.crawler.max_urls = max_urls;
        }
        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = max_depth;
        }
        if let Some(delay) = self.delay {
            config.crawler.delay_seconds = delay;
        }
        if self.same_domain_only {
            config.crawler.same_domain_only = true;
        }
        if self.ignore_robots {
            config.crawler.respect_robots = false;
        }
        if let Some(output) = &self.output {
            config.output.documents_dir = output.to_string_lossy().to_string();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration after command-line overrides: {}", e);
        return Err(e.into());
    }

    let seeds = config.seed_urls()?;
    if seeds.is_empty() {
        tracing::warn!("No seed URLs configured, nothing to crawl");
    }

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    handle_crawl(&config, seeds).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("strata_crawler=info,warn"),
            1 => EnvFilter::new("strata_crawler=debug,info"),
            2 => EnvFilter::new("strata_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config, seeds: &[String]) {
    println!("=== Strata Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max urls: {}", config.crawler.max_urls);
    println!("  Delay: {}s", config.crawler.delay_seconds);
    println!("  Same domain only: {}", config.crawler.same_domain_only);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    println!("  Respect Crawl-delay: {}", config.crawler.respect_crawl_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Robots timeout: {}s", config.crawler.robots_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Documents: {}", config.output.documents_dir);
    println!("  Format: {:?}", config.output.format);
    println!("  Statistics: {}", config.output.stats_path().display());

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds.len());
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    seeds: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Total seed URLs: {}", seeds.len());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current request");
            on_signal.cancel();
        }
    });

    let stats = match crawl(config, seeds, cancel).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_statistics(&stats);

    let stats_path = config.output.stats_path();
    write_statistics(&stats, &stats_path)?;
    tracing::info!("Statistics written to {}", stats_path.display());

    Ok(())
}
