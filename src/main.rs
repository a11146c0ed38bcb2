//! Sitewatch main entry point
//!
//! This is the command-line interface for the sitewatch site checker.

use clap::{Parser, Subcommand};
use sitewatch::checks::{run_dns_check, run_image_check, run_seo_check, run_uptime_check};
use sitewatch::config::{load, Config, Overrides};
use sitewatch::crawler::CrawlEngine;
use sitewatch::output::{publish_crawl_report, FileReportSink};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sitewatch: scheduled SEO and health checks for a website
///
/// Sitewatch crawls a single site breadth-first under a page budget,
/// auditing each HTML page's SEO metadata. It also runs one-shot checks
/// of the homepage, its images, and the site's DNS resolution. Results
/// are written as JSON artifacts plus a Markdown summary.
#[derive(Parser, Debug)]
#[command(name = "sitewatch")]
#[command(version)]
#[command(about = "Scheduled SEO and health checks for a website", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (environment only when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Site URL, overriding the config file and SITE_URL
    #[arg(long, value_name = "URL", global = true)]
    site_url: Option<String>,

    /// Crawl page budget, overriding the config file and MAX_PAGES_CRAWL
    #[arg(long, value_name = "N", global = true)]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the site and audit every reachable HTML page (default)
    Crawl {
        /// Validate config and show what would be crawled without fetching
        #[arg(long)]
        dry_run: bool,
    },
    /// Audit the site URL alone
    Seo,
    /// Check the images referenced by the site URL
    Images,
    /// Resolve the site host
    Dns,
    /// Check that every uptime target answers as expected (exit 1 if not)
    Uptime,
    /// Run every check, crawl included
    All,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = Overrides {
        site_url: cli.site_url.clone(),
        max_pages: cli.max_pages,
    };

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("Loading configuration from environment"),
    }
    let config = match load(cli.config.as_deref(), &overrides) {
        Ok(cfg) => {
            tracing::info!("Configuration loaded for {}", cfg.site.url);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let sink = FileReportSink::new(&config.output.reports_dir);

    match cli.command.unwrap_or(Command::Crawl { dry_run: false }) {
        Command::Crawl { dry_run: true } => handle_dry_run(&config)?,
        Command::Crawl { dry_run: false } => handle_crawl(&config, &sink).await?,
        Command::Seo => {
            run_seo_check(&config, &sink).await?;
        }
        Command::Images => {
            run_image_check(&config, &sink).await?;
        }
        Command::Dns => {
            run_dns_check(&config, &sink).await?;
        }
        Command::Uptime => {
            if !run_uptime_check(&config, &sink).await?.all_healthy() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::All => {
            handle_crawl(&config, &sink).await?;
            run_seo_check(&config, &sink).await?;
            run_image_check(&config, &sink).await?;
            run_dns_check(&config, &sink).await?;
            if !run_uptime_check(&config, &sink).await?.all_healthy() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the crawl report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewatch=info,warn"),
            1 => EnvFilter::new("sitewatch=debug,info"),
            2 => EnvFilter::new("sitewatch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `crawl --dry-run`: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = CrawlEngine::from_config(config)?;

    println!("=== Sitewatch Dry Run ===\n");

    println!("Site: {}", config.site.url);
    println!("Seeds ({}):", engine.seeds().len());
    for seed in engine.seeds() {
        println!("  - {}", seed);
    }

    println!("\nAllowed Domains ({}):", config.site.allowed_domains.len());
    for pattern in &config.site.allowed_domains {
        println!("  - {}", pattern);
    }

    println!("\nCrawler Configuration:");
    println!("  Page budget: {}", engine.max_pages());
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Revisit skipped URLs: {}", config.crawler.revisit_skipped);
    println!("  Body size cap: {} bytes", config.crawler.max_body_bytes);

    let targets = config.uptime_targets();
    println!("\nUptime Targets ({}):", targets.len());
    for target in &targets {
        println!(
            "  - {}: {} (expect {}, {}s)",
            target.name, target.url, target.expected_status, target.timeout_secs
        );
    }

    println!("\nUser Agent: {}", config.user_agent_string());
    println!("Reports: {}", config.output.reports_dir);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the crawl: runs it, publishes it, and prints the report as JSON
async fn handle_crawl(
    config: &Config,
    sink: &FileReportSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = CancellationToken::new();
    let done = CancellationToken::new();
    let interrupt = cancel.clone();
    let listening = done.clone();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::warn!("Interrupt received, finishing with a partial report");
                    interrupt.cancel();
                }
            }
            _ = listening.cancelled() => {}
        }
    });

    let engine = CrawlEngine::from_config(config)?.with_cancellation(cancel);
    let report = engine.run().await;
    done.cancel();

    if let Err(e) = publish_crawl_report(sink, &report) {
        tracing::error!("Failed to write crawl report: {}", e);
        return Err(e.into());
    }
    tracing::info!("Crawl report written to {}", sink.dir().display());

    if !report.is_clean() {
        tracing::warn!("Crawl found {} SEO issues", report.global_issues_count);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
