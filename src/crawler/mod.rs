//! Crawler module for the bounded SEO crawl
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML link extraction and SEO metadata extraction
//! - The per-page SEO audit
//! - Frontier bookkeeping and the crawl loop itself

mod auditor;
mod engine;
mod fetcher;
mod frontier;
mod links;
mod meta;
mod report;

pub use auditor::{
    audit_page, build_page_result, evaluate_seo, AuditedPage, PageError, PageOutcome, PageResult,
    DESCRIPTION_LENGTH, MISSING_DESCRIPTION, MISSING_JSON_LD, MISSING_OPEN_GRAPH, MISSING_TITLE,
    TITLE_LENGTH,
};
pub use engine::{seed_urls, CrawlEngine};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use links::extract_links;
pub(crate) use links::resolve_link;
pub use meta::{extract_meta_tags, MetaTags, OPEN_GRAPH_PROPERTIES};
pub use report::{CrawlReport, UrlIssue, UrlWarning};

use crate::config::Config;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Seed the frontier from the site URL
/// 3. Audit pages breadth-first until the frontier drains, the page budget
///    is spent, or `cancel` fires
/// 4. Return the aggregate report
///
/// # Example
///
/// ```no_run
/// use sitewatch::config::Config;
/// use sitewatch::crawler::crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), sitewatch::SitewatchError> {
/// let config = Config::for_site("https://example.com/");
/// let report = crawl(&config, CancellationToken::new()).await?;
/// println!("scanned {} pages", report.total_pages_scanned);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, cancel: CancellationToken) -> crate::Result<CrawlReport> {
    let engine = CrawlEngine::from_config(config)?.with_cancellation(cancel);
    Ok(engine.run().await)
}
