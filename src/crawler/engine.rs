//! Crawl engine - bounded breadth-first SEO crawl
//!
//! This module contains the main crawl loop, which:
//! - Seeds the frontier from the site URL
//! - Audits one page at a time under the page budget
//! - Follows links from audited HTML pages within the allowed hosts
//! - Aggregates per-page findings into a [`CrawlReport`]

use crate::config::Config;
use crate::crawler::auditor::{audit_page, PageOutcome};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::links::extract_links;
use crate::crawler::report::CrawlReport;
use crate::url::{normalize_url, UrlFilter};
use crate::{SitewatchError, UrlResult};
use tokio_util::sync::CancellationToken;

/// Computes the seed URLs for a site
///
/// The site URL always comes first. When its path is the site root and
/// `secondary_path` is non-empty, `<scheme>://<host>[:port]<secondary_path>`
/// follows it.
///
/// # Example
///
/// ```
/// use sitewatch::crawler::seed_urls;
///
/// let seeds = seed_urls("https://example.com", "/en/").unwrap();
/// assert_eq!(seeds, vec!["https://example.com/", "https://example.com/en/"]);
///
/// let seeds = seed_urls("https://example.com/shop", "/en/").unwrap();
/// assert_eq!(seeds, vec!["https://example.com/shop"]);
/// ```
pub fn seed_urls(site_url: &str, secondary_path: &str) -> UrlResult<Vec<String>> {
    let site = normalize_url(site_url)?;
    let mut seeds = vec![site.to_string()];

    if site.path() == "/" && !secondary_path.is_empty() {
        let mut secondary = site.clone();
        secondary.set_path(secondary_path);
        secondary.set_query(None);
        let secondary = secondary.to_string();

        if !seeds.contains(&secondary) {
            seeds.push(secondary);
        }
    }

    Ok(seeds)
}

/// Drives one crawl run over a site
pub struct CrawlEngine<F> {
    fetcher: F,
    filter: UrlFilter,
    seeds: Vec<String>,
    max_pages: u32,
    revisit_skipped: bool,
    cancel: CancellationToken,
}

impl CrawlEngine<HttpFetcher> {
    /// Creates an engine fetching over HTTP with the configured client
    pub fn from_config(config: &Config) -> Result<Self, SitewatchError> {
        let fetcher = HttpFetcher::from_config(config)?.html_bodies_only();
        Self::new(config, fetcher)
    }
}

impl<F: Fetcher> CrawlEngine<F> {
    /// Creates an engine using `fetcher` for every request
    pub fn new(config: &Config, fetcher: F) -> Result<Self, SitewatchError> {
        let seeds = seed_urls(&config.site.url, &config.site.secondary_seed_path)?;
        let filter = UrlFilter::from_config(config)?;

        Ok(Self {
            fetcher,
            filter,
            seeds,
            max_pages: config.crawler.max_pages,
            revisit_skipped: config.crawler.revisit_skipped,
            cancel: CancellationToken::new(),
        })
    }

    /// Stops the crawl early when `token` is cancelled
    ///
    /// A cancelled run still returns a report built from the pages audited
    /// so far.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Runs the crawl to completion
    ///
    /// The loop ends when the frontier is drained, the page budget is spent,
    /// or the cancellation token fires. Per-page failures never abort the run.
    pub async fn run(&self) -> CrawlReport {
        let mut frontier = Frontier::new(self.seeds.clone(), self.max_pages)
            .with_revisit_released(self.revisit_skipped);
        let mut results = Vec::new();
        let mut errors = Vec::new();
        let mut cancelled = false;

        tracing::info!(
            "Starting crawl of {} (budget {} pages)",
            self.filter.site_host(),
            self.max_pages
        );

        loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some(url) = frontier.next_url() else {
                break;
            };

            tracing::debug!("Visiting {}", url);

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                outcome = audit_page(&self.fetcher, &url) => Some(outcome),
            };

            let Some(outcome) = outcome else {
                // Interrupted mid-fetch; the page produced nothing.
                frontier.release(&url);
                cancelled = true;
                break;
            };

            match outcome {
                PageOutcome::Skipped { content_type } => {
                    tracing::debug!("Skipping {} (content type '{}')", url, content_type);
                    frontier.release(&url);
                }

                PageOutcome::Failed(error) => {
                    tracing::warn!("Failed to audit {}: {}", url, error.error);
                    errors.push(error);
                }

                PageOutcome::Audited(page) => {
                    tracing::debug!(
                        "Audited {}: {} issues, {} warnings",
                        url,
                        page.result.issues.len(),
                        page.result.warnings.len()
                    );

                    let queued = self.enqueue_links(&mut frontier, &page.body, &page.final_url);
                    tracing::trace!("Queued {} links from {}", queued, url);

                    results.push(page.result);
                }
            }

            if frontier.attempts() % 10 == 0 {
                tracing::info!(
                    "Progress: {} attempts, {} pages audited, {} in frontier",
                    frontier.attempts(),
                    results.len(),
                    frontier.queued()
                );
            }
        }

        if cancelled {
            tracing::warn!("Crawl cancelled after {} attempts", frontier.attempts());
        } else if !frontier.has_budget() && frontier.queued() > 0 {
            tracing::info!(
                "Page budget of {} reached with {} URLs still queued",
                frontier.budget(),
                frontier.queued()
            );
        }

        let report = CrawlReport::build(frontier.visited_count(), results, errors, cancelled);

        tracing::info!(
            "Crawl finished: scanned={} audited={} issues={} warnings={}",
            report.total_pages_scanned,
            report.pages_with_seo_data,
            report.global_issues_count,
            report.global_warnings_count
        );

        report
    }

    /// Pushes every allowed, not yet visited link found in `body` onto the frontier
    fn enqueue_links(&self, frontier: &mut Frontier, body: &[u8], base_url: &str) -> usize {
        let mut queued = 0;

        for link in extract_links(body, base_url) {
            let normalized = match normalize_url(&link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::trace!("Ignoring link {}: {}", link, e);
                    continue;
                }
            };

            if !self.filter.is_allowed_url(&normalized) {
                tracing::trace!("Link outside allowed hosts: {}", normalized);
                continue;
            }

            if frontier.enqueue(normalized.to_string()) {
                queued += 1;
            }
        }

        queued
    }
}
