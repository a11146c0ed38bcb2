//! One-shot site checks
//!
//! Besides the crawl, sitewatch runs a few checks against the site URL
//! alone, plus an uptime check over a list of targets. Each check produces
//! a serializable result, saved as its own artifact, and contributes lines
//! to the running Markdown summary.

pub mod dns;
pub mod images;
pub mod seo;
pub mod uptime;

pub use dns::{check_dns, resolve_host, DnsCheckResult, DNS_CHECK_ARTIFACT};
pub use images::{
    check_image, check_images, extract_images, ImageCheckResult, ImageInfo, ImageIssue,
    ImageWarning, IMAGE_CHECK_ARTIFACT,
};
pub use seo::{
    check_page, SeoCheckResult, HOMEPAGE_MISSING_JSON_LD, HOMEPAGE_MISSING_OPEN_GRAPH,
    SEO_CHECK_ARTIFACT,
};
pub use uptime::{
    check_site, check_uptime, SiteHealth, SiteStatus, UptimeCheckResult, UptimeSummary,
    UPTIME_CHECK_ARTIFACT,
};

use crate::config::Config;
use crate::crawler::HttpFetcher;
use crate::output::ReportSink;
use crate::Result;

/// Runs the single-page SEO check and publishes it
pub async fn run_seo_check(config: &Config, sink: &dyn ReportSink) -> Result<SeoCheckResult> {
    let fetcher = HttpFetcher::from_config(config)?;
    let result = check_page(&fetcher, &config.site.url).await;

    tracing::info!(
        "SEO check: {} issues, {} warnings",
        result.issues.len(),
        result.warnings.len()
    );

    seo::publish(sink, &result)?;
    Ok(result)
}

/// Runs the image check and publishes it
pub async fn run_image_check(config: &Config, sink: &dyn ReportSink) -> Result<ImageCheckResult> {
    let fetcher = HttpFetcher::from_config(config)?;
    let result = check_images(&fetcher, &config.site.url, &config.images).await;

    match &result.error {
        Some(error) => tracing::warn!("Image check failed: {}", error),
        None => tracing::info!(
            "Image check: {} found, {} checked, {} broken",
            result.total_images_found,
            result.images_checked,
            result.issues.len()
        ),
    }

    images::publish(sink, &result)?;
    Ok(result)
}

/// Runs the DNS check and publishes it
pub async fn run_dns_check(config: &Config, sink: &dyn ReportSink) -> Result<DnsCheckResult> {
    let result = check_dns(&config.site.url).await;
    tracing::info!("DNS check: host={} ok={}", result.host, result.ok);

    dns::publish(sink, &result)?;
    Ok(result)
}

/// Runs the uptime check over every configured target and publishes it
///
/// The client timeout is raised to the longest target timeout so that each
/// target is only bounded by its own limit.
pub async fn run_uptime_check(config: &Config, sink: &dyn ReportSink) -> Result<UptimeCheckResult> {
    let targets = config.uptime_targets();

    let mut client_config = config.clone();
    client_config.crawler.request_timeout_secs = targets
        .iter()
        .map(|target| target.timeout_secs)
        .fold(config.crawler.request_timeout_secs, u64::max);

    let fetcher = HttpFetcher::from_config(&client_config)?;
    let result = check_uptime(&fetcher, &targets).await;

    tracing::info!(
        "Uptime check: {}/{} healthy ({}%)",
        result.summary.healthy_sites,
        result.summary.total_sites,
        result.summary.uptime_percentage
    );

    uptime::publish(sink, &result)?;
    Ok(result)
}
