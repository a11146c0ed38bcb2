//! Uptime check
//!
//! Requests every configured target once and judges it healthy when it
//! answers with the expected status inside its timeout. The run as a whole
//! is summarized as an uptime percentage.

use crate::config::UptimeTarget;
use crate::crawler::{FetchError, Fetcher};
use crate::output::{append_summary, save_artifact, OutputResult, ReportSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Artifact name of the uptime check
pub const UPTIME_CHECK_ARTIFACT: &str = "uptime_check";

/// How a target answered, independent of whether that counts as healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    /// A response arrived (any status code)
    Online,
    Timeout,
    ConnectionError,
    Error,
}

/// Health of one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteHealth {
    pub name: String,
    pub url: String,
    pub status: SiteStatus,
    pub status_code: Option<u16>,
    /// Milliseconds until the response completed, rounded to two decimals
    pub response_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub healthy: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeSummary {
    pub total_sites: usize,
    pub healthy_sites: usize,
    pub unhealthy_sites: usize,
    /// Healthy share of all targets in percent, 0 when there are none
    pub uptime_percentage: f64,
}

impl UptimeSummary {
    fn from_results(results: &[SiteHealth]) -> Self {
        let total_sites = results.len();
        let healthy_sites = results.iter().filter(|r| r.healthy).count();
        let uptime_percentage = if total_sites == 0 {
            0.0
        } else {
            round2(healthy_sites as f64 / total_sites as f64 * 100.0)
        };

        Self {
            total_sites,
            healthy_sites,
            unhealthy_sites: total_sites - healthy_sites,
            uptime_percentage,
        }
    }
}

/// Result of the uptime check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UptimeCheckResult {
    pub summary: UptimeSummary,
    pub results: Vec<SiteHealth>,
    pub timestamp: DateTime<Utc>,
}

impl UptimeCheckResult {
    /// Returns true when every target is healthy
    pub fn all_healthy(&self) -> bool {
        self.summary.unhealthy_sites == 0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Requests one target and judges its health
pub async fn check_site<F: Fetcher>(fetcher: &F, target: &UptimeTarget) -> SiteHealth {
    let limit = Duration::from_secs(target.timeout_secs);
    let started = Instant::now();
    let outcome = tokio::time::timeout(limit, fetcher.fetch(&target.url)).await;
    let elapsed = started.elapsed();

    let mut health = SiteHealth {
        name: target.name.clone(),
        url: target.url.clone(),
        status: SiteStatus::Error,
        status_code: None,
        response_time_ms: None,
        error: None,
        healthy: false,
        timestamp: Utc::now(),
    };

    match outcome {
        Ok(Ok(page)) => {
            let elapsed_ms = round2(elapsed.as_secs_f64() * 1000.0);
            health.status = SiteStatus::Online;
            health.status_code = Some(page.status);
            health.response_time_ms = Some(elapsed_ms);
            health.healthy = page.status == target.expected_status && elapsed < limit;

            if page.status != target.expected_status {
                health.error = Some(format!(
                    "Status code {} != {}",
                    page.status, target.expected_status
                ));
            } else if !health.healthy {
                health.error = Some(format!(
                    "Response time {}ms > {}ms",
                    elapsed_ms,
                    limit.as_millis()
                ));
            }
        }
        Err(_) | Ok(Err(FetchError::Timeout)) => {
            health.status = SiteStatus::Timeout;
            health.error = Some(format!("Request timeout after {}s", target.timeout_secs));
        }
        Ok(Err(FetchError::Connect(e))) => {
            tracing::debug!("Connecting to {} failed: {}", target.url, e);
            health.status = SiteStatus::ConnectionError;
            health.error = Some("Connection refused or DNS error".to_string());
        }
        Ok(Err(e)) => {
            health.error = Some(e.to_string());
        }
    }

    health
}

/// Checks every target in order
pub async fn check_uptime<F: Fetcher>(fetcher: &F, targets: &[UptimeTarget]) -> UptimeCheckResult {
    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let health = check_site(fetcher, target).await;
        match &health.error {
            None => tracing::info!(
                "{} is online ({}ms)",
                health.name,
                health.response_time_ms.unwrap_or_default()
            ),
            Some(error) => tracing::warn!("{} is unhealthy: {}", health.name, error),
        }
        results.push(health);
    }

    UptimeCheckResult {
        summary: UptimeSummary::from_results(&results),
        results,
        timestamp: Utc::now(),
    }
}

/// Summary lines for the uptime check, listing unhealthy targets
pub fn summary_lines(result: &UptimeCheckResult) -> Vec<String> {
    let mut lines = vec![format!(
        "- Uptime: healthy={}/{} uptime={}%",
        result.summary.healthy_sites, result.summary.total_sites, result.summary.uptime_percentage
    )];

    for site in result.results.iter().filter(|site| !site.healthy) {
        lines.push(format!(
            "    - {} ({}): {}",
            site.name,
            site.url,
            site.error.as_deref().unwrap_or("unhealthy")
        ));
    }

    lines
}

/// Saves the `uptime_check` artifact and appends its summary lines
pub fn publish(sink: &dyn ReportSink, result: &UptimeCheckResult) -> OutputResult<()> {
    save_artifact(sink, UPTIME_CHECK_ARTIFACT, result)?;
    append_summary(sink, &summary_lines(result))
}
