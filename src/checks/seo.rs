//! Single-page SEO check of the site URL

use crate::crawler::{
    build_page_result, extract_meta_tags, Fetcher, MetaTags, MISSING_JSON_LD, MISSING_OPEN_GRAPH,
};
use crate::output::{append_summary, findings_lines, save_artifact, OutputResult, ReportSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Artifact name of the single-page SEO check
pub const SEO_CHECK_ARTIFACT: &str = "seo_check";

/// Open Graph warning as reported for the homepage
pub const HOMEPAGE_MISSING_OPEN_GRAPH: &str = "Missing Open Graph tags (Facebook/LinkedIn sharing)";

/// JSON-LD warning as reported for the homepage
pub const HOMEPAGE_MISSING_JSON_LD: &str = "No Schema.org JSON-LD structured data";

/// Result of auditing the site URL alone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoCheckResult {
    /// HTTP status, absent when the request itself failed
    pub status: Option<u16>,
    pub meta_tags: MetaTags,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Fetches `url` and applies the SEO rules to whatever body came back
///
/// Unlike the crawl, neither the status nor the content type gates the
/// audit: an error page is audited as served.
pub async fn check_page<F: Fetcher>(fetcher: &F, url: &str) -> SeoCheckResult {
    match fetcher.fetch(url).await {
        Ok(page) => {
            let result = build_page_result(url, extract_meta_tags(&page.body));
            SeoCheckResult {
                status: Some(page.status),
                meta_tags: result.meta_tags,
                issues: result.issues,
                warnings: result.warnings.into_iter().map(homepage_wording).collect(),
                ok: result.ok,
                error: None,
                timestamp: Utc::now(),
            }
        }
        Err(e) => {
            tracing::warn!("SEO check could not fetch {}: {}", url, e);
            SeoCheckResult {
                status: None,
                meta_tags: MetaTags::default(),
                issues: Vec::new(),
                warnings: Vec::new(),
                ok: false,
                error: Some(e.to_string()),
                timestamp: Utc::now(),
            }
        }
    }
}

/// Spells out the sharing and structured-data warnings for the homepage
fn homepage_wording(warning: String) -> String {
    match warning.as_str() {
        MISSING_OPEN_GRAPH => HOMEPAGE_MISSING_OPEN_GRAPH.to_string(),
        MISSING_JSON_LD => HOMEPAGE_MISSING_JSON_LD.to_string(),
        _ => warning,
    }
}

/// Summary lines for the SEO check (all findings listed)
pub fn summary_lines(result: &SeoCheckResult) -> Vec<String> {
    let status = match (result.status, &result.error) {
        (Some(status), _) => status.to_string(),
        (None, Some(error)) => format!("error ({})", error),
        (None, None) => "error".to_string(),
    };

    findings_lines(
        format!(
            "- SEO: status={} issues={} warnings={}",
            status,
            result.issues.len(),
            result.warnings.len()
        ),
        &result.issues,
        &result.warnings,
    )
}

/// Saves the `seo_check` artifact and appends its summary lines
pub fn publish(sink: &dyn ReportSink, result: &SeoCheckResult) -> OutputResult<()> {
    save_artifact(sink, SEO_CHECK_ARTIFACT, result)?;
    append_summary(sink, &summary_lines(result))
}
