//! Markdown summary lines
//!
//! Each check contributes one headline line to the running summary, followed
//! by indented sub-lines listing its findings.

use crate::crawler::CrawlReport;

/// Maximum number of issues (and, separately, warnings) listed for a crawl
pub const TOP_FINDINGS: usize = 10;

/// Formats the crawl's contribution to the running summary
///
/// # Format
///
/// ```text
/// - SEO Crawler: scanned=3 issues=2 warnings=5
///   Top issues:
///     - https://example.com/: Missing meta description
///   Top warnings:
///     - https://example.com/: Missing Open Graph tags
/// ```
pub fn crawl_summary_lines(report: &CrawlReport) -> Vec<String> {
    let mut lines = vec![format!(
        "- SEO Crawler: scanned={} issues={} warnings={}",
        report.total_pages_scanned, report.global_issues_count, report.global_warnings_count
    )];

    if !report.issues_by_url.is_empty() {
        lines.push("  Top issues:".to_string());
        for item in report.issues_by_url.iter().take(TOP_FINDINGS) {
            lines.push(format!("    - {}: {}", item.url, item.issue));
        }
    }

    if !report.warnings_by_url.is_empty() {
        lines.push("  Top warnings:".to_string());
        for item in report.warnings_by_url.iter().take(TOP_FINDINGS) {
            lines.push(format!("    - {}: {}", item.url, item.warning));
        }
    }

    lines
}

/// Formats a headline plus `Issues:` / `Warnings:` sub-lists (all entries)
pub fn findings_lines(headline: String, issues: &[String], warnings: &[String]) -> Vec<String> {
    let mut lines = vec![headline];

    if !issues.is_empty() {
        lines.push("  Issues:".to_string());
        lines.extend(issues.iter().map(|issue| format!("    - {}", issue)));
    }

    if !warnings.is_empty() {
        lines.push("  Warnings:".to_string());
        lines.extend(warnings.iter().map(|warn| format!("    - {}", warn)));
    }

    lines
}
