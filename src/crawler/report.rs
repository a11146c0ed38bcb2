//! Crawl aggregate types

use crate::crawler::auditor::{PageError, PageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issue attributed to the page it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlIssue {
    pub url: String,
    pub issue: String,
}

/// A warning attributed to the page it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlWarning {
    pub url: String,
    pub warning: String,
}

/// Aggregate result of one crawl run
///
/// Built once when the crawl loop exits and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Size of the visited set at termination (non-HTML URLs excluded)
    pub total_pages_scanned: usize,

    /// Number of audited HTML pages
    pub pages_with_seo_data: usize,

    pub global_issues_count: usize,
    pub global_warnings_count: usize,

    /// Audited pages in visit order
    pub detailed_results: Vec<PageResult>,

    pub issues_by_url: Vec<UrlIssue>,
    pub warnings_by_url: Vec<UrlWarning>,

    /// Pages that failed with a transport error or non-200 status
    #[serde(default)]
    pub errors_by_url: Vec<PageError>,

    /// True when the run was interrupted before the frontier or budget ran out
    #[serde(default)]
    pub cancelled: bool,

    pub timestamp: DateTime<Utc>,
}

impl CrawlReport {
    /// Assembles the report from the crawl accumulators, stamped with the current time
    pub fn build(
        total_pages_scanned: usize,
        detailed_results: Vec<PageResult>,
        errors_by_url: Vec<PageError>,
        cancelled: bool,
    ) -> Self {
        let issues_by_url: Vec<UrlIssue> = detailed_results
            .iter()
            .flat_map(|page| {
                page.issues.iter().map(|issue| UrlIssue {
                    url: page.url.clone(),
                    issue: issue.clone(),
                })
            })
            .collect();

        let warnings_by_url: Vec<UrlWarning> = detailed_results
            .iter()
            .flat_map(|page| {
                page.warnings.iter().map(|warning| UrlWarning {
                    url: page.url.clone(),
                    warning: warning.clone(),
                })
            })
            .collect();

        Self {
            total_pages_scanned,
            pages_with_seo_data: detailed_results.len(),
            global_issues_count: issues_by_url.len(),
            global_warnings_count: warnings_by_url.len(),
            detailed_results,
            issues_by_url,
            warnings_by_url,
            errors_by_url,
            cancelled,
            timestamp: Utc::now(),
        }
    }

    /// Returns true if no audited page has an issue
    pub fn is_clean(&self) -> bool {
        self.global_issues_count == 0
    }
}
