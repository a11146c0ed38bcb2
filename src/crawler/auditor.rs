//! Per-page SEO audit
//!
//! Fetches one URL, gates on content type and evaluates the SEO rules over
//! the extracted metadata.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::meta::{extract_meta_tags, MetaTags};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Recommended title length in characters
pub const TITLE_LENGTH: RangeInclusive<usize> = 30..=60;

/// Recommended meta description length in characters
pub const DESCRIPTION_LENGTH: RangeInclusive<usize> = 120..=160;

pub const MISSING_TITLE: &str = "Missing <title> tag";
pub const MISSING_DESCRIPTION: &str = "Missing meta description";
pub const MISSING_OPEN_GRAPH: &str = "Missing Open Graph tags";
pub const MISSING_JSON_LD: &str = "No Schema.org JSON-LD";

/// One audited HTML page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub meta_tags: MetaTags,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    /// True when the page has no issues (warnings do not count)
    pub ok: bool,
}

/// A page that was attempted but produced no SEO data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    pub url: String,
    /// HTTP status, absent for transport failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error: String,
}

/// An audited page together with the body it was audited from
#[derive(Debug, Clone)]
pub struct AuditedPage {
    pub result: PageResult,
    /// Final URL after redirects, used as the base for relative links
    pub final_url: String,
    pub body: Vec<u8>,
}

/// Outcome of auditing a single URL
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// HTML page fetched and audited
    Audited(AuditedPage),

    /// Not HTML; not an SEO surface
    Skipped {
        /// The Content-Type that was received
        content_type: String,
    },

    /// Transport failure or non-200 status
    Failed(PageError),
}

/// Fetches and audits a single URL
///
/// # Outcomes
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Transport failure (timeout, DNS, refused) | `Failed`, no status |
/// | Status other than 200 | `Failed` with `HTTP <status>` |
/// | Content-Type not `text/html*` | `Skipped` |
/// | Otherwise | `Audited` |
pub async fn audit_page<F: Fetcher>(fetcher: &F, url: &str) -> PageOutcome {
    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => return PageOutcome::Failed(transport_error(url, &e)),
    };

    if page.status != 200 {
        return PageOutcome::Failed(PageError {
            url: url.to_string(),
            status: Some(page.status),
            error: format!("HTTP {}", page.status),
        });
    }

    if !page.is_html() {
        return PageOutcome::Skipped {
            content_type: page.content_type().to_string(),
        };
    }

    let meta_tags = extract_meta_tags(&page.body);
    let result = build_page_result(url, meta_tags);

    PageOutcome::Audited(AuditedPage {
        result,
        final_url: page.url,
        body: page.body,
    })
}

/// Applies the SEO rules to extracted metadata
pub fn build_page_result(url: &str, meta_tags: MetaTags) -> PageResult {
    let (issues, warnings) = evaluate_seo(&meta_tags);

    PageResult {
        url: url.to_string(),
        ok: issues.is_empty(),
        meta_tags,
        issues,
        warnings,
    }
}

/// Evaluates the SEO rules, returning `(issues, warnings)`
///
/// Lengths are counted in characters, not bytes.
pub fn evaluate_seo(meta: &MetaTags) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    match meta.non_empty_title() {
        None => issues.push(MISSING_TITLE.to_string()),
        Some(title) => {
            if let Some(warning) = length_warning("Title", title, &TITLE_LENGTH) {
                warnings.push(warning);
            }
        }
    }

    match meta.non_empty_description() {
        None => issues.push(MISSING_DESCRIPTION.to_string()),
        Some(description) => {
            if let Some(warning) = length_warning("Description", description, &DESCRIPTION_LENGTH)
            {
                warnings.push(warning);
            }
        }
    }

    if !meta.has_open_graph() {
        warnings.push(MISSING_OPEN_GRAPH.to_string());
    }

    if meta.json_ld_count() == 0 {
        warnings.push(MISSING_JSON_LD.to_string());
    }

    (issues, warnings)
}

fn length_warning(label: &str, value: &str, range: &RangeInclusive<usize>) -> Option<String> {
    let len = value.chars().count();
    let verdict = if len < *range.start() {
        "short"
    } else if len > *range.end() {
        "long"
    } else {
        return None;
    };

    Some(format!(
        "{} too {}: {} chars (recommend {}-{})",
        label,
        verdict,
        len,
        range.start(),
        range.end()
    ))
}

fn transport_error(url: &str, e: &FetchError) -> PageError {
    PageError {
        url: url.to_string(),
        status: None,
        error: e.to_string(),
    }
}
