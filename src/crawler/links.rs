//! Link extraction from HTML pages
//!
//! Parses raw HTML bytes for anchors (and the canonical link) and resolves
//! each href against the page URL. Filtering by host is not done here; that
//! is the job of [`crate::url::UrlFilter`].

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

static CANONICAL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("link[rel='canonical'][href]").expect("valid canonical selector")
});

/// Extracts absolute http(s) URLs linked from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - Fragment-only hrefs (same-page anchors)
/// - Anything that does not resolve to http/https
///
/// Duplicates are kept; deduplication belongs to the crawl frontier.
/// An unparsable `base_url` yields no links.
///
/// # Example
///
/// ```
/// use sitewatch::crawler::extract_links;
///
/// let html = br#"<a href="/about">About</a><a href="mailto:x@example.com">Mail</a>"#;
/// let links = extract_links(html, "https://example.com/");
/// assert_eq!(links, vec!["https://example.com/about".to_string()]);
/// ```
pub fn extract_links(body: &[u8], base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        tracing::debug!("Cannot extract links, invalid base URL: {}", base_url);
        return Vec::new();
    };

    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(absolute) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, &base))
        {
            links.push(absolute);
        }
    }

    for element in document.select(&CANONICAL_SELECTOR) {
        if let Some(absolute) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, &base))
        {
            links.push(absolute);
        }
    }

    links
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None for special schemes, fragment-only links and unresolvable
/// hrefs.
pub(crate) fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
