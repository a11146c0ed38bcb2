//! SEO metadata extraction
//!
//! Pattern matching over raw markup: title, meta description, Open Graph
//! properties and JSON-LD blocks. Malformed HTML simply yields fewer matches;
//! a missing field is itself the finding, so extraction never fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Open Graph properties looked up on every page
pub const OPEN_GRAPH_PROPERTIES: [&str; 5] = ["title", "description", "image", "url", "type"];

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("valid title regex"));

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name=["']description["']\s+content=["']([^"']+)["']"#)
        .expect("valid description regex")
});

static OPEN_GRAPH_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    OPEN_GRAPH_PROPERTIES
        .iter()
        .map(|name| {
            let pattern = format!(
                r#"(?i)<meta\s+property=["']og:{}["']\s+content=["']([^"']+)["']"#,
                name
            );
            (*name, Regex::new(&pattern).expect("valid open graph regex"))
        })
        .collect()
});

static JSON_LD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\s+type=["']application/ld\+json["']>(.*?)</script>"#)
        .expect("valid json-ld regex")
});

/// SEO metadata found on one page
///
/// Absent fields are omitted when serialized; absence is distinct from an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Open Graph property (without the `og:` prefix) to content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og: Option<BTreeMap<String, String>>,

    /// Number of `application/ld+json` script blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_ld_count: Option<usize>,
}

impl MetaTags {
    /// Title, ignoring an empty `<title></title>`
    pub fn non_empty_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Description, ignoring a whitespace-only value
    pub fn non_empty_description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn has_open_graph(&self) -> bool {
        self.og.as_ref().is_some_and(|og| !og.is_empty())
    }

    pub fn json_ld_count(&self) -> usize {
        self.schema_ld_count.unwrap_or(0)
    }
}

/// Extracts the SEO metadata from raw HTML bytes
///
/// The body is decoded as UTF-8, replacing invalid sequences.
///
/// # Example
///
/// ```
/// use sitewatch::crawler::extract_meta_tags;
///
/// let meta = extract_meta_tags(b"<html><title> Home </title></html>");
/// assert_eq!(meta.title.as_deref(), Some("Home"));
/// assert!(meta.og.is_none());
/// ```
pub fn extract_meta_tags(html: &[u8]) -> MetaTags {
    let text = String::from_utf8_lossy(html);

    let title = first_capture(&TITLE_RE, &text);
    let description = first_capture(&DESCRIPTION_RE, &text);

    let og: BTreeMap<String, String> = OPEN_GRAPH_RES
        .iter()
        .filter_map(|(name, re)| first_capture(re, &text).map(|value| (name.to_string(), value)))
        .collect();

    let schema_ld_count = JSON_LD_RE.find_iter(&text).count();

    MetaTags {
        title,
        description,
        og: (!og.is_empty()).then_some(og),
        schema_ld_count: (schema_ld_count > 0).then_some(schema_ld_count),
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
