//! Image asset check
//!
//! Finds the images referenced by the homepage and fetches a bounded number
//! of them, reporting broken images and large images served in legacy
//! formats.

use crate::config::ImageConfig;
use crate::crawler::{resolve_link, Fetcher};
use crate::output::{append_summary, save_artifact, OutputResult, ReportSink};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Artifact name of the image check
pub const IMAGE_CHECK_ARTIFACT: &str = "image_check";

/// Content types considered modern image formats
const MODERN_FORMATS: &[&str] = &["image/webp", "image/avif"];

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*\ssrc=["']([^"']+)["']"#).expect("valid img src regex")
});

static IMG_SRC_UNQUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*\ssrc=([^\s>"']+)"#).expect("valid unquoted img src regex")
});

static IMG_SRCSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*\ssrcset=["']([^"']+)["']"#).expect("valid img srcset regex")
});

static BACKGROUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)background-image:\s*url\(["']?([^"')]+)["']?\)"#)
        .expect("valid background-image regex")
});

/// An image that could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIssue {
    pub url: String,
    pub error: String,
}

/// A large image in a legacy format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageWarning {
    pub url: String,
    pub size_kb: f64,
    pub format: String,
}

/// What was learned about a reachable image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub content_type: String,
    pub size_bytes: usize,
    pub is_modern_format: bool,
}

/// Result of the image check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCheckResult {
    pub total_images_found: usize,
    pub images_checked: usize,
    pub issues: Vec<ImageIssue>,
    pub warnings: Vec<ImageWarning>,
    pub ok: bool,
    /// Set when the homepage itself could not be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ImageCheckResult {
    fn failed(error: String) -> Self {
        Self {
            total_images_found: 0,
            images_checked: 0,
            issues: Vec::new(),
            warnings: Vec::new(),
            ok: false,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }
}

/// Extracts image URLs referenced by an HTML page
///
/// Sources: `<img src>` (quoted or bare), every candidate of `<img srcset>`,
/// and inline `background-image: url(...)`. URLs are resolved against
/// `base_url`, `data:` URIs are dropped, and duplicates are removed keeping
/// first-seen order.
pub fn extract_images(html: &[u8], base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };

    let text = String::from_utf8_lossy(html);
    let mut candidates: Vec<&str> = Vec::new();

    for re in [&*IMG_SRC_RE, &*IMG_SRC_UNQUOTED_RE] {
        candidates.extend(re.captures_iter(&text).filter_map(|c| c.get(1)).map(|m| m.as_str()));
    }

    for caps in IMG_SRCSET_RE.captures_iter(&text) {
        if let Some(srcset) = caps.get(1) {
            candidates.extend(
                srcset
                    .as_str()
                    .split(',')
                    .filter_map(|candidate| candidate.split_whitespace().next()),
            );
        }
    }

    candidates.extend(
        BACKGROUND_RE
            .captures_iter(&text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str()),
    );

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|candidate| resolve_link(candidate, &base))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Fetches one image and classifies it
pub async fn check_image<F: Fetcher>(fetcher: &F, url: &str) -> Result<ImageInfo, String> {
    let response = fetcher.fetch(url).await.map_err(|e| e.to_string())?;

    if response.status != 200 {
        return Err(format!("HTTP {}", response.status));
    }

    let content_type = response.content_type().to_string();
    if !content_type.starts_with("image/") {
        return Err(format!("Not an image: {}", content_type));
    }

    let is_modern_format = MODERN_FORMATS
        .iter()
        .any(|format| content_type.contains(format));

    Ok(ImageInfo {
        content_type,
        size_bytes: response.content_length().unwrap_or(response.body.len()),
        is_modern_format,
    })
}

/// Runs the image check against the page at `site_url`
pub async fn check_images<F: Fetcher>(
    fetcher: &F,
    site_url: &str,
    config: &ImageConfig,
) -> ImageCheckResult {
    let page = match fetcher.fetch(site_url).await {
        Ok(page) if page.status == 200 => page,
        Ok(page) => {
            return ImageCheckResult::failed(format!(
                "Failed to fetch homepage: HTTP {}",
                page.status
            ))
        }
        Err(e) => return ImageCheckResult::failed(format!("Failed to fetch homepage: {}", e)),
    };

    let images = extract_images(&page.body, &page.url);
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut checked = 0;

    for url in images.iter().take(config.max_images) {
        checked += 1;

        match check_image(fetcher, url).await {
            Err(error) => {
                tracing::debug!("Broken image {}: {}", url, error);
                issues.push(ImageIssue {
                    url: url.clone(),
                    error,
                });
            }
            Ok(info) if info.size_bytes > config.large_image_bytes && !info.is_modern_format => {
                warnings.push(ImageWarning {
                    url: url.clone(),
                    size_kb: (info.size_bytes as f64 / 1024.0 * 10.0).round() / 10.0,
                    format: info.content_type,
                });
            }
            Ok(_) => {}
        }
    }

    ImageCheckResult {
        total_images_found: images.len(),
        images_checked: checked,
        ok: issues.is_empty(),
        issues,
        warnings,
        error: None,
        timestamp: Utc::now(),
    }
}

/// Summary line for the image check
pub fn summary_lines(result: &ImageCheckResult) -> Vec<String> {
    let mut line = format!(
        "- Images: found={} checked={} issues={} warnings={}",
        result.total_images_found,
        result.images_checked,
        result.issues.len(),
        result.warnings.len()
    );
    if let Some(error) = &result.error {
        line.push_str(&format!(" error={}", error));
    }
    vec![line]
}

/// Saves the `image_check` artifact and appends its summary line
pub fn publish(sink: &dyn ReportSink, result: &ImageCheckResult) -> OutputResult<()> {
    save_artifact(sink, IMAGE_CHECK_ARTIFACT, result)?;
    append_summary(sink, &summary_lines(result))
}
