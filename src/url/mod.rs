//! URL handling module for Sitewatch
//!
//! This module provides URL normalization, allow-list matching, and the
//! filter deciding which discovered links the crawler may follow.

mod matcher;
mod normalize;

use crate::config::Config;
use crate::{UrlError, UrlResult};
use url::Url;

pub use matcher::matches_wildcard;
pub use normalize::normalize_url;

/// Decides whether a discovered URL is eligible for the crawl frontier
///
/// A URL is allowed when it is http(s) and either shares the site's host and
/// port, or its host matches one of the configured allow-list patterns.
/// The scheme may differ from the site's (http links on an https site are
/// followed).
#[derive(Debug, Clone)]
pub struct UrlFilter {
    host: String,
    port: Option<u16>,
    allowed_domains: Vec<String>,
}

impl UrlFilter {
    /// Creates a filter for the site rooted at `site_url`
    pub fn new(site_url: &str, allowed_domains: Vec<String>) -> UrlResult<Self> {
        let site = normalize_url(site_url)?;
        let host = site.host_str().ok_or(UrlError::MissingDomain)?.to_string();

        Ok(Self {
            host,
            port: site.port(),
            allowed_domains,
        })
    }

    /// Creates a filter from the site section of the configuration
    pub fn from_config(config: &Config) -> UrlResult<Self> {
        Self::new(&config.site.url, config.site.allowed_domains.clone())
    }

    /// Returns the host the crawl is anchored to
    pub fn site_host(&self) -> &str {
        &self.host
    }

    /// Returns true if `url` may be enqueued
    pub fn is_allowed(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.is_allowed_url(&parsed),
            Err(_) => false,
        }
    }

    /// Same as [`is_allowed`](Self::is_allowed) for an already parsed URL
    pub fn is_allowed_url(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };

        if host == self.host && url.port() == self.port {
            return true;
        }

        self.allowed_domains
            .iter()
            .any(|pattern| matches_wildcard(pattern, host))
    }
}
