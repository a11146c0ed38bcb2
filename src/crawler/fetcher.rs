//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the checks:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests returning status, headers and a size-capped body
//! - Classifying transport failures
//!
//! The [`Fetcher`] trait is the seam between the crawl logic and the network;
//! tests substitute in-memory implementations.

use crate::config::Config;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure of a single fetch
///
/// HTTP error statuses are not transport failures; they are returned as a
/// normal [`FetchedPage`] and judged by the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A completed HTTP exchange
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Response headers (case-insensitive lookup)
    pub headers: HeaderMap,

    /// Raw body bytes, possibly truncated or left empty by the fetcher
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Returns the Content-Type header value, or "" when absent or not ASCII
    pub fn content_type(&self) -> &str {
        content_type(&self.headers)
    }

    /// Returns true if the Content-Type is prefixed by `text/html`
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.headers)
    }

    /// Returns the declared Content-Length, if any
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Returns true if the headers declare a `text/html` body (case-insensitive)
fn is_html_content_type(headers: &HeaderMap) -> bool {
    content_type(headers)
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("text/html")
}

/// Performs one HTTP GET with a bounded timeout
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// [`Fetcher`] backed by a `reqwest` client
///
/// Status and headers are inspected before any of the body is read. Bodies
/// are streamed chunk by chunk and cut off at `max_body_bytes`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
    html_bodies_only: bool,
}

impl HttpFetcher {
    /// Wraps an existing client, reading bodies without a size cap
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_body_bytes: usize::MAX,
            html_bodies_only: false,
        }
    }

    /// Builds a fetcher from the configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        build_http_client(config)
            .map(|client| Self::new(client).with_max_body_bytes(config.crawler.max_body_bytes))
    }

    /// Caps the number of body bytes kept per response
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Only reads bodies of `200` responses declaring `text/html`
    ///
    /// Other responses come back with an empty body. The crawler never looks
    /// at those bodies, so there is no point downloading them.
    pub fn html_bodies_only(mut self) -> Self {
        self.html_bodies_only = true;
        self
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        let request = self.client.get(url);
        let max_body_bytes = self.max_body_bytes;
        let html_bodies_only = self.html_bodies_only;

        async move {
            let mut response = request.send().await?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let headers = response.headers().clone();

            let wants_body = !html_bodies_only || (status == 200 && is_html_content_type(&headers));

            let mut body = Vec::new();
            if wants_body {
                while let Some(chunk) = response.chunk().await? {
                    if body.len() + chunk.len() > max_body_bytes {
                        let room = max_body_bytes - body.len();
                        body.extend_from_slice(&chunk[..room]);
                        tracing::debug!(
                            "Body of {} truncated at {} bytes",
                            final_url,
                            max_body_bytes
                        );
                        break;
                    }
                    body.extend_from_slice(&chunk);
                }
            } else {
                tracing::trace!("Not reading body of {} (status {})", final_url, status);
            }

            Ok(FetchedPage {
                url: final_url,
                status,
                headers,
                body,
            })
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Every request made through the client carries both a connect timeout and
/// a total request timeout, so no fetch can block a run indefinitely.
///
/// # Example
///
/// ```no_run
/// use sitewatch::config::Config;
/// use sitewatch::crawler::build_http_client;
///
/// let config = Config::for_site("https://example.com/");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}
