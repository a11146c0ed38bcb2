//! Configuration module for Sitewatch
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, with environment variable overrides (`SITE_URL`, `MAX_PAGES_CRAWL`,
//! `REQUEST_TIMEOUT_SECS`, `REPORTS_DIR`).
//!
//! # Example
//!
//! ```no_run
//! use sitewatch::config::{load, Overrides};
//! use std::path::Path;
//!
//! let config = load(Some(Path::new("sitewatch.toml")), &Overrides::default()).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, ImageConfig, OutputConfig, SiteConfig, UptimeConfig, UptimeTarget,
    UserAgentConfig, DEFAULT_MAX_PAGES,
};

pub use parser::{
    load, Overrides, ENV_MAX_PAGES, ENV_REPORTS_DIR, ENV_REQUEST_TIMEOUT, ENV_SITE_URL,
};
pub use validation::validate;
