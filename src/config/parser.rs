use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// Environment variable holding the seed URL
pub const ENV_SITE_URL: &str = "SITE_URL";
/// Environment variable holding the crawl page budget
pub const ENV_MAX_PAGES: &str = "MAX_PAGES_CRAWL";
/// Environment variable holding the request timeout in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT_SECS";
/// Environment variable holding the reports directory
pub const ENV_REPORTS_DIR: &str = "REPORTS_DIR";

/// Settings given on the command line
///
/// These take precedence over both the config file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub site_url: Option<String>,
    pub max_pages: Option<u32>,
}

/// Loads the configuration from `path` if given, otherwise from the environment
///
/// A `.env` file in the working directory is loaded first if present.
/// Environment overrides (`SITE_URL`, `MAX_PAGES_CRAWL`,
/// `REQUEST_TIMEOUT_SECS`, `REPORTS_DIR`) are applied after parsing, then
/// `overrides`, then the result is validated. Without a file, `SITE_URL`
/// (or `overrides.site_url`) is required and everything else falls back to
/// defaults.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitewatch::config::{load, Overrides};
///
/// let config = load(Some(Path::new("sitewatch.toml")), &Overrides::default()).unwrap();
/// println!("Page budget: {}", config.crawler.max_pages);
/// ```
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    load_with_lookup(path, overrides, env_lookup)
}

fn load_with_lookup<F>(
    path: Option<&Path>,
    overrides: &Overrides,
    lookup: F,
) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match (path, &overrides.site_url) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        (None, Some(url)) => Config::for_site(url.clone()),
        (None, None) => {
            let site_url = lookup(ENV_SITE_URL)
                .ok_or_else(|| ConfigError::Missing(format!("{} must be set", ENV_SITE_URL)))?;
            Config::for_site(site_url)
        }
    };

    let mut config = apply_overrides(base, lookup)?;

    if let Some(url) = &overrides.site_url {
        config.site.url = url.clone();
    }
    if let Some(max_pages) = overrides.max_pages {
        config.crawler.max_pages = max_pages;
    }

    validate(&config)?;
    Ok(config)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Applies environment overrides on top of a parsed configuration
fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_SITE_URL) {
        config.site.url = url;
    }

    if let Some(raw) = lookup(ENV_MAX_PAGES) {
        config.crawler.max_pages = parse_env(ENV_MAX_PAGES, &raw)?;
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
        config.crawler.request_timeout_secs = parse_env(ENV_REQUEST_TIMEOUT, &raw)?;
    }

    if let Some(dir) = lookup(ENV_REPORTS_DIR) {
        config.output.reports_dir = dir;
    }

    Ok(config)
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
