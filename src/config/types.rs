use serde::Deserialize;

/// Default page budget for a single crawl run
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Main configuration structure for Sitewatch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub uptime: UptimeConfig,
}

/// The site under test
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Seed URL for every check (homepage)
    pub url: String,

    /// Extra seed path used when `url` points at the site root
    ///
    /// An empty string disables the secondary seed.
    #[serde(rename = "secondary-seed-path", default = "default_secondary_seed_path")]
    pub secondary_seed_path: String,

    /// Additional hosts the crawler may follow links into
    /// (e.g. "blog.example.com" or "*.example.com")
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of visit attempts in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Total timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout for a single request (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whether a URL that turned out not to be HTML may be attempted again
    /// when rediscovered on a later page
    #[serde(rename = "revisit-skipped", default = "default_true")]
    pub revisit_skipped: bool,

    /// Maximum number of body bytes read from one response
    #[serde(rename = "max-body-bytes", default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `<name>.json` artifacts and `<name>.md` summaries
    #[serde(rename = "reports-dir", default = "default_reports_dir")]
    pub reports_dir: String,
}

/// Image check configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// Maximum number of images fetched per run
    #[serde(rename = "max-images", default = "default_max_images")]
    pub max_images: usize,

    /// Size above which a non-WebP/AVIF image is reported
    #[serde(rename = "large-image-bytes", default = "default_large_image_bytes")]
    pub large_image_bytes: usize,
}

/// Uptime check configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UptimeConfig {
    /// Endpoints to check; the site URL alone when empty
    #[serde(default)]
    pub sites: Vec<UptimeTarget>,
}

/// One endpoint watched by the uptime check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UptimeTarget {
    pub name: String,
    pub url: String,

    #[serde(rename = "expected-status", default = "default_expected_status")]
    pub expected_status: u16,

    /// Response time limit (seconds); slower responses are unhealthy
    #[serde(rename = "timeout-secs", default = "default_uptime_timeout")]
    pub timeout_secs: u64,
}

impl Config {
    /// Builds a configuration for `site_url` with every other setting at its default
    pub fn for_site(site_url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                url: site_url.into(),
                secondary_seed_path: default_secondary_seed_path(),
                allowed_domains: Vec::new(),
            },
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            images: ImageConfig::default(),
            uptime: UptimeConfig::default(),
        }
    }

    /// Endpoints for the uptime check
    ///
    /// Falls back to the site URL, expecting a 200 within the request timeout.
    pub fn uptime_targets(&self) -> Vec<UptimeTarget> {
        if !self.uptime.sites.is_empty() {
            return self.uptime.sites.clone();
        }

        vec![UptimeTarget {
            name: "site".to_string(),
            url: self.site.url.clone(),
            expected_status: default_expected_status(),
            timeout_secs: self.crawler.request_timeout_secs,
        }]
    }

    /// Formats the User-Agent header value
    pub fn user_agent_string(&self) -> String {
        format!("{}/{}", self.user_agent.name, self.user_agent.version)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            revisit_skipped: true,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
            large_image_bytes: default_large_image_bytes(),
        }
    }
}

fn default_secondary_seed_path() -> String {
    "/en/".to_string()
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_request_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_agent_name() -> String {
    "sitewatch".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_max_images() -> usize {
    20
}

fn default_large_image_bytes() -> usize {
    500_000
}

fn default_expected_status() -> u16 {
    200
}

fn default_uptime_timeout() -> u64 {
    10
}
