//! DNS resolution check for the site host

use crate::output::{append_summary, save_artifact, OutputResult, ReportSink};
use chrono::{DateTime, Utc};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;
use url::{Host, Url};

/// Artifact name of the DNS check
pub const DNS_CHECK_ARTIFACT: &str = "dns_check";

/// Per-query timeout of the PTR lookup
const REVERSE_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of resolving the site host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsCheckResult {
    pub host: String,
    /// First IPv4 address, if any
    pub ipv4: Option<String>,
    /// Every resolved address, sorted and deduplicated
    pub all_ips: Vec<String>,
    /// PTR name of `ipv4`, without the trailing dot
    #[serde(default)]
    pub reverse_dns: Option<String>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Resolves a host name (or IP literal) to its addresses
pub async fn resolve_host(host: &Host<&str>) -> std::io::Result<Vec<IpAddr>> {
    match host {
        Host::Ipv4(ip) => Ok(vec![IpAddr::V4(*ip)]),
        Host::Ipv6(ip) => Ok(vec![IpAddr::V6(*ip)]),
        Host::Domain(domain) => {
            let addrs = tokio::net::lookup_host((*domain, 0)).await?;
            let mut ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
            ips.sort();
            ips.dedup();
            Ok(ips)
        }
    }
}

/// Looks up the PTR name of `ip`
///
/// Any failure (no record, no resolver, timeout) yields `None`.
pub async fn reverse_lookup(ip: IpAddr) -> Option<String> {
    let (config, mut opts) = read_system_conf().unwrap_or_else(|e| {
        tracing::debug!("No system resolver configuration ({}), using defaults", e);
        (ResolverConfig::default(), ResolverOpts::default())
    });
    opts.timeout = REVERSE_LOOKUP_TIMEOUT;
    opts.attempts = 1;

    let resolver = TokioAsyncResolver::tokio(config, opts);
    match resolver.reverse_lookup(ip).await {
        Ok(lookup) => lookup
            .iter()
            .next()
            .map(|name| name.to_string().trim_end_matches('.').to_string()),
        Err(e) => {
            tracing::debug!("Reverse lookup of {} failed: {}", ip, e);
            None
        }
    }
}

/// Resolves the host of `site_url`
pub async fn check_dns(site_url: &str) -> DnsCheckResult {
    let url = match Url::parse(site_url) {
        Ok(url) => url,
        Err(e) => return failed(String::new(), format!("Invalid site URL: {}", e)),
    };

    let Some(host) = url.host() else {
        return failed(String::new(), "Site URL has no host".to_string());
    };
    let host_name = host.to_string();

    match resolve_host(&host).await {
        Ok(ips) if ips.is_empty() => failed(host_name, "No addresses returned".to_string()),
        Ok(ips) => {
            let ipv4 = ips.iter().copied().find(IpAddr::is_ipv4);
            tracing::debug!("{} resolved to {} address(es)", host_name, ips.len());

            let reverse_dns = match ipv4 {
                Some(ip) => reverse_lookup(ip).await,
                None => None,
            };

            DnsCheckResult {
                host: host_name,
                ipv4: ipv4.map(|ip| ip.to_string()),
                all_ips: ips.iter().map(IpAddr::to_string).collect(),
                reverse_dns,
                ok: true,
                error: None,
                timestamp: Utc::now(),
            }
        }
        Err(e) => {
            tracing::warn!("DNS lookup for {} failed: {}", host_name, e);
            failed(host_name, e.to_string())
        }
    }
}

fn failed(host: String, error: String) -> DnsCheckResult {
    DnsCheckResult {
        host,
        ipv4: None,
        all_ips: Vec::new(),
        reverse_dns: None,
        ok: false,
        error: Some(error),
        timestamp: Utc::now(),
    }
}

pub fn summary_lines(result: &DnsCheckResult) -> Vec<String> {
    let mut line = format!(
        "- DNS: host={} ipv4={} ok={}",
        result.host,
        result.ipv4.as_deref().unwrap_or("-"),
        result.ok
    );
    if let Some(error) = &result.error {
        line.push_str(&format!(" error={}", error));
    }
    vec![line]
}

/// Saves the `dns_check` artifact and appends its summary line
pub fn publish(sink: &dyn ReportSink, result: &DnsCheckResult) -> OutputResult<()> {
    save_artifact(sink, DNS_CHECK_ARTIFACT, result)?;
    append_summary(sink, &summary_lines(result))
}
