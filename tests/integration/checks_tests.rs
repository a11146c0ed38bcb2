//! Integration tests for the one-shot checks
//!
//! HTTP checks run against wiremock servers; the DNS check uses IP literals
//! so it does not depend on the forward resolver.

use sitewatch::checks::{
    check_images, check_page, check_uptime, run_dns_check, run_image_check, run_seo_check,
    run_uptime_check, SiteStatus, DNS_CHECK_ARTIFACT, IMAGE_CHECK_ARTIFACT, SEO_CHECK_ARTIFACT,
    UPTIME_CHECK_ARTIFACT,
};
use sitewatch::config::{Config, ImageConfig, UptimeTarget};
use sitewatch::crawler::HttpFetcher;
use sitewatch::output::{FileReportSink, SUMMARY};
use std::fs;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site_config(server: &MockServer) -> Config {
    let mut config = Config::for_site(format!("{}/", server.uri()));
    config.crawler.request_timeout_secs = 5;
    config
}

fn fetcher(config: &Config) -> HttpFetcher {
    HttpFetcher::from_config(config).expect("Failed to build HTTP client")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

fn image(bytes: usize, mime: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(vec![0u8; bytes], mime)
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seo_check_reports_findings() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        html(r#"<html><head><meta name="description" content="Too short"></head></html>"#),
    )
    .await;

    let config = site_config(&mock_server);
    let result = check_page(&fetcher(&config), &config.site.url).await;

    assert_eq!(result.status, Some(200));
    assert_eq!(result.issues, vec!["Missing <title> tag"]);
    assert_eq!(
        result.warnings,
        vec![
            "Description too short: 9 chars (recommend 120-160)",
            "Missing Open Graph tags (Facebook/LinkedIn sharing)",
            "No Schema.org JSON-LD structured data",
        ]
    );
    assert!(!result.ok);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_seo_check_audits_error_pages() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        ResponseTemplate::new(500)
            .set_body_raw("<title>Internal error</title>".to_string(), "text/html"),
    )
    .await;

    let config = site_config(&mock_server);
    let result = check_page(&fetcher(&config), &config.site.url).await;

    assert_eq!(result.status, Some(500));
    assert_eq!(result.meta_tags.title.as_deref(), Some("Internal error"));
}

#[tokio::test]
async fn test_seo_check_published() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html("<title>Home</title>")).await;

    let config = site_config(&mock_server);
    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path());

    run_seo_check(&config, &sink).await.unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(sink.json_path(SEO_CHECK_ARTIFACT)).unwrap())
            .unwrap();
    assert_eq!(saved["status"], 200);
    assert_eq!(saved["ok"], false);

    let summary = fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    assert!(summary.starts_with("- SEO: status=200 issues=1 warnings=3\n  Issues:\n"));
}

#[tokio::test]
async fn test_image_check_classifies_images() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        html(
            r#"<html><body>
            <img src="/hero.webp">
            <img src="/large.png">
            <img src="/small.png">
            <img src="/missing.png">
            <img src="/page.png">
            </body></html>"#,
        ),
    )
    .await;
    mount(&mock_server, "/hero.webp", image(600_000, "image/webp")).await;
    mount(&mock_server, "/large.png", image(600_000, "image/png")).await;
    mount(&mock_server, "/small.png", image(2_000, "image/png")).await;
    mount(&mock_server, "/page.png", html("<p>not an image</p>")).await;

    let config = site_config(&mock_server);
    let result = check_images(&fetcher(&config), &config.site.url, &config.images).await;

    assert_eq!(result.total_images_found, 5);
    assert_eq!(result.images_checked, 5);
    assert!(!result.ok);

    let base = mock_server.uri();
    assert_eq!(result.issues.len(), 2);
    assert_eq!(result.issues[0].url, format!("{}/missing.png", base));
    assert_eq!(result.issues[0].error, "HTTP 404");
    assert_eq!(result.issues[1].url, format!("{}/page.png", base));
    assert!(result.issues[1].error.starts_with("Not an image: text/html"));

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].url, format!("{}/large.png", base));
    assert_eq!(result.warnings[0].format, "image/png");
    assert_eq!(result.warnings[0].size_kb, 585.9);
}

#[tokio::test]
async fn test_image_check_respects_limit() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        html(r#"<img src="/1.png"><img src="/2.png"><img src="/3.png">"#),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(image(100, "image/png"))
        .mount(&mock_server)
        .await;

    let config = site_config(&mock_server);
    let limits = ImageConfig {
        max_images: 2,
        ..ImageConfig::default()
    };
    let result = check_images(&fetcher(&config), &config.site.url, &limits).await;

    assert_eq!(result.total_images_found, 3);
    assert_eq!(result.images_checked, 2);
    assert!(result.ok);

    // Homepage plus two images
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_image_check_homepage_failure() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", ResponseTemplate::new(503)).await;

    let config = site_config(&mock_server);
    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path());

    let result = run_image_check(&config, &sink).await.unwrap();

    assert!(!result.ok);
    assert_eq!(
        result.error.as_deref(),
        Some("Failed to fetch homepage: HTTP 503")
    );
    assert!(sink.json_path(IMAGE_CHECK_ARTIFACT).exists());

    let summary = fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    assert_eq!(
        summary,
        "- Images: found=0 checked=0 issues=0 warnings=0 error=Failed to fetch homepage: HTTP 503\n"
    );
}

#[tokio::test]
async fn test_dns_check_published() {
    let config = Config::for_site("http://127.0.0.1:9/");
    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path());

    let result = run_dns_check(&config, &sink).await.unwrap();
    assert!(result.ok);

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(sink.json_path(DNS_CHECK_ARTIFACT)).unwrap())
            .unwrap();
    assert_eq!(saved["host"], "127.0.0.1");
    assert_eq!(saved["ipv4"], "127.0.0.1");
    assert_eq!(saved["all_ips"][0], "127.0.0.1");

    let summary = fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    assert_eq!(summary, "- DNS: host=127.0.0.1 ipv4=127.0.0.1 ok=true\n");
}

#[tokio::test]
async fn test_checks_share_one_summary() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html("<title>Home</title>")).await;

    let config = site_config(&mock_server);
    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path());

    run_image_check(&config, &sink).await.unwrap();
    run_dns_check(&config, &sink).await.unwrap();

    let summary = fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("- Images: found=0 checked=0"));
    assert!(lines[1].starts_with("- DNS: host=127.0.0.1"));
}

fn uptime_target(name: &str, url: String, expected_status: u16) -> UptimeTarget {
    UptimeTarget {
        name: name.to_string(),
        url,
        expected_status,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_uptime_check_over_http() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html("<title>Home</title>")).await;
    mount(&mock_server, "/health", ResponseTemplate::new(204)).await;
    mount(&mock_server, "/broken", ResponseTemplate::new(500)).await;

    let dead_server = MockServer::start().await;
    let dead_url = format!("{}/", dead_server.uri());
    drop(dead_server);

    let base = mock_server.uri();
    let targets = vec![
        uptime_target("home", format!("{}/", base), 200),
        uptime_target("health", format!("{}/health", base), 204),
        uptime_target("broken", format!("{}/broken", base), 200),
        uptime_target("dead", dead_url, 200),
    ];

    let config = site_config(&mock_server);
    let result = check_uptime(&fetcher(&config), &targets).await;

    assert_eq!(result.summary.total_sites, 4);
    assert_eq!(result.summary.healthy_sites, 2);
    assert_eq!(result.summary.uptime_percentage, 50.0);
    assert!(!result.all_healthy());

    let broken = &result.results[2];
    assert_eq!(broken.status, SiteStatus::Online);
    assert_eq!(broken.status_code, Some(500));
    assert_eq!(broken.error.as_deref(), Some("Status code 500 != 200"));

    let dead = &result.results[3];
    assert_eq!(dead.status, SiteStatus::ConnectionError);
    assert_eq!(dead.status_code, None);
    assert!(!dead.healthy);
}

#[tokio::test]
async fn test_uptime_check_defaults_to_site_url() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html("<title>Home</title>")).await;

    let config = site_config(&mock_server);
    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path());

    let result = run_uptime_check(&config, &sink).await.unwrap();
    assert!(result.all_healthy());
    assert_eq!(result.results[0].name, "site");
    assert_eq!(result.results[0].status_code, Some(200));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(sink.json_path(UPTIME_CHECK_ARTIFACT)).unwrap())
            .unwrap();
    assert_eq!(saved["summary"]["uptime_percentage"], 100.0);
    assert_eq!(saved["results"][0]["status"], "online");

    let summary = fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    assert_eq!(summary, "- Uptime: healthy=1/1 uptime=100%\n");
}

#[tokio::test]
async fn test_uptime_summary_lists_unhealthy_targets() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", ResponseTemplate::new(503)).await;

    let config = site_config(&mock_server);
    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path());

    let result = run_uptime_check(&config, &sink).await.unwrap();
    assert!(!result.all_healthy());

    let summary = fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    assert_eq!(
        summary,
        format!(
            "- Uptime: healthy=0/1 uptime=0%\n    - site ({}/): Status code 503 != 200\n",
            mock_server.uri()
        )
    );
}

#[tokio::test]
async fn test_large_image_size_from_content_length() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html(r#"<img src="/big.png">"#)).await;
    mount(&mock_server, "/big.png", image(600_000, "image/png")).await;

    // Bodies are cut at 1 KiB, but the declared length still counts
    let mut config = site_config(&mock_server);
    config.crawler.max_body_bytes = 1024;
    let result = check_images(&fetcher(&config), &config.site.url, &config.images).await;

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].size_kb, 585.9);
}
