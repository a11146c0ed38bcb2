//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use sitewatch::config::Config;
use sitewatch::crawler::{CrawlEngine, CrawlReport, Fetcher, HttpFetcher};
use sitewatch::output::{publish_crawl_report, FileReportSink, SEO_CRAWLER_ARTIFACT, SUMMARY};
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(server: &MockServer, max_pages: u32) -> Config {
    let mut config = Config::for_site(format!("{}/", server.uri()));
    config.site.secondary_seed_path = String::new();
    config.crawler.max_pages = max_pages;
    config.crawler.request_timeout_secs = 5;
    config
}

/// An HTML response
fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

/// A page that passes every SEO rule, linking to `links`
fn good_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    format!(
        r#"<html><head>
        <title>A perfectly reasonable page title</title>
        <meta name="description" content="{}">
        <meta property="og:title" content="Page">
        <script type="application/ld+json">{{"@type": "WebPage"}}</script>
        </head><body>{}</body></html>"#,
        "d".repeat(130),
        anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn run_crawl(config: &Config) -> CrawlReport {
    CrawlEngine::from_config(config)
        .expect("Failed to build crawl engine")
        .run()
        .await
}

fn result_urls(report: &CrawlReport) -> Vec<String> {
    report
        .detailed_results
        .iter()
        .map(|page| page.url.clone())
        .collect()
}

#[tokio::test]
async fn test_breadth_first_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html(good_page(&["/a", "/b"]))).await;
    mount_page(&mock_server, "/a", html(good_page(&["/c", "/"]))).await;
    mount_page(&mock_server, "/b", html(good_page(&["/a"]))).await;
    mount_page(&mock_server, "/c", html(good_page(&[]))).await;

    let report = run_crawl(&create_test_config(&mock_server, 10)).await;

    assert_eq!(
        result_urls(&report),
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/c", base_url),
        ]
    );
    assert_eq!(report.total_pages_scanned, 4);
    assert_eq!(report.pages_with_seo_data, 4);
    assert!(report.is_clean());
    assert_eq!(report.global_warnings_count, 0);
    assert!(!report.cancelled);

    // Every page fetched exactly once
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_seed_page_findings_and_external_link() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html(
            r#"<html><head><title>Short page</title></head>
            <body><a href="https://external.example/page">out</a></body></html>"#,
        ),
    )
    .await;

    let report = run_crawl(&create_test_config(&mock_server, 10)).await;

    assert_eq!(report.total_pages_scanned, 1);
    assert_eq!(report.detailed_results.len(), 1);
    assert!(report.errors_by_url.is_empty());

    let page = &report.detailed_results[0];
    assert_eq!(page.issues, vec!["Missing meta description"]);
    assert_eq!(
        page.warnings,
        vec![
            "Title too short: 10 chars (recommend 30-60)",
            "Missing Open Graph tags",
            "No Schema.org JSON-LD",
        ]
    );
    assert!(!page.ok);
    assert_eq!(report.global_issues_count, 1);
    assert_eq!(report.global_warnings_count, 3);
}

#[tokio::test]
async fn test_non_html_is_skipped_not_scanned() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html(good_page(&["/report.pdf", "/a"]))).await;
    mount_page(
        &mock_server,
        "/report.pdf",
        ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
    )
    .await;
    mount_page(&mock_server, "/a", html(good_page(&[]))).await;

    let report = run_crawl(&create_test_config(&mock_server, 10)).await;

    assert_eq!(
        result_urls(&report),
        vec![format!("{}/", base_url), format!("{}/a", base_url)]
    );
    assert_eq!(report.total_pages_scanned, 2);
    assert!(report.errors_by_url.is_empty());
}

#[tokio::test]
async fn test_http_error_recorded_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // /missing is not mounted, so wiremock answers 404
    mount_page(&mock_server, "/", html(good_page(&["/missing", "/a"]))).await;
    mount_page(&mock_server, "/a", html(good_page(&[]))).await;

    let report = run_crawl(&create_test_config(&mock_server, 10)).await;

    assert_eq!(report.total_pages_scanned, 3);
    assert_eq!(report.pages_with_seo_data, 2);
    assert_eq!(report.errors_by_url.len(), 1);

    let error = &report.errors_by_url[0];
    assert_eq!(error.url, format!("{}/missing", base_url));
    assert_eq!(error.status, Some(404));
    assert_eq!(error.error, "HTTP 404");
}

#[tokio::test]
async fn test_page_budget_bounds_requests() {
    let mock_server = MockServer::start().await;

    let links: Vec<String> = (1..=9).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", html(good_page(&link_refs))).await;

    Mock::given(method("GET"))
        .respond_with(html(good_page(&[])))
        .mount(&mock_server)
        .await;

    let report = run_crawl(&create_test_config(&mock_server, 3)).await;

    assert_eq!(report.total_pages_scanned, 3);
    assert_eq!(report.detailed_results.len(), 3);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_links_resolved_against_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        ResponseTemplate::new(301).insert_header("location", "/docs/"),
    )
    .await;
    mount_page(&mock_server, "/docs/", html(good_page(&["intro"]))).await;
    mount_page(&mock_server, "/docs/intro", html(good_page(&[]))).await;

    let report = run_crawl(&create_test_config(&mock_server, 10)).await;

    assert!(result_urls(&report).contains(&format!("{}/docs/intro", base_url)));
    assert!(report.errors_by_url.is_empty());
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server, 1);

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", config.user_agent_string().as_str()))
        .respond_with(html(good_page(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_crawl(&config).await;
    assert_eq!(report.pages_with_seo_data, 1);
}

#[tokio::test]
async fn test_report_published_to_sink() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html("<html><head><title>Short page</title></head></html>"),
    )
    .await;

    let report = run_crawl(&create_test_config(&mock_server, 5)).await;

    let tmp = tempdir().unwrap();
    let sink = FileReportSink::new(tmp.path().join("reports"));
    publish_crawl_report(&sink, &report).unwrap();

    let json = std::fs::read_to_string(sink.json_path(SEO_CRAWLER_ARTIFACT)).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(saved["total_pages_scanned"], 1);
    assert_eq!(saved["global_issues_count"], 1);
    assert_eq!(saved["detailed_results"][0]["meta_tags"]["title"], "Short page");

    let summary = std::fs::read_to_string(sink.markdown_path(SUMMARY)).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "- SEO Crawler: scanned=1 issues=1 warnings=3");
    assert_eq!(lines[1], "  Top issues:");
    assert!(lines[2].ends_with(": Missing meta description"));
    assert_eq!(lines[3], "  Top warnings:");
}

#[tokio::test]
async fn test_unreachable_site_yields_error_not_panic() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server, 5);
    drop(mock_server);

    let report = run_crawl(&config).await;

    assert_eq!(report.total_pages_scanned, 1);
    assert!(report.detailed_results.is_empty());
    assert_eq!(report.errors_by_url.len(), 1);
    assert_eq!(report.errors_by_url[0].status, None);
}

#[tokio::test]
async fn test_crawl_fetcher_skips_non_html_bodies() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/video.mp4",
        ResponseTemplate::new(200).set_body_raw(vec![7u8; 50_000], "video/mp4"),
    )
    .await;
    mount_page(&mock_server, "/page", html(good_page(&[]))).await;

    let config = create_test_config(&mock_server, 10);
    let fetcher = HttpFetcher::from_config(&config)
        .expect("Failed to build HTTP client")
        .html_bodies_only();

    let video = fetcher.fetch(&format!("{}/video.mp4", base_url)).await.unwrap();
    assert_eq!(video.status, 200);
    assert_eq!(video.content_type(), "video/mp4");
    assert!(video.body.is_empty());

    // Error pages are not read either
    let missing = fetcher.fetch(&format!("{}/missing", base_url)).await.unwrap();
    assert_eq!(missing.status, 404);
    assert!(missing.body.is_empty());

    let page = fetcher.fetch(&format!("{}/page", base_url)).await.unwrap();
    assert!(page.is_html());
    assert_eq!(page.body, good_page(&[]).into_bytes());
}

#[tokio::test]
async fn test_body_capped_at_max_body_bytes() {
    let mock_server = MockServer::start().await;
    let body = format!("<html><title>Big</title>{}</html>", "x".repeat(5000));
    mount_page(&mock_server, "/", html(body.clone())).await;

    let mut config = create_test_config(&mock_server, 1);
    config.crawler.max_body_bytes = 1000;
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build HTTP client");

    let page = fetcher.fetch(&config.site.url).await.unwrap();
    assert_eq!(page.body.len(), 1000);
    assert_eq!(page.body, body.as_bytes()[..1000].to_vec());

    // The title sits in the kept prefix, so the crawl still audits it
    let report = run_crawl(&config).await;
    assert_eq!(report.detailed_results[0].meta_tags.title.as_deref(), Some("Big"));
}
