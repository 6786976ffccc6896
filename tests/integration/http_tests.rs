//! HTTP tests
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! blocking page reader and the full `crawl_site` cycle end-to-end. Blocking
//! work runs under `spawn_blocking` so it never stalls the mock server.

use sitewalk::config::{Config, HttpConfig};
use sitewalk::crawler::{crawl_site, HttpPageReader, PageReader, PageResponse};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Fetches `url` with a reader built from `config` on a blocking thread
async fn fetch_blocking(config: HttpConfig, url: String) -> PageResponse {
    tokio::task::spawn_blocking(move || {
        let reader = HttpPageReader::new(&config).expect("Failed to build reader");
        reader.fetch(&url)
    })
    .await
    .expect("fetch task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(html(
            r#"<html><body>
            <a href="/docs/intro.html">Intro</a>
            <a href="/docs/api/">API</a>
            <a href="/docs/gone">Gone</a>
            <a href="/blog">Blog</a>
            <a href="https://other.org/docs/x">Elsewhere</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/intro.html"))
        .respond_with(html(r#"<a href="../docs">Up</a><a href="setup.html">Setup</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/setup.html"))
        .respond_with(html("<p>Setup</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/api/"))
        .respond_with(html(r#"<a href="/docs">Docs</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(html("<p>Not part of the crawl</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let summary_path = dir.path().join("summary.md");

    let mut config = Config::default();
    config.crawler.workers = 3;
    config.output.summary_path = Some(summary_path.display().to_string());

    let seed = format!("{}/docs", mock_server.uri());
    let stats = tokio::task::spawn_blocking(move || crawl_site(&config, &seed))
        .await
        .expect("crawl task panicked")
        .expect("crawl failed");

    assert_eq!(stats.pages_fetched, 5);
    assert_eq!(stats.pages_succeeded, 4);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_by_status.get(&404), Some(&1));
    assert_eq!(stats.pages_by_depth.get(&3), Some(&1));
    assert!(stats.failed_urls[0].0.ends_with("/docs/gone"));
    assert!(stats.finished_at.is_some());

    let summary = std::fs::read_to_string(&summary_path).expect("summary not written");
    assert!(summary.contains("# Sitewalk Crawl Summary"));
    assert!(summary.contains("- **Pages Fetched**: 5"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_crawl_site_invalid_seed() {
    let result = tokio::task::spawn_blocking(|| crawl_site(&Config::default(), "not-a-url"))
        .await
        .expect("crawl task panicked");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("invalid url: not-a-url"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reader_returns_body_and_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page.html"))
        .respond_with(html("<h1>Hello</h1>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&mock_server)
        .await;

    let ok = fetch_blocking(
        HttpConfig::default(),
        format!("{}/page.html", mock_server.uri()),
    )
    .await;
    assert_eq!(ok, PageResponse::new(200, "<h1>Hello</h1>"));

    let busy = fetch_blocking(HttpConfig::default(), format!("{}/busy", mock_server.uri())).await;
    assert_eq!(busy.status, 503);
    assert_eq!(busy.body, "try later");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reader_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "sitewalk-test/1.0"))
        .respond_with(html("ok"))
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        user_agent: "sitewalk-test/1.0".to_string(),
        ..HttpConfig::default()
    };
    let response = fetch_blocking(config, format!("{}/", mock_server.uri())).await;

    assert_eq!(response.status, 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reader_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("moved here"))
        .mount(&mock_server)
        .await;

    let response = fetch_blocking(HttpConfig::default(), format!("{}/old", mock_server.uri())).await;

    assert_eq!(response, PageResponse::new(200, "moved here"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reader_timeout_maps_to_408() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        timeout_ms: 300,
        connect_timeout_ms: 300,
        ..HttpConfig::default()
    };
    let response = fetch_blocking(config, format!("{}/slow", mock_server.uri())).await;

    assert_eq!(response, PageResponse::failed(408));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reader_rejects_oversized_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/huge"))
        .respond_with(html(&"x".repeat(4096)))
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        max_body_bytes: 1024,
        ..HttpConfig::default()
    };
    let response = fetch_blocking(config, format!("{}/huge", mock_server.uri())).await;

    assert_eq!(response, PageResponse::failed(500));
}
