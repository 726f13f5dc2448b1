//! Integration tests for the HTTP fetcher
//!
//! These tests use wiremock to stand up a mock HTTP server and exercise the
//! fetcher on its own and as the fetcher of a full crawl session.

use fathom::config::{CrawlConfig, Quotas};
use fathom::crawler::{run_session, CompletionCause};
use fathom::fetcher::{build_http_client, HttpFetcher};
use fathom::{FetchError, Fetcher};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

fn test_fetcher() -> HttpFetcher {
    let client = build_http_client("FathomTest/1.0").expect("failed to build client");
    HttpFetcher::new(client)
}

fn test_quotas() -> Quotas {
    Quotas {
        max_errors: 100,
        max_results: 100,
        lite_depth: 1,
    }
}

#[tokio::test]
async fn test_fetch_extracts_absolute_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body>
            <a href="/page1">One</a>
            <a href="/page2">Two</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let links = test_fetcher().fetch(&format!("{}/", base)).await.unwrap();

    assert_eq!(links, vec![format!("{}/page1", base), format!("{}/page2", base)]);
}

#[tokio::test]
async fn test_fetch_rejects_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/missing", server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_fetch_rejects_non_html_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/data.json", server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::ContentMismatch { .. })));
}

#[tokio::test]
async fn test_full_crawl_over_mock_server() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<html><body>
            <a href="{base}/page1">One</a>
            <a href="{base}/page2">Two</a>
            </body></html>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html("<html><body>leaf</body></html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("<html><body>leaf</body></html>"))
        .mount(&server)
        .await;

    let report = run_session(
        Arc::new(test_fetcher()) as Arc<dyn Fetcher>,
        CrawlConfig::new(1),
        test_quotas(),
        format!("{}/", base),
    )
    .await;

    // Seed plus two leaf pages, then the sink drains.
    assert_eq!(report.cause, CompletionCause::Drained);

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_failing_seed_hits_error_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = run_session(
        Arc::new(test_fetcher()) as Arc<dyn Fetcher>,
        CrawlConfig::new(3),
        Quotas {
            max_errors: 1,
            max_results: 100,
            lite_depth: 1,
        },
        format!("{}/", server.uri()),
    )
    .await;

    assert_eq!(report.cause, CompletionCause::ErrorQuota);
}
