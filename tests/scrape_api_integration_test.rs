// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::{Matcher, Server};
use scrape_agent::app::{create_router, AppState};
use scrape_agent::models::batch::BatchResult;
use scrape_agent::models::config::ServiceConfig;
use scrape_agent::models::scrape::{ErrorType, ScrapeResult};
use tower::ServiceExt;

// End-to-end tests through the HTTP router. Target sites are served by mockito,
// so no external network access is needed.

fn test_app() -> Router {
    let config = ServiceConfig {
        retry_delay_ms: 10,
        batch_delay_ms: 10,
        ..ServiceConfig::default()
    };
    create_router(AppState::new(config).expect("Failed to build app state"))
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_scrape_page_end_to_end() {
    let mut server = Server::new_async().await;
    let links: String = (1..=12)
        .map(|i| format!(r#"<li><a href="/article/{i}">Article {i}</a></li>"#))
        .collect();
    let html = format!(
        r#"<!DOCTYPE html>
        <html>
          <head>
            <meta charset="utf-8">
            <link rel="stylesheet" href="/static/site.css">
            <style>.menu {{ display: none; }}</style>
          </head>
          <body>
            <img src="/images/banner.jpg">
            <h1>News</h1>
            <ul>{links}</ul>
            <script src="/static/app.js"></script>
          </body>
        </html>"#
    );
    server
        .mock("GET", "/news")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await;

    let url = format!("{}/news", server.url());
    let (status, body) = post_json(
        test_app(),
        "/scrape",
        serde_json::json!({ "url": url, "instructions": "headlines only" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result: ScrapeResult = serde_json::from_slice(&body).unwrap();

    assert!(result.success);
    assert_eq!(result.url, url);
    assert_eq!(result.instructions, "headlines only");
    assert_eq!(result.method, "http");
    assert_eq!(result.attempts_used, Some(1));

    let content = result.main_content.unwrap();
    assert!(content.starts_with("News Article 1 Article 2"));
    assert!(!content.contains("display"));
    assert_eq!(result.content_length, Some(content.chars().count()));

    let links = result.links.unwrap();
    assert_eq!(links.len(), 10);
    assert_eq!(links[0], format!("{}/article/1", server.url()));
    assert!(links.iter().all(|l| !l.ends_with(".css") && !l.ends_with(".jpg")));
    assert_eq!(result.links_found, Some(10));
}

#[tokio::test]
async fn test_scrape_failure_is_reported_with_200() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/busy")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let url = format!("{}/busy", server.url());
    let (status, body) = post_json(test_app(), "/scrape", serde_json::json!({ "url": url })).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["errorType"], "service_unavailable");
    assert_eq!(json["instructions"], "");
    assert!(json.get("attemptsUsed").is_none());
    assert!(json["error"].as_str().unwrap().starts_with("Scrape failed: "));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_scrape_missing_url_returns_400() {
    let (status, body) = post_json(
        test_app(),
        "/scrape",
        serde_json::json!({ "instructions": "anything" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_batch_processes_first_three_urls() {
    let mut server = Server::new_async().await;
    let ok_mock = server
        .mock("GET", Matcher::Regex(r"^/ok/\d$".to_string()))
        .with_status(200)
        .with_body("<p>page body</p>")
        .expect(2)
        .create_async()
        .await;
    let blocked_mock = server
        .mock("GET", "/blocked")
        .with_status(403)
        .expect(2)
        .create_async()
        .await;

    let urls = vec![
        format!("{}/ok/1", server.url()),
        format!("{}/blocked", server.url()),
        format!("{}/ok/2", server.url()),
        format!("{}/ok/3", server.url()),
        format!("{}/ok/4", server.url()),
    ];
    let (status, body) = post_json(
        test_app(),
        "/scrape-batch",
        serde_json::json!({
            "urls": urls,
            "instructions": "compare",
            "main_url": server.url(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result: BatchResult = serde_json::from_slice(&body).unwrap();

    assert!(result.success);
    assert_eq!(result.urls_processed, 3);
    assert_eq!(result.successful + result.failed, 3);
    assert_eq!(result.successful, 2);
    assert_eq!(result.instructions, "compare");
    assert_eq!(result.main_url.as_deref(), Some(server.url().as_str()));

    let blocked = &result.all_results[1];
    assert!(!blocked.success);
    assert_eq!(blocked.error_type, Some(ErrorType::Blocked));
    assert_eq!(blocked.instructions, "compare");

    assert_eq!(
        result.combined_content,
        format!(
            "--- URL: {0}/ok/1 ---\npage body\n\n--- URL: {0}/ok/2 ---\npage body",
            server.url()
        )
    );
    assert_eq!(
        result.total_content_length,
        result.combined_content.chars().count()
    );

    ok_mock.assert_async().await;
    blocked_mock.assert_async().await;
}

#[tokio::test]
async fn test_batch_without_urls_returns_400() {
    let (status, body) = post_json(
        test_app(),
        "/scrape-batch",
        serde_json::json!({ "instructions": "kept" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["instructions"], "kept");
}
