//! Archive walker tests against a mock archive listing

use std::time::Duration;
use substack_dl::crawler::{discover_posts, HttpFetcher};
use substack_dl::url::normalize_source_root;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::with_user_agent("substack-dl-tests").expect("Failed to build client")
}

async fn mount_archive_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("page", page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_walk_stops_on_404_and_filters_links() {
    let server = MockServer::start().await;
    let root = normalize_source_root(&server.uri()).expect("Failed to parse root");

    mount_archive_page(
        &server,
        "1",
        format!(
            r#"<html><body>
            <a href="/p/first-post">First</a>
            <a href="{}/p/second-post?utm_source=archive#comments">Second</a>
            <a href="/p/first-post">First again</a>
            <a href="https://elsewhere.example.com/p/foreign">Foreign</a>
            <a href="/about">About</a>
            </body></html>"#,
            server.uri()
        ),
    )
    .await;
    // Page 2 is not mounted: wiremock answers 404

    let urls = discover_posts(&fetcher(), &root, Duration::ZERO).await;
    let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();

    assert_eq!(
        urls,
        vec![
            format!("{}/p/first-post", server.uri()),
            format!("{}/p/second-post", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_walk_stops_when_page_repeats() {
    let server = MockServer::start().await;
    let root = normalize_source_root(&server.uri()).expect("Failed to parse root");

    let page = r#"<div class="post-preview"><a href="/p/only-post">Only</a></div>"#.to_string();
    mount_archive_page(&server, "1", page.clone()).await;
    mount_archive_page(&server, "2", page).await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let urls = discover_posts(&fetcher(), &root, Duration::ZERO).await;
    assert_eq!(urls.len(), 1);
    assert!(urls[0].path().ends_with("/p/only-post"));
}

#[tokio::test]
async fn test_walk_collects_across_pages_until_error() {
    let server = MockServer::start().await;
    let root = normalize_source_root(&server.uri()).expect("Failed to parse root");

    mount_archive_page(&server, "1", r#"<a href="/p/one">1</a><a href="/p/two">2</a>"#.to_string())
        .await;
    mount_archive_page(&server, "2", r#"<a href="/p/three">3</a>"#.to_string()).await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let urls = discover_posts(&fetcher(), &root, Duration::ZERO).await;
    let paths: Vec<&str> = urls.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/p/one", "/p/two", "/p/three"]);
}

#[tokio::test]
async fn test_walk_stops_on_page_without_post_links() {
    let server = MockServer::start().await;
    let root = normalize_source_root(&server.uri()).expect("Failed to parse root");

    mount_archive_page(&server, "1", "<html><body><p>Nothing yet</p></body></html>".to_string())
        .await;

    let urls = discover_posts(&fetcher(), &root, Duration::ZERO).await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_walk_on_unreachable_host_returns_empty() {
    // Reserve a port, then free it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("No local address").port()
    };
    let root = normalize_source_root(&format!("http://127.0.0.1:{}", port))
        .expect("Failed to parse root");

    let urls = discover_posts(&fetcher(), &root, Duration::ZERO).await;
    assert!(urls.is_empty());
}
