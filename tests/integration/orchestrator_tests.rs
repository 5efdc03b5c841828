//! End-to-end runs of the orchestrator against a mock newsletter

use std::path::{Path, PathBuf};
use substack_dl::config::Config;
use substack_dl::output::{
    ConversionOptions, DocumentConverter, OutputFormat, PostRenderer, RenderError, RenderResult,
};
use substack_dl::storage::{DownloadLog, DOWNLOAD_LOG_FILE};
use substack_dl::Orchestrator;
use url::Url;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output_dir`
fn create_test_config(source: &str, output_dir: &Path, formats: &[&str]) -> Config {
    Config {
        substack_urls: vec![source.to_string()],
        formats: formats.iter().map(|f| f.to_string()).collect(),
        output_dir: output_dir.to_path_buf(),
        download_images: true,
        incremental: true,
        delay: 0.0,
        ..Config::default()
    }
}

fn post_page(title: &str, date: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title>
        <script type="application/ld+json">
        {{"@type": "NewsArticle", "headline": "{title}", "author": {{"name": "Mock Author"}},
          "datePublished": "{date}", "keywords": "x, y"}}
        </script></head>
        <body><nav>Subscribe</nav><article><p>Hello from the post.</p>
        <img src="/images/pic.jpg" alt="pic"></article></body></html>"#
    )
}

async fn mount_archive(server: &MockServer, slugs: &[&str]) {
    let links: String = slugs
        .iter()
        .map(|slug| format!(r#"<div class="post-preview"><a href="/p/{slug}">{slug}</a></div>"#))
        .collect();

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body>{links}</body></html>"))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_post(server: &MockServer, slug: &str, title: &str, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/p/{slug}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(post_page(title, "2023-01-01T12:00:00Z"))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(expected_fetches)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/images/pic.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xff, 0xd8, 0xff])
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(server)
        .await;
}

fn orchestrator(config: Config) -> Orchestrator {
    Orchestrator::new(config).expect("Failed to create orchestrator")
}

fn logged_urls(output_dir: &Path) -> Vec<String> {
    DownloadLog::load(output_dir.join(DOWNLOAD_LOG_FILE))
        .urls()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_full_run_writes_every_format() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    mount_post(&server, "mock-post", "Mock Post Title", 1).await;
    mount_image(&server).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), out.path(), &["md", "html", "json"]);

    let summaries = orchestrator(config).run().await;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].discovered, 1);
    assert_eq!(summaries[0].downloaded, 1);
    assert_eq!(summaries[0].failed, 0);

    let md_path = out.path().join("20230101_mock-post-title.md");
    let html_path = out.path().join("20230101_mock-post-title.html");
    let json_path = out.path().join("20230101_mock-post-title.json");
    let image_path = out.path().join("assets").join("mock-post-title").join("pic.jpg");

    assert!(image_path.exists(), "image was not localized");

    let md = std::fs::read_to_string(&md_path).expect("markdown missing");
    assert!(md.starts_with("---\n"));
    assert!(md.contains("author: Mock Author"));
    assert!(md.contains("published_date: '2023-01-01'") || md.contains("published_date: 2023-01-01"));
    assert!(md.contains("# Mock Post Title"));
    assert!(md.contains("Hello from the post."));
    assert!(md.contains("assets/mock-post-title/pic.jpg"));
    assert!(!md.contains("Subscribe"));

    let html = std::fs::read_to_string(&html_path).expect("html missing");
    assert!(html.starts_with("<!--\n"));
    assert!(html.contains("<h1>Mock Post Title</h1>"));
    assert!(html.contains(r#"src="assets/mock-post-title/pic.jpg""#));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("json missing")).unwrap();
    assert_eq!(json["metadata"]["title"], "Mock Post Title");
    assert_eq!(json["metadata"]["published_date"], "2023-01-01");
    assert_eq!(json["metadata"]["tags"], serde_json::json!(["x", "y"]));
    assert_eq!(
        json["metadata"]["url"],
        format!("{}/p/mock-post", server.uri())
    );
    assert!(json["content_html"]
        .as_str()
        .unwrap()
        .contains("assets/mock-post-title/pic.jpg"));

    assert_eq!(
        logged_urls(out.path()),
        vec![format!("{}/p/mock-post", server.uri())]
    );
}

#[tokio::test]
async fn test_incremental_rerun_skips_logged_posts() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    // Fetched by the first run only
    mount_post(&server, "mock-post", "Mock Post Title", 1).await;
    mount_image(&server).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), out.path(), &["md"]);

    let first = orchestrator(config.clone()).run().await;
    assert_eq!(first[0].downloaded, 1);

    let logged_after_first = logged_urls(out.path());

    let second = orchestrator(config).run().await;
    assert_eq!(second[0].discovered, 1);
    assert_eq!(second[0].skipped, 1);
    assert_eq!(second[0].downloaded, 0);
    assert_eq!(logged_urls(out.path()), logged_after_first);
}

#[tokio::test]
async fn test_non_incremental_run_writes_no_log() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    mount_post(&server, "mock-post", "Mock Post Title", 2).await;
    mount_image(&server).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), out.path(), &["md"]);
    config.incremental = false;

    orchestrator(config.clone()).run().await;
    let summaries = orchestrator(config).run().await;

    assert_eq!(summaries[0].downloaded, 1);
    assert!(!out.path().join(DOWNLOAD_LOG_FILE).exists());
}

#[tokio::test]
async fn test_failed_post_does_not_stop_the_run() {
    let server = MockServer::start().await;
    mount_archive(&server, &["broken", "working"]).await;
    Mock::given(method("GET"))
        .and(path("/p/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_post(&server, "working", "Working Post", 1).await;
    mount_image(&server).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), out.path(), &["json"]);

    let summaries = orchestrator(config).run().await;

    assert_eq!(summaries[0].discovered, 2);
    assert_eq!(summaries[0].failed, 1);
    assert_eq!(summaries[0].downloaded, 1);
    assert!(out.path().join("20230101_working-post.json").exists());
    assert_eq!(
        logged_urls(out.path()),
        vec![format!("{}/p/working", server.uri())]
    );
}

/// Document converter that always fails
struct BrokenConverter;

impl DocumentConverter for BrokenConverter {
    fn convert(
        &self,
        _input: &Path,
        format: OutputFormat,
        _output: &Path,
        _options: &ConversionOptions,
    ) -> RenderResult<()> {
        Err(RenderError::Conversion {
            format,
            message: "converter crashed".to_string(),
        })
    }
}

#[tokio::test]
async fn test_failed_format_prevents_logging() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    mount_post(&server, "mock-post", "Mock Post Title", 1).await;
    mount_image(&server).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), out.path(), &["md", "pdf", "docx"]);

    let renderer = PostRenderer::default().with_document_converter(Box::new(BrokenConverter));
    let summaries = orchestrator(config).with_renderer(renderer).run().await;

    assert_eq!(summaries[0].failed, 1);
    assert_eq!(summaries[0].downloaded, 0);
    assert!(out.path().join("20230101_mock-post-title.md").exists());
    assert!(!out.path().join("20230101_mock-post-title.pdf").exists());
    assert!(logged_urls(out.path()).is_empty());

    // No temporary conversion input is left behind
    let leftovers: Vec<PathBuf> = std::fs::read_dir(out.path())
        .unwrap()
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.to_string_lossy().ends_with("_temp.html"))
        .collect();
    assert!(leftovers.is_empty(), "leftover temp files: {:?}", leftovers);
}

#[tokio::test]
async fn test_malformed_log_is_treated_as_empty() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    mount_post(&server, "mock-post", "Mock Post Title", 1).await;
    mount_image(&server).await;

    let out = TempDir::new().unwrap();
    std::fs::write(out.path().join(DOWNLOAD_LOG_FILE), "this is not json").unwrap();
    let mut config = create_test_config(&server.uri(), out.path(), &["md"]);
    config.download_images = false;

    let summaries = orchestrator(config).run().await;

    assert_eq!(summaries[0].downloaded, 1);
    assert_eq!(logged_urls(out.path()).len(), 1);
    assert!(!out.path().join("assets").exists());

    let md = std::fs::read_to_string(out.path().join("20230101_mock-post-title.md")).unwrap();
    assert!(md.contains("/images/pic.jpg"));
}

#[tokio::test]
async fn test_empty_archive_produces_empty_summary() {
    let server = MockServer::start().await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), out.path(), &["md"]);

    let summaries = orchestrator(config).run().await;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].discovered, 0);
    assert_eq!(summaries[0].processed(), 0);
}

#[tokio::test]
async fn test_multiple_sources_get_separate_directories() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for (server, slug) in [(&first, "alpha"), (&second, "beta")] {
        mount_archive(server, &[slug]).await;
        mount_post(server, slug, "Mock Post Title", 1).await;
        mount_image(server).await;
    }

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&first.uri(), out.path(), &["md"]);
    config.substack_urls.push(second.uri());

    let summaries = orchestrator(config).run().await;
    assert_eq!(summaries.len(), 2);

    for (server, slug) in [(&first, "alpha"), (&second, "beta")] {
        let port = Url::parse(&server.uri()).unwrap().port().unwrap();
        let dir = out.path().join(format!("127-0-0-1-{}", port));

        let summary = summaries
            .iter()
            .find(|s| s.output_dir == dir)
            .expect("no summary for source directory");
        assert_eq!(summary.downloaded, 1);

        assert!(dir.join("20230101_mock-post-title.md").exists());
        assert!(dir.join("assets").join("mock-post-title").join("pic.jpg").exists());
        assert_eq!(
            logged_urls(&dir),
            vec![format!("{}/p/{}", server.uri(), slug)]
        );
    }

    assert!(!out.path().join(DOWNLOAD_LOG_FILE).exists());
}

#[tokio::test]
async fn test_failed_image_keeps_remote_reference() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    mount_post(&server, "mock-post", "Mock Post Title", 1).await;
    // The image is not mounted: wiremock answers 404

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), out.path(), &["json"]);

    let summaries = orchestrator(config).run().await;

    assert_eq!(summaries[0].downloaded, 1);
    assert_eq!(summaries[0].failed, 0);
    assert!(!out.path().join("assets").exists());

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.path().join("20230101_mock-post-title.json")).unwrap(),
    )
    .unwrap();
    assert!(json["content_html"]
        .as_str()
        .unwrap()
        .contains(r#"src="/images/pic.jpg""#));
    assert_eq!(logged_urls(out.path()).len(), 1);
}

#[tokio::test]
async fn test_path_like_publish_date_stays_inside_output_dir() {
    let server = MockServer::start().await;
    mount_archive(&server, &["mock-post"]).await;
    Mock::given(method("GET"))
        .and(path("/p/mock-post"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><title>Mock Post Title</title>
                    <meta property="article:published_time" content="../escaped-x-y">
                    </head><body><article><p>Body</p></article></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let config = create_test_config(&server.uri(), &out, &["md"]);

    let summaries = orchestrator(config).run().await;
    assert_eq!(summaries[0].downloaded, 1);

    let outside: Vec<PathBuf> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p != &out)
        .collect();
    assert!(outside.is_empty(), "files escaped the output dir: {:?}", outside);

    let names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with("_mock-post-title.md"))
        .collect();
    assert_eq!(names.len(), 1);
    let prefix = &names[0][..names[0].len() - "_mock-post-title.md".len()];
    assert_eq!(prefix.len(), 8);
    assert!(prefix.bytes().all(|b| b.is_ascii_digit()));
}
