//! Asset localizer tests against a mock image host

use substack_dl::assets::localize_images;
use substack_dl::crawler::HttpFetcher;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::with_user_agent("substack-dl-tests").expect("Failed to build client")
}

async fn mount_image(server: &MockServer, image_path: &str, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47])
                .insert_header("content-type", content_type),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collisions_and_failed_downloads() {
    let server = MockServer::start().await;
    mount_image(&server, "/a/photo.png", "image/png").await;
    mount_image(&server, "/b/photo.png", "image/png").await;
    mount_image(&server, "/c/chart", "image/webp").await;

    let out = TempDir::new().unwrap();
    let dest = out.path().join("assets").join("my-post");
    let base = Url::parse(&format!("{}/p/my-post", server.uri())).unwrap();

    let fragment = r#"<p>Intro</p><img src="/a/photo.png" alt="one"><img alt="two" src='/b/photo.png'><img src="/c/chart"><img src="/missing.png">"#;

    let (rewritten, report) = localize_images(&fetcher(), fragment, &base, &dest, "my-post", "assets")
        .await
        .expect("Localization failed");

    assert_eq!(report.localized, 3);
    assert_eq!(report.failed, 1);

    assert!(rewritten.starts_with("<p>Intro</p>"));
    assert!(rewritten.contains(r#"<img src="assets/my-post/photo.png" alt="one">"#));
    assert!(rewritten.contains(r#"<img alt="two" src="assets/my-post/photo_1.png">"#));
    assert!(rewritten.contains(r#"<img src="assets/my-post/chart.webp">"#));
    assert!(rewritten.contains(r#"<img src="/missing.png">"#));

    assert!(dest.join("photo.png").exists());
    assert!(dest.join("photo_1.png").exists());
    assert!(dest.join("chart.webp").exists());
}

#[tokio::test]
async fn test_existing_file_is_not_overwritten() {
    let server = MockServer::start().await;
    mount_image(&server, "/img/cover.png", "image/png").await;

    let out = TempDir::new().unwrap();
    let dest = out.path().join("assets").join("post");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("cover.png"), b"existing").unwrap();

    let base = Url::parse(&server.uri()).unwrap();
    let (rewritten, _) = localize_images(
        &fetcher(),
        r#"<img src="/img/cover.png">"#,
        &base,
        &dest,
        "post",
        "assets",
    )
    .await
    .expect("Localization failed");

    assert_eq!(rewritten, r#"<img src="assets/post/cover_1.png">"#);
    assert_eq!(std::fs::read(dest.join("cover.png")).unwrap(), b"existing");
}

#[tokio::test]
async fn test_no_download_leaves_no_directory() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let dest = out.path().join("assets").join("post");
    let base = Url::parse(&server.uri()).unwrap();

    let (rewritten, report) = localize_images(
        &fetcher(),
        r#"<img src="/gone.png">"#,
        &base,
        &dest,
        "post",
        "assets",
    )
    .await
    .expect("Localization failed");

    assert_eq!(rewritten, r#"<img src="/gone.png">"#);
    assert_eq!(report.failed, 1);
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_gt_inside_attribute_value() {
    let server = MockServer::start().await;
    mount_image(&server, "/pic.png", "image/png").await;

    let out = TempDir::new().unwrap();
    let dest = out.path().join("assets").join("chart-post");
    let base = Url::parse(&server.uri()).unwrap();

    let (rewritten, report) = localize_images(
        &fetcher(),
        r#"<img alt="revenue > costs" src="/pic.png"><p>after</p>"#,
        &base,
        &dest,
        "chart-post",
        "assets",
    )
    .await
    .expect("Localization failed");

    assert_eq!(report.localized, 1);
    assert_eq!(
        rewritten,
        r#"<img alt="revenue > costs" src="assets/chart-post/pic.png"><p>after</p>"#
    );
    assert!(dest.join("pic.png").exists());
}
