use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::content_harness::{ContentHarness, failure_message, harness, harness_with};
use content_abilities::ErrorKind;
use content_abilities::media::MediaConfig;

const GIF_1X1: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00;";

fn local_fetch_harness() -> ContentHarness {
    harness_with(MediaConfig {
        block_private_hosts: false,
        ..MediaConfig::default()
    })
}

#[tokio::test]
async fn url_upload_downloads_and_stores_the_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/pixel.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(GIF_1X1))
        .expect(1)
        .mount(&server)
        .await;

    let h = local_fetch_harness();
    let output = h
        .ok(
            "content/upload-media",
            json!({
                "filename": "pixel.gif",
                "url": format!("{}/assets/pixel.gif", server.uri()),
                "title": "Tracking pixel",
            }),
        )
        .await;

    assert_eq!(output["filename"], "pixel.gif");
    assert_eq!(output["title"], "Tracking pixel");
    assert_eq!(output["mime_type"], "image/gif");
    let on_disk = std::fs::read(h.media_dir.path().join("pixel.gif")).unwrap();
    assert_eq!(on_disk, GIF_1X1);
}

#[tokio::test]
async fn non_success_status_is_a_download_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let h = local_fetch_harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "missing.png", "url": format!("{}/missing.png", server.uri())}),
        )
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
    assert_eq!(result.code(), Some("download_failed"));
    assert!(failure_message(&result).starts_with("Failed to download image"));
    assert_eq!(h.store.media_count(), 0);
}

#[tokio::test]
async fn empty_download_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.png"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let h = local_fetch_harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "empty.png", "url": format!("{}/empty.png", server.uri())}),
        )
        .await;
    assert_eq!(result.code(), Some("empty_image"));
    assert_eq!(failure_message(&result), "Image data is empty.");
}

#[tokio::test]
async fn private_hosts_are_blocked_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(GIF_1X1))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "pixel.gif", "url": format!("{}/pixel.gif", server.uri())}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
    assert_eq!(h.store.media_count(), 0);
}

#[tokio::test]
async fn non_http_schemes_are_rejected() {
    let h = local_fetch_harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "passwd.txt", "url": "file:///etc/passwd"}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
}
