use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use super::content_harness::{SITE_URL, failure_message, harness, harness_with};
use content_abilities::ErrorKind;
use content_abilities::media::MediaConfig;

const PNG_2X3: [u8; 24] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0, 0,
    2, 0, 0, 0, 3,
];

const JPEG_HEADER: [u8; 12] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
];

fn encoded(data: &[u8]) -> String {
    STANDARD.encode(data)
}

#[tokio::test]
async fn base64_upload_is_stored_and_registered() {
    let h = harness();
    let output = h
        .ok(
            "content/upload-media",
            json!({
                "filename": "Holiday Photo.png",
                "base64": encoded(&PNG_2X3),
                "alt_text": "Beach",
            }),
        )
        .await;

    assert_eq!(output["filename"], "Holiday-Photo.png");
    assert_eq!(output["title"], "Holiday-Photo");
    assert_eq!(output["mime_type"], "image/png");
    assert_eq!(output["url"], format!("{SITE_URL}/uploads/Holiday-Photo.png"));
    assert!(h.media_dir.path().join("Holiday-Photo.png").is_file());
    assert_eq!(h.store.media_count(), 1);
}

#[tokio::test]
async fn colliding_filenames_get_numbered() {
    let h = harness();
    let mut stored = Vec::new();
    for _ in 0..3 {
        let output = h
            .ok(
                "content/upload-media",
                json!({"filename": "photo.jpg", "base64": encoded(&JPEG_HEADER)}),
            )
            .await;
        stored.push(output["filename"].as_str().unwrap().to_string());
    }

    assert_eq!(stored, ["photo.jpg", "photo-1.jpg", "photo-2.jpg"]);
    for name in &stored {
        assert!(h.media_dir.path().join(name).is_file(), "{name}");
    }
}

#[tokio::test]
async fn supplying_both_sources_is_ambiguous() {
    let h = harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({
                "filename": "a.png",
                "base64": encoded(&PNG_2X3),
                "url": "https://example.com/a.png",
            }),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
    assert_eq!(result.code(), Some("ambiguous_source"));
    assert_eq!(failure_message(&result), "Use either base64 or url, not both.");
    assert_eq!(h.store.media_count(), 0);
}

#[tokio::test]
async fn empty_sources_count_as_missing() {
    let h = harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "a.png", "base64": "", "url": ""}),
        )
        .await;
    assert_eq!(result.code(), Some("no_image_data"));
    assert_eq!(
        failure_message(&result),
        "Either base64 or url must be provided."
    );
}

#[tokio::test]
async fn invalid_base64_is_rejected() {
    let h = harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "a.png", "base64": "@@not base64@@"}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
    assert_eq!(result.code(), Some("invalid_base64"));
    assert!(failure_message(&result).starts_with("Invalid base64 data"));
}

#[tokio::test]
async fn mismatched_content_is_rolled_back() {
    let h = harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "report.pdf", "base64": encoded(&PNG_2X3)}),
        )
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
    assert_eq!(result.code(), Some("invalid_filetype"));
    assert!(!h.media_dir.path().join("report.pdf").exists());
    assert_eq!(h.store.media_count(), 0);
}

#[tokio::test]
async fn disallowed_extension_is_rejected() {
    let h = harness();
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "script.exe", "base64": encoded(b"MZ\x90\x00")}),
        )
        .await;
    assert!(failure_message(&result).starts_with("Invalid file type"));
    assert!(!h.media_dir.path().join("script.exe").exists());
}

#[tokio::test]
async fn oversized_payload_is_refused_before_writing() {
    let h = harness_with(MediaConfig {
        max_upload_size_mb: 1,
        ..MediaConfig::default()
    });
    let big = vec![b'a'; 1_024 * 1_024 + 1];
    let result = h
        .invoke(
            "content/upload-media",
            json!({"filename": "notes.txt", "base64": encoded(&big)}),
        )
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::IngestionError));
    assert_eq!(result.code(), Some("too_large"));
    assert!(!h.media_dir.path().join("notes.txt").exists());
}

#[tokio::test]
async fn featured_image_links_uploaded_media() {
    let h = harness();
    let media = h
        .ok(
            "content/upload-media",
            json!({"filename": "cover.png", "base64": encoded(&PNG_2X3)}),
        )
        .await;

    let id = h
        .create_post(json!({"title": "With Cover", "featured_image_id": media["id"]}))
        .await;
    let post = h.ok("content/get-post", json!({"id": id})).await;
    assert_eq!(post["featured_image"], media["url"]);

    h.ok(
        "content/update-post",
        json!({"id": id, "featured_image_id": 0}),
    )
    .await;
    let cleared = h.ok("content/get-post", json!({"id": id})).await;
    assert_eq!(cleared["featured_image"], "");
}

#[tokio::test]
async fn list_media_filters_by_mime_prefix() {
    let h = harness();
    h.ok(
        "content/upload-media",
        json!({"filename": "pic.png", "base64": encoded(&PNG_2X3)}),
    )
    .await;
    h.ok(
        "content/upload-media",
        json!({"filename": "notes.txt", "base64": encoded(b"plain text")}),
    )
    .await;

    let all = h.ok("content/list-media", json!({})).await;
    assert_eq!(all["total"], 2);

    let images = h.ok("content/list-media", json!({"mime_type": "image"})).await;
    assert_eq!(images["total"], 1);
    assert_eq!(images["media"][0]["filename"], "pic.png");

    let exact = h
        .ok("content/list-media", json!({"mime_type": "text/plain"}))
        .await;
    assert_eq!(exact["media"][0]["filename"], "notes.txt");
}
