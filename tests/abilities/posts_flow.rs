use serde_json::json;

use super::content_harness::{SITE_URL, failure_message, harness};
use content_abilities::ErrorKind;

#[tokio::test]
async fn create_post_defaults_to_draft_with_query_link() {
    let h = harness();
    let output = h
        .ok("content/create-post", json!({"title": "Hello World"}))
        .await;

    let id = output["id"].as_u64().unwrap();
    assert_eq!(output["status"], "draft");
    assert_eq!(output["slug"], "hello-world");
    assert_eq!(output["format"], "standard");
    assert_eq!(output["url"], format!("{SITE_URL}/?p={id}"));
    assert_eq!(output["edit_url"], format!("{SITE_URL}/admin/posts/{id}/edit"));
    assert_eq!(h.store.entity_count(), 1);
}

#[tokio::test]
async fn publishing_switches_to_pretty_link_and_advances_modified() {
    let h = harness();
    let id = h.create_post(json!({"title": "Launch Notes"})).await;
    let before = h.ok("content/get-post", json!({"id": id})).await;

    let updated = h
        .ok(
            "content/update-post",
            json!({"id": id, "status": "publish"}),
        )
        .await;

    assert_eq!(updated["status"], "publish");
    assert_eq!(updated["title"], "Launch Notes");
    assert_eq!(updated["url"], format!("{SITE_URL}/launch-notes/"));
    let before_modified = before["modified"].as_str().unwrap();
    let after_modified = updated["modified"].as_str().unwrap();
    assert!(after_modified > before_modified);
}

#[tokio::test]
async fn update_without_changes_still_advances_modified() {
    let h = harness();
    let id = h.create_post(json!({"title": "Static"})).await;
    let first = h.ok("content/update-post", json!({"id": id})).await;
    let second = h.ok("content/update-post", json!({"id": id})).await;
    assert!(second["modified"].as_str().unwrap() > first["modified"].as_str().unwrap());
}

#[tokio::test]
async fn get_post_reports_names_author_and_empty_featured_image() {
    let h = harness();
    let id = h
        .create_post(json!({
            "title": "Tagged",
            "content": "<p>Body</p>",
            "categories": ["uncategorized", "missing-slug"],
            "tags": ["Release Notes"],
        }))
        .await;

    let post = h.ok("content/get-post", json!({"id": id})).await;
    assert_eq!(post["content"], "<p>Body</p>");
    assert_eq!(post["author_name"], "Site Admin");
    assert_eq!(post["featured_image"], "");
    assert_eq!(post["categories"], json!(["Uncategorized"]));
    assert_eq!(post["tags"], json!(["Release Notes"]));
}

#[tokio::test]
async fn list_posts_reports_slugs_and_trimmed_excerpts() {
    let h = harness();
    let long_body = (1..=40).map(|n| format!("w{n}")).collect::<Vec<_>>().join(" ");
    h.create_post(json!({
        "title": "Long",
        "content": long_body,
        "tags": ["Release Notes"],
    }))
    .await;

    let listed = h.ok("content/list-posts", json!({})).await;
    let post = &listed["posts"][0];
    assert_eq!(post["tags"], json!(["release-notes"]));
    let excerpt = post["excerpt"].as_str().unwrap();
    assert!(excerpt.starts_with("w1 w2"));
    assert!(!excerpt.contains("w31"));
}

#[tokio::test]
async fn excerpts_keep_literal_angle_brackets() {
    let h = harness();
    h.create_post(json!({
        "title": "Loops",
        "content": "Use x < 10 when looping over the items &amp; friends",
    }))
    .await;

    let listed = h.ok("content/list-posts", json!({})).await;
    assert_eq!(
        listed["posts"][0]["excerpt"],
        "Use x < 10 when looping over the items & friends"
    );
}

#[tokio::test]
async fn explicit_slug_collisions_get_numbered_suffixes() {
    let h = harness();
    let first = h
        .ok("content/create-post", json!({"title": "A", "slug": "same"}))
        .await;
    let second = h
        .ok("content/create-post", json!({"title": "B", "slug": "same"}))
        .await;
    assert_eq!(first["slug"], "same");
    assert_eq!(second["slug"], "same-2");
}

#[tokio::test]
async fn unknown_author_login_falls_back_to_caller() {
    let h = harness();
    let id = h
        .create_post(json!({"title": "Guest", "author": "nobody-here"}))
        .await;
    let post = h.ok("content/get-post", json!({"id": id})).await;
    assert_eq!(post["author"], h.admin.user_id);
}

#[tokio::test]
async fn get_post_on_a_page_id_is_not_found() {
    let h = harness();
    let page = h
        .ok("content/create-page", json!({"title": "About"}))
        .await;

    let result = h
        .invoke("content/get-post", json!({"id": page["id"]}))
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(failure_message(&result), "Post not found.");
}

#[tokio::test]
async fn missing_featured_image_is_rejected_before_insert() {
    let h = harness();
    let result = h
        .invoke(
            "content/create-post",
            json!({"title": "Pictured", "featured_image_id": 999}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(failure_message(&result), "Media not found.");
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn trash_then_force_delete() {
    let h = harness();
    let id = h.create_post(json!({"title": "Short Lived"})).await;

    let trashed = h.ok("content/delete-post", json!({"id": id})).await;
    assert_eq!(
        trashed,
        json!({"id": id, "deleted": false, "trashed": true, "title": "Short Lived"})
    );
    assert_eq!(h.store.entity_count(), 0);

    let hidden = h.invoke("content/get-post", json!({"id": id})).await;
    assert_eq!(hidden.error_kind(), Some(ErrorKind::NotFound));

    let other = h.create_post(json!({"title": "Gone For Good"})).await;
    let removed = h
        .ok("content/delete-post", json!({"id": other, "force": true}))
        .await;
    assert_eq!(removed["deleted"], true);
    assert_eq!(removed["trashed"], false);
}

#[tokio::test]
async fn refused_delete_is_a_conflict() {
    let h = harness();
    let id = h.create_post(json!({"title": "Pinned"})).await;
    h.store.protect(id);

    let result = h.invoke("content/delete-post", json!({"id": id})).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Conflict));
    assert_eq!(failure_message(&result), "Failed to delete post.");
    assert_eq!(h.store.entity_count(), 1);
}
