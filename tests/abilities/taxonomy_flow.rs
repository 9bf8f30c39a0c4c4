use serde_json::json;

use super::content_harness::harness;
use content_abilities::ErrorKind;

#[tokio::test]
async fn tags_are_created_once_and_reused() {
    let h = harness();
    h.create_post(json!({"title": "One", "status": "publish", "tags": ["Rust", "Async IO"]}))
        .await;
    h.create_post(json!({"title": "Two", "status": "publish", "tags": ["Rust"]}))
        .await;

    let tags = h.ok("content/list-tags", json!({})).await;
    let tags = tags["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 2);

    let rust = tags.iter().find(|t| t["slug"] == "rust").unwrap();
    assert_eq!(rust["name"], "Rust");
    assert_eq!(rust["count"], 2);
    let async_io = tags.iter().find(|t| t["slug"] == "async-io").unwrap();
    assert_eq!(async_io["count"], 1);
}

#[tokio::test]
async fn repeated_tag_names_create_one_tag() {
    let h = harness();
    h.create_post(json!({"title": "One", "status": "publish", "tags": ["alpha", "alpha"]}))
        .await;
    h.create_post(json!({"title": "Two", "status": "publish", "tags": ["alpha", "alpha"]}))
        .await;

    let tags = h.ok("content/list-tags", json!({})).await;
    let tags = tags["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["slug"], "alpha");
    assert_eq!(tags[0]["count"], 2);
}

#[tokio::test]
async fn failed_create_leaves_no_new_tags() {
    let h = harness();
    h.store.refuse_inserts();

    let result = h
        .invoke(
            "content/create-post",
            json!({"title": "Lost", "tags": ["orphan"]}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Conflict));

    let tags = h.ok("content/list-tags", json!({})).await;
    assert_eq!(tags["tags"], json!([]));
}

#[tokio::test]
async fn term_counts_ignore_unpublished_content() {
    let h = harness();
    h.create_post(json!({"title": "Draft", "tags": ["Pending"], "categories": ["uncategorized"]}))
        .await;

    let tags = h.ok("content/list-tags", json!({})).await;
    assert_eq!(tags["tags"][0]["count"], 0);

    let visible = h.ok("content/list-tags", json!({"hide_empty": true})).await;
    assert_eq!(visible["tags"], json!([]));

    let categories = h.ok("content/list-categories", json!({})).await;
    assert_eq!(categories["categories"][0]["count"], 0);
}

#[tokio::test]
async fn list_tags_filters_by_search() {
    let h = harness();
    h.create_post(json!({"title": "Post", "tags": ["Databases", "Networking"]}))
        .await;

    let found = h.ok("content/list-tags", json!({"search": "net"})).await;
    let names: Vec<&str> = found["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Networking"]);
}

#[tokio::test]
async fn list_categories_reports_hierarchy() {
    let h = harness();
    let news = h.store.add_category("News", "news", 0);
    h.store.add_category("Local", "local", news);
    h.create_post(json!({"title": "Headline", "status": "publish", "categories": ["local"]}))
        .await;

    let listed = h.ok("content/list-categories", json!({})).await;
    let categories = listed["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 3);

    let local = categories.iter().find(|c| c["slug"] == "local").unwrap();
    assert_eq!(local["parent"], news);
    assert_eq!(local["count"], 1);

    let non_empty = h
        .ok("content/list-categories", json!({"hide_empty": true}))
        .await;
    assert_eq!(non_empty["categories"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_categories_has_no_search_field() {
    let h = harness();
    let result = h
        .invoke("content/list-categories", json!({"search": "news"}))
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
}

#[tokio::test]
async fn filtering_posts_by_tag_and_category_slug() {
    let h = harness();
    h.store.add_category("Guides", "guides", 0);
    h.create_post(json!({"title": "Tagged", "tags": ["Rust"]})).await;
    h.create_post(json!({"title": "Filed", "categories": ["guides"]}))
        .await;

    let by_tag = h.ok("content/list-posts", json!({"tag": "rust"})).await;
    assert_eq!(by_tag["total"], 1);
    assert_eq!(by_tag["posts"][0]["title"], "Tagged");

    let by_category = h
        .ok("content/list-posts", json!({"category": "guides"}))
        .await;
    assert_eq!(by_category["total"], 1);
    assert_eq!(by_category["posts"][0]["categories"], json!(["guides"]));

    let unknown = h
        .ok("content/list-posts", json!({"category": "no-such-slug"}))
        .await;
    assert_eq!(unknown["total"], 0);
}
