use serde_json::json;

use super::content_harness::{SITE_URL, failure_message, harness};
use content_abilities::ErrorKind;

#[tokio::test]
async fn page_hierarchy_and_parent_filter() {
    let h = harness();
    let about = h
        .ok(
            "content/create-page",
            json!({"title": "About", "status": "publish", "menu_order": 2}),
        )
        .await;
    let about_id = about["id"].as_u64().unwrap();
    assert_eq!(about["url"], format!("{SITE_URL}/about/"));

    h.ok(
        "content/create-page",
        json!({"title": "Team", "parent": about_id, "template": "wide.html"}),
    )
    .await;
    h.ok(
        "content/create-page",
        json!({"title": "Contact", "menu_order": 1}),
    )
    .await;

    let top_level = h.ok("content/list-pages", json!({"parent": 0})).await;
    let titles: Vec<&str> = top_level["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Contact", "About"]);
    assert_eq!(top_level["total"], 2);

    let children = h
        .ok("content/list-pages", json!({"parent": about_id}))
        .await;
    assert_eq!(children["total"], 1);
    assert_eq!(children["pages"][0]["parent"], about_id);
}

#[tokio::test]
async fn get_page_includes_template_and_menu_order() {
    let h = harness();
    let created = h
        .ok(
            "content/create-page",
            json!({"title": "Landing", "template": "full-width.html", "menu_order": 5}),
        )
        .await;
    let id = created["id"].as_u64().unwrap();
    assert_eq!(created["url"], format!("{SITE_URL}/?page_id={id}"));

    let page = h.ok("content/get-page", json!({"id": id})).await;
    assert_eq!(page["template"], "full-width.html");
    assert_eq!(page["menu_order"], 5);
    assert_eq!(page["parent"], 0);
    assert_eq!(page["featured_image"], "");
}

#[tokio::test]
async fn update_page_clears_template_with_empty_string() {
    let h = harness();
    let created = h
        .ok(
            "content/create-page",
            json!({"title": "Landing", "template": "full-width.html"}),
        )
        .await;
    let id = created["id"].as_u64().unwrap();

    h.ok(
        "content/update-page",
        json!({"id": id, "template": "", "menu_order": 3}),
    )
    .await;
    let page = h.ok("content/get-page", json!({"id": id})).await;
    assert_eq!(page["template"], "");
    assert_eq!(page["menu_order"], 3);
}

#[tokio::test]
async fn page_status_rejects_future() {
    let h = harness();
    let result = h
        .invoke(
            "content/create-page",
            json!({"title": "Later", "status": "future"}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn unknown_parent_is_refused_by_the_store() {
    let h = harness();
    let result = h
        .invoke(
            "content/create-page",
            json!({"title": "Orphan", "parent": 4242}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::Conflict));
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn update_page_on_a_post_id_is_not_found() {
    let h = harness();
    let post_id = h.create_post(json!({"title": "Just a post"})).await;
    let result = h
        .invoke("content/update-page", json!({"id": post_id, "title": "x"}))
        .await;
    assert_eq!(failure_message(&result), "Page not found.");
}

#[tokio::test]
async fn delete_page_trashes_by_default() {
    let h = harness();
    let created = h
        .ok("content/create-page", json!({"title": "Temporary"}))
        .await;
    let deleted = h
        .ok("content/delete-page", json!({"id": created["id"]}))
        .await;
    assert_eq!(deleted["trashed"], true);
    assert_eq!(deleted["deleted"], false);
    assert_eq!(deleted["title"], "Temporary");
}
