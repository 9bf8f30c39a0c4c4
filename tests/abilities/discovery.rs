use serde_json::json;

use super::content_harness::harness;

#[tokio::test]
async fn registry_lists_every_content_ability() {
    let h = harness();
    let registry = h.dispatcher.registry();
    let ids: Vec<&str> = registry.list_all().map(|a| a.id.as_str()).collect();

    assert_eq!(ids.len(), 14);
    for expected in [
        "content/create-page",
        "content/create-post",
        "content/delete-page",
        "content/delete-post",
        "content/get-page",
        "content/get-post",
        "content/list-categories",
        "content/list-media",
        "content/list-pages",
        "content/list-posts",
        "content/list-tags",
        "content/update-page",
        "content/update-post",
        "content/upload-media",
    ] {
        assert!(ids.contains(&expected), "missing {expected}");
    }
}

#[tokio::test]
async fn descriptors_render_json_schema_and_exposure_metadata() {
    let h = harness();
    let registry = h.dispatcher.registry();
    let descriptor = registry
        .get("content/delete-post")
        .expect("delete-post registered")
        .descriptor();
    let rendered = serde_json::to_value(&descriptor).unwrap();

    assert_eq!(rendered["category"], "content");
    assert_eq!(rendered["label"], "Delete Post");
    assert_eq!(
        rendered["annotations"],
        json!({"readonly": false, "destructive": true, "idempotent": true})
    );
    assert_eq!(rendered["meta"]["show_in_rest"], true);
    assert_eq!(rendered["meta"]["mcp"], json!({"public": true, "type": "tool"}));

    let input = &rendered["input_schema"];
    assert_eq!(input["type"], "object");
    assert_eq!(input["required"], json!(["id"]));
    assert_eq!(input["additionalProperties"], false);
    assert_eq!(input["properties"]["force"]["default"], false);
}

#[tokio::test]
async fn content_category_is_registered() {
    let h = harness();
    let category = h
        .dispatcher
        .registry()
        .category("content")
        .expect("content category");
    assert_eq!(category.label, "Content Management");
}
