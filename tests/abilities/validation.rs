use serde_json::json;

use super::content_harness::{failure_message, harness};
use content_abilities::ErrorKind;
use content_abilities::core::abilities::InvocationResult;

#[tokio::test]
async fn unknown_field_is_rejected_without_side_effects() {
    let h = harness();
    let result = h
        .invoke(
            "content/create-post",
            json!({"title": "Typo", "titel": "Typo"}),
        )
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
    assert_eq!(result.code(), Some("unknown_field"));
    assert!(failure_message(&result).contains("titel"));
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn wrong_types_and_enum_values_are_validation_errors() {
    let h = harness();
    let cases = [
        json!({"title": 42}),
        json!({"title": "x", "status": "archived"}),
        json!({"title": "x", "format": "podcast"}),
        json!({"title": "x", "sticky": "yes"}),
        json!({"title": "x", "tags": "rust"}),
        json!({"title": "x", "featured_image_id": -1}),
    ];
    for input in cases {
        let result = h.invoke("content/create-post", input.clone()).await;
        assert_eq!(
            result.error_kind(),
            Some(ErrorKind::ValidationError),
            "{input}"
        );
    }
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn malformed_date_is_a_validation_error() {
    let h = harness();
    let result = h
        .invoke(
            "content/create-post",
            json!({"title": "Dated", "date": "next tuesday"}),
        )
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn explicit_date_is_kept() {
    let h = harness();
    let id = h
        .create_post(json!({"title": "Backdated", "date": "2024-03-01T09:30:00"}))
        .await;
    let post = h.ok("content/get-post", json!({"id": id})).await;
    assert_eq!(post["date"], "2024-03-01T09:30:00.000000Z");
}

#[tokio::test]
async fn unknown_ability_is_not_found() {
    let h = harness();
    let result = h.invoke("content/launch-rockets", json!({})).await;
    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(
        failure_message(&result),
        "Ability not found: content/launch-rockets"
    );
}

#[tokio::test]
async fn null_input_counts_as_empty_object() {
    let h = harness();
    let result = h.invoke("content/list-tags", serde_json::Value::Null).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn failures_serialize_with_kind_code_message_and_hint() {
    let h = harness();
    let result = h.invoke("content/get-post", json!({"id": 77})).await;
    assert!(matches!(result, InvocationResult::Failure { .. }));

    let rendered = serde_json::to_value(&result).unwrap();
    assert_eq!(
        rendered,
        json!({
            "error_kind": "not_found",
            "code": "not_found",
            "message": "Post not found.",
            "status_hint": 404
        })
    );
}
