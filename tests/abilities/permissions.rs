use serde_json::json;

use super::content_harness::harness;
use content_abilities::ErrorKind;
use content_abilities::core::abilities::InvocationResult;
use content_abilities::security::{CallerContext, Capability, Role};

#[tokio::test]
async fn contributor_cannot_publish_and_nothing_is_written() {
    let h = harness();
    let contributor = h.caller("casey", Role::Contributor);

    let result = h
        .invoke_as(&contributor, "content/create-post", json!({"title": "Nope"}))
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::PermissionDenied));
    match result {
        InvocationResult::Failure { status_hint, .. } => assert_eq!(status_hint, 403),
        InvocationResult::Success { .. } => unreachable!(),
    }
    assert_eq!(h.store.entity_count(), 0);
}

#[tokio::test]
async fn subscriber_can_read_but_not_edit() {
    let h = harness();
    let id = h.create_post(json!({"title": "Readable"})).await;
    let subscriber = h.caller("sam", Role::Subscriber);

    let read = h
        .invoke_as(&subscriber, "content/get-post", json!({"id": id}))
        .await;
    assert!(read.is_success());

    let edit = h
        .invoke_as(
            &subscriber,
            "content/update-post",
            json!({"id": id, "title": "Changed"}),
        )
        .await;
    assert_eq!(edit.error_kind(), Some(ErrorKind::PermissionDenied));

    let post = h.ok("content/get-post", json!({"id": id})).await;
    assert_eq!(post["title"], "Readable");
}

#[tokio::test]
async fn author_cannot_touch_pages() {
    let h = harness();
    let author = h.caller("ari", Role::Author);

    for (ability, input) in [
        ("content/create-page", json!({"title": "Page"})),
        ("content/delete-page", json!({"id": 1})),
    ] {
        let result = h.invoke_as(&author, ability, input).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::PermissionDenied), "{ability}");
    }
}

#[tokio::test]
async fn media_listing_requires_upload_capability() {
    let h = harness();
    let subscriber = h.caller("sam", Role::Subscriber);
    let denied = h
        .invoke_as(&subscriber, "content/list-media", json!({}))
        .await;
    assert_eq!(denied.error_kind(), Some(ErrorKind::PermissionDenied));

    let granted = subscriber.with_capability(Capability::UploadFiles);
    let allowed = h.invoke_as(&granted, "content/list-media", json!({})).await;
    assert!(allowed.is_success());
}

#[tokio::test]
async fn anonymous_caller_is_denied_even_reads() {
    let h = harness();
    let result = h
        .invoke_as(&CallerContext::anonymous(), "content/list-posts", json!({}))
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::PermissionDenied));
}

#[tokio::test]
async fn validation_runs_before_authorization() {
    let h = harness();
    let subscriber = h.caller("sam", Role::Subscriber);
    let result = h
        .invoke_as(&subscriber, "content/create-post", json!({}))
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
}
