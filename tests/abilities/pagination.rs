use serde_json::json;

use super::content_harness::harness;
use content_abilities::ErrorKind;

#[tokio::test]
async fn ninety_seven_posts_make_ten_pages() {
    let h = harness();
    for n in 0..97 {
        h.create_post(json!({"title": format!("Post {n}")})).await;
    }

    let first = h.ok("content/list-posts", json!({})).await;
    assert_eq!(first["total"], 97);
    assert_eq!(first["total_pages"], 10);
    assert_eq!(first["posts"].as_array().unwrap().len(), 10);

    let last = h.ok("content/list-posts", json!({"page": 10})).await;
    assert_eq!(last["posts"].as_array().unwrap().len(), 7);

    let beyond = h.ok("content/list-posts", json!({"page": 11})).await;
    assert_eq!(beyond["posts"], json!([]));
    assert_eq!(beyond["total"], 97);
}

#[tokio::test]
async fn empty_listing_has_zero_pages() {
    let h = harness();
    let listed = h.ok("content/list-posts", json!({})).await;
    assert_eq!(listed, json!({"posts": [], "total": 0, "total_pages": 0}));

    let media = h.ok("content/list-media", json!({})).await;
    assert_eq!(media["total_pages"], 0);
}

#[tokio::test]
async fn per_page_is_bounded() {
    let h = harness();
    for per_page in [0, 101] {
        let result = h
            .invoke("content/list-posts", json!({"per_page": per_page}))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
    }

    let max = h.ok("content/list-posts", json!({"per_page": 100})).await;
    assert_eq!(max["total_pages"], 0);
}

#[tokio::test]
async fn ordering_by_title_ascending() {
    let h = harness();
    for title in ["charlie", "Alpha", "bravo"] {
        h.create_post(json!({"title": title})).await;
    }

    let listed = h
        .ok(
            "content/list-posts",
            json!({"orderby": "title", "order": "ASC"}),
        )
        .await;
    let titles: Vec<&str> = listed["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Alpha", "bravo", "charlie"]);
}

#[tokio::test]
async fn status_filter_narrows_results() {
    let h = harness();
    h.create_post(json!({"title": "Live", "status": "publish"})).await;
    h.create_post(json!({"title": "Hidden"})).await;

    let published = h
        .ok("content/list-posts", json!({"status": "publish"}))
        .await;
    assert_eq!(published["total"], 1);
    assert_eq!(published["posts"][0]["title"], "Live");

    let all = h.ok("content/list-posts", json!({"status": "any"})).await;
    assert_eq!(all["total"], 2);
}
