// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /posts (default limit, explicit limit, clamping, view fields)
// - GET /posts/status
// - POST /cache/clear

use std::sync::Arc;

use portfolio_feed::api::{self, AppState, MAX_LIMIT};
use portfolio_feed::feed::cache::CACHE_KEY;
use portfolio_feed::feed::store::{CacheStore, MemoryStore};
use portfolio_feed::{CacheEntry, FeedConfig, FeedGateway, FeedHandle, MediaKind, Post};
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Router over a memory store and no network source.
fn test_router(store: Arc<MemoryStore>) -> Router {
    let gw = FeedGateway::new(FeedConfig::default(), store, None);
    api::router(AppState::new(FeedHandle::new(gw)))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router(Arc::new(MemoryStore::new()));

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn posts_default_limit_serves_fallback() {
    let app = test_router(Arc::new(MemoryStore::new()));
    let (status, v) = get_json(app, "/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["tier"], "fallback");
    assert!(v["advisory"].is_null());
    let posts = v["posts"].as_array().expect("posts array");
    assert_eq!(posts.len(), FeedConfig::default().default_limit);

    // contract checks for the site
    let first = &posts[0];
    for key in [
        "id",
        "caption",
        "mediaKind",
        "mediaUrl",
        "permalink",
        "timestamp",
        "captionPreview",
        "relativeTime",
    ] {
        assert!(first.get(key).is_some(), "missing '{key}'");
    }
}

#[tokio::test]
async fn posts_limit_is_clamped() {
    let (_, v) = get_json(test_router(Arc::new(MemoryStore::new())), "/posts?limit=2").await;
    assert_eq!(v["posts"].as_array().unwrap().len(), 2);

    let (_, v) = get_json(test_router(Arc::new(MemoryStore::new())), "/posts?limit=0").await;
    assert_eq!(v["posts"].as_array().unwrap().len(), 1);

    // more than the fallback holds: everything it has, never above MAX_LIMIT
    let uri = format!("/posts?limit={}", MAX_LIMIT * 10);
    let (_, v) = get_json(test_router(Arc::new(MemoryStore::new())), &uri).await;
    let n = v["posts"].as_array().unwrap().len();
    assert!(n >= 6 && n <= MAX_LIMIT);
}

#[tokio::test]
async fn posts_from_fresh_cache_include_caption_preview() {
    let store = Arc::new(MemoryStore::new());
    let long = "word ".repeat(40);
    let entry = CacheEntry::new(
        vec![Post {
            id: "c1".into(),
            caption: Some(long.clone()),
            media_kind: MediaKind::Image,
            media_url: "https://cdn.example.com/c1.jpg".into(),
            permalink: "https://www.instagram.com/p/c1/".into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }],
        chrono::Utc::now().timestamp_millis(),
    );
    store
        .set(CACHE_KEY, &serde_json::to_string(&entry).unwrap())
        .unwrap();

    let (status, v) = get_json(test_router(store), "/posts?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["tier"], "cache");
    let post = &v["posts"][0];
    assert_eq!(post["caption"], long.as_str());
    let preview = post["captionPreview"].as_str().unwrap();
    assert!(preview.ends_with("..."));
    assert!(preview.chars().count() <= 103);
    assert_eq!(post["relativeTime"], "Today");
}

#[tokio::test]
async fn status_reports_not_loading_after_fetch() {
    let store = Arc::new(MemoryStore::new());
    let gw = FeedGateway::new(FeedConfig::default(), store, None);
    let app = api::router(AppState::new(FeedHandle::new(gw)));

    let (_, before) = get_json(app.clone(), "/posts/status").await;
    assert_eq!(before["loading"], false);
    assert!(before["error"].is_null());

    get_json(app.clone(), "/posts").await;
    let (_, after) = get_json(app, "/posts/status").await;
    assert_eq!(after["loading"], false);
    assert!(after["error"].is_null());
}

#[tokio::test]
async fn cache_clear_returns_204_and_empties_slot() {
    let store = Arc::new(MemoryStore::new());
    store.set(CACHE_KEY, "{}").unwrap();
    let app = test_router(store.clone());

    let req = Request::builder()
        .method("POST")
        .uri("/cache/clear")
        .body(Body::empty())
        .expect("build POST /cache/clear");
    let resp = app.oneshot(req).await.expect("oneshot /cache/clear");

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.get(CACHE_KEY).unwrap(), None);
}

#[tokio::test]
async fn app_from_config_without_credentials_serves_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    let app = portfolio_feed::app(FeedConfig {
        cache_dir: tmp.path().to_path_buf(),
        ..FeedConfig::default()
    });

    let (status, v) = get_json(app, "/posts?limit=4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["tier"], "fallback");
    assert_eq!(v["posts"].as_array().unwrap().len(), 4);
}
