//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, with wiremock
//! standing in for the upstream image host.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pixcache::{
    api::create_router,
    cache::{ImageCache, ImageStore},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

fn create_test_app(snapshot_enabled: bool) -> Router {
    let cache = ImageCache::new(ImageStore::new(100, 1024 * 1024, 60_000, snapshot_enabled));
    let state = AppState::new(cache);
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Percent-encodes a URL so it can ride in the src query parameter.
fn urlencode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Mounts a mock upstream serving one PNG and returns its URL.
async fn mount_image(server: &MockServer, route: &str, bytes: Vec<u8>, expected_hits: u64) -> String {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(bytes),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
    format!("{}{}", server.uri(), route)
}

// == Image Endpoint Tests ==

#[tokio::test]
async fn test_image_endpoint_fetches_and_serves() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    let payload = vec![0xAAu8; 64];
    let src = mount_image(&server, "/img.png", payload.clone(), 1).await;

    let response = get(&app, &format!("/image?src={}", urlencode(&src))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/png"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), payload.as_slice());
}

#[tokio::test]
async fn test_image_endpoint_second_request_served_from_cache() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    // expect(1): the second request must not reach the upstream.
    let src = mount_image(&server, "/cached.png", vec![0x11u8; 32], 1).await;
    let uri = format!("/image?src={}", urlencode(&src));

    let first = get(&app, &uri).await;
    let second = get(&app, &uri).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    // wiremock verifies the expected hit count on drop.
}

#[tokio::test]
async fn test_image_endpoint_upstream_error_is_bad_gateway() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let src = format!("{}/missing.png", server.uri());

    let response = get(&app, &format!("/image?src={}", urlencode(&src))).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_image_endpoint_failed_fetch_not_cached() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let src = format!("{}/flaky.png", server.uri());

    let response = get(&app, &format!("/image?src={}", urlencode(&src))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // Nothing was inserted.
    let stats = body_to_json(get(&app, "/stats").await.into_body()).await;
    assert_eq!(stats["entries"], 0);
    assert_eq!(stats["total_size_bytes"], 0);
}

#[tokio::test]
async fn test_image_endpoint_empty_src_rejected() {
    let app = create_test_app(false);

    let response = get(&app, "/image?src=").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_empty_cache() {
    let app = create_test_app(false);

    let response = get(&app, "/stats").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entries"], 0);
    assert_eq!(json["size_mb"], 0.0);
    assert!(json["oldest_key"].is_null());
    assert!(json["newest_key"].is_null());
}

#[tokio::test]
async fn test_stats_endpoint_after_caching() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    let src = mount_image(&server, "/a.png", vec![0x22u8; 128], 1).await;
    let uri = format!("/image?src={}", urlencode(&src));

    get(&app, &uri).await; // miss + insert
    get(&app, &uri).await; // hit

    let json = body_to_json(get(&app, "/stats").await.into_body()).await;
    assert_eq!(json["entries"], 1);
    assert_eq!(json["total_size_bytes"], 128);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["oldest_key"].as_str().unwrap(), src);
    assert_eq!(json["newest_key"].as_str().unwrap(), src);
}

// == Cleanup Endpoint Tests ==

#[tokio::test]
async fn test_cleanup_endpoint_zero_threshold_removes_all() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    let src = mount_image(&server, "/b.png", vec![0x33u8; 16], 1).await;

    get(&app, &format!("/image?src={}", urlencode(&src))).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cleanup?max_age_ms=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    let stats = body_to_json(get(&app, "/stats").await.into_body()).await;
    assert_eq!(stats["entries"], 0);
}

#[tokio::test]
async fn test_cleanup_endpoint_default_threshold_keeps_fresh_entries() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    let src = mount_image(&server, "/c.png", vec![0x44u8; 16], 1).await;

    get(&app, &format!("/image?src={}", urlencode(&src))).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cleanup")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 0);

    let stats = body_to_json(get(&app, "/stats").await.into_body()).await;
    assert_eq!(stats["entries"], 1);
}

// == Clear Endpoint Tests ==

#[tokio::test]
async fn test_clear_endpoint_empty_cache() {
    let app = create_test_app(false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 0);
}

#[tokio::test]
async fn test_clear_endpoint_reports_removed_count() {
    let app = create_test_app(false);
    let server = MockServer::start().await;
    let a = mount_image(&server, "/d.png", vec![0x55u8; 8], 1).await;
    let b = mount_image(&server, "/e.png", vec![0x66u8; 8], 1).await;

    get(&app, &format!("/image?src={}", urlencode(&a))).await;
    get(&app, &format!("/image?src={}", urlencode(&b))).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 2);
}

// == Entries (Snapshot) Endpoint Tests ==

#[tokio::test]
async fn test_entries_endpoint_disabled_by_default() {
    let app = create_test_app(false);

    let response = get(&app, "/entries").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_entries_endpoint_enabled_lists_metadata() {
    let app = create_test_app(true);
    let server = MockServer::start().await;
    let src = mount_image(&server, "/f.png", vec![0x77u8; 24], 1).await;

    get(&app, &format!("/image?src={}", urlencode(&src))).await;

    let response = get(&app, "/entries").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["entries"][0]["key"].as_str().unwrap(), src);
    assert_eq!(json["entries"][0]["size"], 24);
    assert_eq!(json["entries"][0]["content_type"], "image/png");
    // Metadata only, never payload bytes.
    assert!(json["entries"][0].get("bytes").is_none());
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(false);

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
