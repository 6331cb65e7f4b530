//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use file_cache::{api::create_router, AppState, FileCache};
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

async fn create_test_app() -> (TempDir, Router) {
    let tmp = TempDir::new().unwrap();
    let cache = FileCache::new(tmp.path().join("cache"), 0, None)
        .await
        .unwrap();
    (tmp, create_router(AppState::new(cache)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn set(app: &Router, key: &str, value: &str) {
    let body = format!(r#"{{"key":"{key}","value":"{value}"}}"#);
    let response = send(app, "PUT", "/set", Some(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn keys(app: &Router) -> Vec<String> {
    let json = body_to_json(send(app, "GET", "/keys", None).await).await;
    serde_json::from_value(json["keys"].clone()).unwrap()
}

// == SET / GET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let (_tmp, app) = create_test_app().await;

    let response = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"test_key","value":"test_value"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_get_endpoint_success() {
    let (_tmp, app) = create_test_app().await;
    set(&app, "test_key", "test_value").await;

    let response = send(&app, "GET", "/get/test_key", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["key"], "test_key");
    assert_eq!(json["value"], "test_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let (_tmp, app) = create_test_app().await;

    let response = send(&app, "GET", "/get/nonexistent", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_has_endpoint() {
    let (_tmp, app) = create_test_app().await;
    set(&app, "present", "v").await;

    let json = body_to_json(send(&app, "GET", "/has/present", None).await).await;
    assert_eq!(json["exists"], true);

    let json = body_to_json(send(&app, "GET", "/has/absent", None).await).await;
    assert_eq!(json["exists"], false);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_is_idempotent() {
    let (_tmp, app) = create_test_app().await;
    set(&app, "to_delete", "v").await;

    let response = send(&app, "DELETE", "/del/to_delete", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/get/to_delete", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/del/to_delete", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_prefix_endpoint() {
    let (_tmp, app) = create_test_app().await;
    for key in ["a_1", "a_2", "b_1"] {
        set(&app, key, "v").await;
    }

    let response = send(&app, "POST", "/del/prefix", Some(r#"{"prefixes":["a_"]}"#)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await["removed"], 2);
    assert_eq!(keys(&app).await, vec!["b_1"]);
}

#[tokio::test]
async fn test_delete_tags_endpoint() {
    let (_tmp, app) = create_test_app().await;
    for key in ["cache_test1", "cache_inis_test1", "cache_admin_name"] {
        set(&app, key, "v").await;
    }

    let response = send(
        &app,
        "POST",
        "/del/tags",
        Some(r#"{"tags":[["inis","test"],"admin"]}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await["removed"], 2);
    assert_eq!(keys(&app).await, vec!["cache_test1"]);
}

#[tokio::test]
async fn test_delete_tags_invalid_pattern() {
    let (_tmp, app) = create_test_app().await;

    let response = send(&app, "POST", "/del/tags", Some(r#"{"tags":["[oops"]}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_endpoint() {
    let (_tmp, app) = create_test_app().await;
    set(&app, "a", "1").await;
    set(&app, "b", "2").await;

    let response = send(&app, "DELETE", "/clear", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await["removed"], 2);
    assert!(keys(&app).await.is_empty());
}

// == INFO / STATS / HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_info_endpoint() {
    let (_tmp, app) = create_test_app().await;
    send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"info_key","value":"hello","ttl":60}"#),
    )
    .await;

    let response = send(&app, "GET", "/info/info_key", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(json["value"], "hello");
    assert_eq!(json["ttl_seconds"], 60);
    assert!(json["file_name"].as_str().unwrap().ends_with("cache_info_key"));
    let remaining = json["seconds_remaining"].as_i64().unwrap();
    assert!((59..=60).contains(&remaining));

    let response = send(&app, "GET", "/info/missing", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let (_tmp, app) = create_test_app().await;
    set(&app, "stats_key", "v").await;
    send(&app, "GET", "/get/stats_key", None).await; // hit
    send(&app, "GET", "/get/missing", None).await; // miss

    let response = send(&app, "GET", "/stats", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["total_entries"].as_u64().unwrap(), 1);
    assert!(json.get("hit_rate").is_some());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_tmp, app) = create_test_app().await;

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let (_tmp, app) = create_test_app().await;

    let response = send(&app, "PUT", "/set", Some(r#"{"invalid json"#)).await;

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let (_tmp, app) = create_test_app().await;

    let response = send(&app, "PUT", "/set", Some(r#"{"key":"","value":"test"}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response).await;
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let (_tmp, app) = create_test_app().await;

    let response = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"ttl_test","value":"expires_soon","ttl":1}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let response = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
