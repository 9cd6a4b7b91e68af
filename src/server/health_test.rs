//! Tests for status endpoints

use super::*;
use crate::config::ApiConfig;
use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = build_router(ApiConfig::default())
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

#[tokio::test]
async fn test_root_returns_running_status() {
    let (status, body) = call(get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"{"status":"ok","message":"API server is running"}"#
    );
}

#[tokio::test]
async fn test_health_returns_healthy() {
    let (status, body) = call(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), r#"{"status":"healthy"}"#);
}

#[tokio::test]
async fn test_root_ignores_headers_and_body() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/?verbose=true")
        .header(CONTENT_TYPE, "text/plain")
        .header("x-custom", "anything")
        .body(Body::from("ignored payload"))
        .unwrap();

    let (status, body) = call(request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value,
        json!({"status": "ok", "message": "API server is running"})
    );
}

#[tokio::test]
async fn test_unknown_path_returns_404() {
    let (status, _) = call(get("/status")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_get_method_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, _) = call(request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_responses_are_json() {
    let response = build_router(ApiConfig::default())
        .oneshot(get("/health"))
        .await
        .unwrap();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/json");
}

#[test]
fn test_app_state_keeps_config() {
    let state = AppState::new(ApiConfig::new(9100));
    let cloned = state.clone();

    assert_eq!(cloned.config().port, 9100);
}

#[test]
fn test_payload_constructors() {
    assert_eq!(StatusResponse::running().status, "ok");
    assert_eq!(StatusResponse::running().message, "API server is running");
    assert_eq!(HealthResponse::healthy().status, "healthy");
}
