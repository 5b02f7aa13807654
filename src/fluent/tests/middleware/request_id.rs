//! Tests for request ID middleware
//!
//! Request IDs use UUIDv7 format for time-ordered, globally unique identifiers.

use super::super::{create_test_router, get_request, request_with_id};
use crate::{Config, FluentRouter};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use tower::ServiceExt;

#[tokio::test]
async fn test_request_id_preserves_existing_header() {
    let app = FluentRouter::without_state(Config::default())
        .unwrap()
        .merge(Router::new().route("/test", get(|| async { "OK" })))
        .setup_request_id()
        .into_inner();

    let custom_id = "custom-request-id-12345";

    let response = app
        .oneshot(request_with_id("/test", custom_id))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header should be present when provided in request");

    assert_eq!(request_id.to_str().unwrap(), custom_id);
}

#[tokio::test]
async fn test_request_id_generated_as_uuid_v7() {
    let app = FluentRouter::without_state(Config::default())
        .unwrap()
        .merge(Router::new().route("/test", get(|| async { "OK" })))
        .setup_request_id()
        .into_inner();

    let response = app.oneshot(get_request("/test")).await.unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header should be generated")
        .to_str()
        .unwrap();
    let uuid = uuid::Uuid::parse_str(request_id).unwrap();
    assert_eq!(uuid.get_version_num(), 7);
}

#[tokio::test]
async fn test_request_id_on_intercepted_redirect() {
    let app = create_test_router(None).await;

    let request = Request::builder()
        .uri("/redirect/404")
        .header("accept", "application/json")
        .header("x-request-id", "redirect-id")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "redirect-id");
}
