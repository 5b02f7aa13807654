//! Tests for the request-scoped API error renderer

use super::super::{
    create_config_with_toml, create_test_router, get_body_json, get_body_string, get_request,
    html_request, json_request,
};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_unmatched_api_route_gets_json_error() {
    let app = create_test_router(None).await;

    let response = app.oneshot(get_request("/missing.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        get_body_json(response).await,
        json!({ "error_code": "NOT_FOUND", "message": "Not Found" })
    );
}

#[tokio::test]
async fn test_html_error_page_replaced_for_api() {
    let app = create_test_router(None).await;

    let response = app.oneshot(json_request("/failure")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["error_code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_browser_errors_are_left_alone() {
    let app = create_test_router(None).await;

    let response = app.oneshot(html_request("/failure")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_string(response).await, "<p>bad request</p>");
}

#[tokio::test]
async fn test_unmatched_browser_route_stays_empty() {
    let app = create_test_router(None).await;

    let response = app.oneshot(html_request("/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(get_body_string(response).await, "");
}

#[tokio::test]
async fn test_error_rendering_excluded() {
    let config = create_config_with_toml("exclude = [\"error-rendering\"]", "");
    let app = create_test_router(Some(config)).await;

    let response = app.oneshot(json_request("/failure")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_string(response).await, "<p>bad request</p>");
}
