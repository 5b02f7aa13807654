//! Tests for the API negotiation middleware and the lifecycle hooks it exposes

use super::super::{
    create_base_config, create_config_with_toml, create_test_router, get_body_json,
    get_body_string, get_request, html_request, json_request,
};
use crate::{ClassificationResult, Config, FluentRouter, RequestClassifier};
use axum::{Router, extract::Extension, http::StatusCode, routing::get};
use serde_json::json;
use tower::ServiceExt;

async fn classification_handler(Extension(c): Extension<ClassificationResult>) -> String {
    format!("json={} api={}", c.is_json, c.is_api)
}

#[tokio::test]
async fn test_json_extension_classifies_as_api() {
    let app = FluentRouter::without_state(Config::default())
        .unwrap()
        .merge(Router::new().route("/posts/{id}", get(classification_handler)))
        .setup_api_negotiation()
        .into_inner();

    let response = app.oneshot(get_request("/posts/1.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, "json=true api=true");
}

#[tokio::test]
async fn test_accept_header_classifies_as_api() {
    let app = FluentRouter::without_state(Config::default())
        .unwrap()
        .merge(Router::new().route("/posts/{id}", get(classification_handler)))
        .setup_api_negotiation()
        .into_inner();

    let response = app.oneshot(json_request("/posts/1")).await.unwrap();

    assert_eq!(get_body_string(response).await, "json=true api=true");
}

#[tokio::test]
async fn test_browser_accept_with_wildcard_is_not_api() {
    let app = FluentRouter::without_state(Config::default())
        .unwrap()
        .merge(Router::new().route("/posts/{id}", get(classification_handler)))
        .setup_api_negotiation()
        .into_inner();

    let response = app.oneshot(html_request("/posts/1")).await.unwrap();

    assert_eq!(get_body_string(response).await, "json=false api=false");
}

#[tokio::test]
async fn test_custom_format_extends_api_only() {
    let classifier =
        RequestClassifier::default().with_format("xml", |req| req.extension() == Some("xml"));

    let app = FluentRouter::without_state(Config::default())
        .unwrap()
        .with_classifier(classifier)
        .merge(Router::new().route("/posts/{id}", get(classification_handler)))
        .setup_api_negotiation()
        .into_inner();

    let response = app.oneshot(get_request("/posts/1.xml")).await.unwrap();

    assert_eq!(get_body_string(response).await, "json=false api=true");
}

#[tokio::test]
async fn test_api_render_is_json_with_view_vars() {
    let app = create_test_router(None).await;

    let response = app.oneshot(get_request("/posts/7.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = get_body_json(response).await;
    assert_eq!(body["id"], json!("7.json"));
    assert_eq!(body["allowJsonp"], json!(false));
    assert_eq!(body["showPaginationLinks"], json!(true));
}

#[tokio::test]
async fn test_browser_render_uses_host_template() {
    let app = create_test_router(None).await;

    let response = app.oneshot(html_request("/posts/7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(get_body_string(response).await, "<h1>Post</h1>");
}

#[tokio::test]
async fn test_controller_public_actions_seed_and_deny() {
    let app = create_test_router(None).await;

    let response = app.oneshot(json_request("/posts")).await.unwrap();

    let body = get_body_json(response).await;
    assert_eq!(body["viewDenied"], json!(true));
    assert_eq!(body["indexPublic"], json!(true));
}

#[tokio::test]
async fn test_browser_requests_are_not_seeded() {
    let app = create_test_router(None).await;

    let response = app.oneshot(html_request("/posts")).await.unwrap();

    assert_eq!(get_body_string(response).await, "<ul></ul>");
}

#[tokio::test]
async fn test_pagination_links_from_config() {
    let config = create_config_with_toml("", "show_pagination_links = false");
    let app = create_test_router(Some(config)).await;

    let response = app.oneshot(get_request("/posts/1.json")).await.unwrap();

    assert_eq!(get_body_json(response).await["showPaginationLinks"], json!(false));
}

#[tokio::test]
async fn test_allow_jsonp_override_reaches_body() {
    let app = create_test_router(Some(create_base_config())).await;

    let response = app.oneshot(json_request("/jsonp")).await.unwrap();

    assert_eq!(get_body_json(response).await["allowJsonp"], json!(true));
}

#[tokio::test]
async fn test_error_controller_renders_json_with_status() {
    let app = create_test_router(None).await;

    let response = app.oneshot(json_request("/error")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = get_body_json(response).await;
    assert_eq!(body["message"], json!("boom"));
}

#[tokio::test]
async fn test_error_controller_html_for_browser() {
    let app = create_test_router(None).await;

    let response = app.oneshot(html_request("/error")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get_body_string(response).await, "<h1>Error</h1>");
}
