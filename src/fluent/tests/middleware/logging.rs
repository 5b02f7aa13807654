//! Tests for decision logging inside request spans

use super::super::{create_test_router, html_request, json_request};
use axum::http::StatusCode;
use tower::ServiceExt;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_classification_is_logged() {
    let app = create_test_router(None).await;

    let response = app.oneshot(json_request("/posts/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(logs_contain("Request classified"));
    assert!(logs_contain("is_api=true"));
}

#[tokio::test]
#[traced_test]
async fn test_request_is_classified_once() {
    let app = create_test_router(None).await;

    // Middleware, render hook and post-handler binding share one classification.
    let response = app.oneshot(json_request("/posts/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("Request classified"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected one classification, got {n}")),
        }
    });
}

#[tokio::test]
#[traced_test]
async fn test_api_redirect_halt_is_logged() {
    let app = create_test_router(None).await;

    app.oneshot(json_request("/redirect/404")).await.unwrap();

    assert!(logs_contain("Redirect intercepted"));
    assert!(logs_contain("API redirect sent, processing halted"));
}

#[tokio::test]
#[traced_test]
async fn test_browser_redirect_is_not_intercepted() {
    let app = create_test_router(None).await;

    app.oneshot(html_request("/redirect/302")).await.unwrap();

    assert!(!logs_contain("Redirect intercepted"));
}
