//! Test helpers and utilities for FluentRouter tests
//!
//! These tests use `oneshot()` for fast, in-process testing without network I/O.
//!
//! ## Available Helpers
//!
//! - Configuration builders: `create_base_config()`, `create_config_with_toml()`
//! - Router builders: `create_test_router()`, `posts_router()`
//! - Request helpers: `get_request()`, `json_request()`, `html_request()`, `request_with_id()`
//! - Response helpers: `get_body_string()`, `get_body_json()`

use crate::{ApiContext, Config, FluentRouter};
use axum::{
    Router,
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};

pub(crate) mod middleware;

// ============================================================================
// Configuration Helpers
// ============================================================================

/// Base TOML configuration template for tests.
const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000

[api]
error_controller = "ErrorController"
public_actions = ["index"]

[logging]
format = "json"
"#;

/// Creates a base test configuration by parsing TOML.
pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

/// Creates a test configuration with additional `[http]` / `[api]` keys.
///
/// # Example
/// ```ignore
/// let config = create_config_with_toml("exclude = [\"error-rendering\"]", "debug = true");
/// ```
pub(crate) fn create_config_with_toml(http_toml: &str, api_toml: &str) -> Config {
    let toml_str = format!(
        r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
{http_toml}

[api]
error_controller = "ErrorController"
{api_toml}

[logging]
format = "json"
        "#
    );

    toml_str.parse().expect("Failed to parse test config TOML")
}

// ============================================================================
// Test Handlers
// ============================================================================

pub(crate) async fn view_post(ctx: ApiContext, Path(id): Path<String>) -> Response {
    let mut controller = ctx.controller("PostsController");
    controller.set("id", id);
    controller.set_template_output("<h1>Post</h1>");
    ctx.render(controller)
}

pub(crate) async fn index_posts(ctx: ApiContext) -> Response {
    let mut controller = ctx
        .controller("PostsController")
        .with_public_actions(["index", "view"]);
    ctx.before_render(&mut controller);
    let denied = ctx.deny_public("view");
    controller.set("viewDenied", denied);
    controller.set("indexPublic", ctx.is_public("index"));
    controller.set_template_output("<ul></ul>");
    controller.into_response()
}

pub(crate) async fn redirect_with_status(ctx: ApiContext, Path(status): Path<u16>) -> Response {
    let controller = ctx.controller("PostsController");
    ctx.redirect(controller, "/posts", Some(status))
}

pub(crate) async fn redirect_default(ctx: ApiContext) -> Response {
    let controller = ctx.controller("PostsController");
    ctx.redirect(controller, "/posts", None)
}

pub(crate) async fn render_after_halt(ctx: ApiContext) -> Response {
    let mut controller = ctx.controller("PostsController");
    ctx.before_redirect(&mut controller, "/gone", Some(404), true);
    // Anything the handler does afterwards must not change the response.
    let decision = ctx.before_render(&mut controller);
    controller.set("late", decision.is_some());
    controller.into_response()
}

pub(crate) async fn late_render_after_halt(ctx: ApiContext) -> Response {
    let mut controller = ctx.controller("PostsController");
    ctx.before_redirect(&mut controller, "/gone", Some(404), true);

    let mut late = ctx.controller("PostsController");
    late.set_template_output("<h1>late</h1>");
    ctx.render(late)
}

pub(crate) async fn error_page(ctx: ApiContext) -> Response {
    let mut controller = ctx.controller("ErrorController");
    controller.response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    controller.set("message", "boom");
    controller.set_template_output("<h1>Error</h1>");
    ctx.render(controller)
}

pub(crate) async fn html_failure() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, Html("<p>bad request</p>"))
}

pub(crate) async fn jsonp(ctx: ApiContext) -> Response {
    ctx.allow_jsonp(true);
    ctx.render(ctx.controller("PostsController"))
}

/// Routes exercising every lifecycle hook.
pub(crate) fn posts_router() -> Router {
    Router::new()
        .route("/posts", get(index_posts))
        .route("/posts/{id}", get(view_post))
        .route("/redirect", get(redirect_default))
        .route("/redirect/{status}", get(redirect_with_status))
        .route("/halted", get(render_after_halt))
        .route("/halted/render", get(late_render_after_halt))
        .route("/error", get(error_page))
        .route("/failure", get(html_failure))
        .route("/jsonp", get(jsonp))
}

// ============================================================================
// Router Helpers
// ============================================================================

/// Creates a test router with the full middleware stack around `posts_router()`.
pub(crate) async fn create_test_router(config: Option<Config>) -> Router {
    let config = config.unwrap_or_else(create_base_config);

    FluentRouter::without_state(config)
        .expect("Failed to create FluentRouter")
        .merge(posts_router())
        .setup_middleware()
        .await
        .expect("Failed to setup middleware")
        .into_inner()
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Creates a GET request to the specified URI with a `Host` header.
pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "api.example.com")
        .body(Body::empty())
        .unwrap()
}

/// Creates a GET request accepting JSON only.
pub(crate) fn json_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "api.example.com")
        .header("accept", "application/json")
        .body(Body::empty())
        .unwrap()
}

/// Creates a GET request the way a browser would send it.
pub(crate) fn html_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "www.example.com")
        .header("accept", "text/html,application/xhtml+xml,*/*;q=0.8")
        .body(Body::empty())
        .unwrap()
}

/// Creates a request with a custom request ID header.
pub(crate) fn request_with_id(uri: &str, request_id: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "api.example.com")
        .header("x-request-id", request_id)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Extracts the body from a response as a String.
pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}

/// Extracts the body from a response as JSON.
pub(crate) async fn get_body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).expect("response body is not JSON")
}
