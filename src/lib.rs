//! # axum-api-negotiation
//!
//! Detects whether a request comes from an API client (declared `.json`
//! extension or an explicit `Accept: application/json`) and, for those
//! requests, coerces the response pipeline into API-safe output:
//!
//! - responses render with the `Api` view class, the `json/default` or
//!   `json/error` layout and a JSON content type,
//! - redirects become `{"success": true, "url": ..., "status": ...}` bodies
//!   (or a bare 404) instead of browser redirects,
//! - error pages become JSON [`ErrorResponse`] bodies,
//! - per-request public actions can be revoked with `deny_public`.
//!
//! Browser requests pass through untouched.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{response::Response, routing::get};
//! use axum_api_negotiation::{ApiContext, Config, FluentRouter, Result};
//!
//! async fn view(ctx: ApiContext) -> Response {
//!     let mut controller = ctx.controller("PostsController");
//!     controller.set("title", "Hello");
//!     ctx.render(controller)
//! }
//!
//! async fn legacy(ctx: ApiContext) -> Response {
//!     ctx.redirect(ctx.controller("PostsController"), "/posts/1", Some(301))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();  // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     FluentRouter::without_state(config)?
//!         .route("/posts/{id}", get(view))
//!         .route("/old/{id}", get(legacy))
//!         .setup_middleware()
//!         .await?
//!         .start()
//!         .await
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [http]
//! bind_port = 3000
//!
//! [api]
//! base_url = "{{ PUBLIC_BASE_URL }}"
//! error_controller = "ErrorController"
//! public_actions = ["index", "view"]
//! ```
//!
//! # Without axum
//!
//! The [`negotiation`] types are plain synchronous values and can be driven
//! directly:
//!
//! ```rust
//! use axum_api_negotiation::{ApiConfig, Controller, LifecycleCoordinator, RequestClassifier, RequestMeta};
//! use std::sync::Arc;
//!
//! let mut coordinator = LifecycleCoordinator::new(
//!     Arc::new(RequestClassifier::default()),
//!     Arc::new(ApiConfig::default()),
//! );
//! let request = RequestMeta::new("/posts/1.json", None).with_host("example.com");
//! let mut controller = Controller::new("PostsController", request);
//!
//! coordinator.before_redirect(&mut controller, "/posts", Some(404), true);
//! assert!(coordinator.is_halted());
//! assert_eq!(controller.response.status(), 404);
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`negotiation`] | Classification, shaping, redirect interception, coordinator |
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `fluent` | Router builder and middleware setup ([`FluentRouter`], [`ApiContext`]) |
//! | `error` | Error types and handling ([`Error`]) |
//! | `utils` | Utilities ([`RequestIdGenerator`], [`replace_handlebars_with_env`]) |
mod config;
mod error;
mod fluent;
pub mod negotiation;
mod utils;

pub use config::*;
pub use error::*;
pub use fluent::*;
pub use negotiation::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
