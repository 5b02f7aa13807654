//! JSON API Example
//!
//! The same handlers serve browsers and API clients. API requests (a `.json`
//! extension or `Accept: application/json`) get JSON bodies, intercepted
//! redirects and JSON error pages.
//!
//! Run with:
//! ```bash
//! RUST_ENV=dev cargo run --example json_api
//! ```
//!
//! Then test:
//! ```bash
//! # Browser view vs API view of the same post
//! curl http://localhost:3000/posts/1
//! curl http://localhost:3000/posts/1.json
//!
//! # Redirect: a plain 301 for browsers, a JSON body for API clients
//! curl -i http://localhost:3000/old/1
//! curl -i -H "Accept: application/json" http://localhost:3000/old/1
//!
//! # Missing post: the API client gets a bare 404
//! curl -i -H "Accept: application/json" http://localhost:3000/old/99
//!
//! # Public actions of this request after `drafts` revoked itself
//! curl http://localhost:3000/drafts.json
//! ```

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
};
use axum_api_negotiation::{ApiContext, Config, FluentRouter, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Serialize)]
struct Post {
    id: u64,
    title: String,
}

struct AppState {
    posts: Vec<Post>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            posts: vec![
                Post {
                    id: 1,
                    title: "Hello".into(),
                },
                Post {
                    id: 2,
                    title: "Content negotiation".into(),
                },
            ],
        }
    }
}

async fn view_post(
    ctx: ApiContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: u64 = id.trim_end_matches(".json").parse().unwrap_or_default();
    let mut controller = ctx.controller("PostsController");

    match state.posts.iter().find(|p| p.id == id) {
        Some(post) => {
            controller.set("post", serde_json::to_value(post).unwrap_or_default());
            controller.set_template_output(format!("<h1>{}</h1>", post.title));
            ctx.render(controller)
        }
        None => ctx.redirect(controller, "/posts", Some(404)),
    }
}

async fn old_post(
    ctx: ApiContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Response {
    let controller = ctx.controller("PostsController");
    if state.posts.iter().any(|p| p.id == id) {
        ctx.redirect(controller, &format!("/posts/{id}"), Some(301))
    } else {
        ctx.redirect(controller, "/posts", Some(404))
    }
}

async fn drafts(ctx: ApiContext) -> Response {
    ctx.deny_public("drafts");

    let mut controller = ctx.controller("PostsController");
    controller.set("draftsPublic", ctx.is_public("drafts"));
    controller.set("indexPublic", ctx.is_public("index"));
    controller.set_template_output("<p>Drafts</p>");
    ctx.render(controller)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config: Config = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000

[api]
public_actions = ["index", "view", "drafts"]

[logging]
format = "default"
"#
    .parse()?;

    config.setup_tracing();

    let state = Arc::new(AppState::default());

    println!("Starting JSON API on http://127.0.0.1:3000");
    println!("Try: curl http://localhost:3000/posts/1.json");

    FluentRouter::<Arc<AppState>>::with_state(config, state)?
        .route("/posts/{id}", get(view_post))
        .route("/old/{id}", get(old_post))
        .route("/drafts.json", get(drafts))
        .route("/drafts", get(drafts))
        .setup_middleware()
        .await?
        .start()
        .await
}
