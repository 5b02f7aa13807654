//! API negotiation middleware: per-request coordinator, classification and
//! error rendering for API requests.

use {
    super::{context::ApiContext, router::FluentRouter},
    crate::{
        ErrorRenderer, ErrorResponse, HttpMiddleware, JSON_MIME,
        LifecycleCoordinator, RequestMeta, media_type_essence,
    },
    axum::{
        Json,
        body::Body,
        extract::Request,
        middleware::{self, Next},
        response::{IntoResponse, Response},
    },
    http::{HeaderValue, header},
    std::sync::{Arc, Mutex, PoisonError},
};

/// What the middleware does with the handler's response once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Finish {
    renderer: ErrorRenderer,
    force_json: bool,
    halted: bool,
}

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up API request negotiation.
    ///
    /// For every request the middleware:
    ///
    /// 1. builds the [`RequestMeta`] (path, extension, `Accept`, host, scheme),
    /// 2. classifies it once through the per-request coordinator, which caches
    ///    the result, and records it on the current request span
    ///    (`api` field) and in request extensions as a [`ClassificationResult`](crate::ClassificationResult),
    /// 3. inserts an [`ApiContext`] that handlers extract to reach the
    ///    lifecycle hooks,
    /// 4. after the handler, binds the coordinator if no hook did, then for
    ///    API requests declares the JSON content type and (with the
    ///    `error-rendering` middleware enabled) replaces non-JSON error pages
    ///    with a JSON [`ErrorResponse`].
    ///
    /// A terminal redirect (bare 404) keeps its empty body and only gains the
    /// JSON content type.
    ///
    /// # Configuration
    ///
    /// ```toml
    /// [api]
    /// debug = false
    /// allow_jsonp = false
    /// error_controller = "ErrorController"
    /// public_actions = ["index", "view"]
    /// ```
    #[must_use]
    pub fn setup_api_negotiation(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::ApiNegotiation) {
            return self;
        }

        let classifier = self.classifier.clone();
        let settings = Arc::new(self.config.api.clone());
        let render_errors = self.is_middleware_enabled(HttpMiddleware::ErrorRendering);

        self.inner = self.inner.layer(middleware::from_fn(
            move |mut req: Request<Body>, next: Next| {
                let classifier = classifier.clone();
                let settings = settings.clone();
                async move {
                    let meta = Arc::new(RequestMeta::from_request(&req));
                    let mut coordinator = LifecycleCoordinator::new(classifier, settings);
                    let classification = coordinator.classify(&meta);
                    tracing::Span::current().record("api", classification.is_api);

                    let coordinator = Arc::new(Mutex::new(coordinator));
                    req.extensions_mut().insert(classification);
                    req.extensions_mut().insert(ApiContext::new(
                        coordinator.clone(),
                        meta.clone(),
                        classification,
                    ));

                    let response = next.run(req).await;

                    let finish = {
                        let mut coordinator =
                            coordinator.lock().unwrap_or_else(PoisonError::into_inner);
                        coordinator.ensure_bound(&meta, None);
                        Finish {
                            renderer: coordinator.error_renderer(),
                            force_json: coordinator.forces_json(),
                            halted: coordinator.is_halted(),
                        }
                    };

                    finish_response(response, finish, render_errors)
                }
            },
        ));
        self
    }
}

fn is_json_content(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(media_type_essence)
        .is_some_and(|essence| essence == JSON_MIME || essence.ends_with("+json"))
}

fn finish_response(mut response: Response, finish: Finish, render_errors: bool) -> Response {
    let status = response.status();
    // A halted response is final: its body stays as sent, bare 404 included.
    if render_errors
        && !finish.halted
        && finish.renderer == ErrorRenderer::Api
        && (status.is_client_error() || status.is_server_error())
        && !is_json_content(&response)
    {
        tracing::debug!(status = status.as_u16(), "Rendering API error response");
        let (mut parts, _) = response.into_parts();
        let rendered = (status, Json(ErrorResponse::from_status(status))).into_response();
        let (rendered_parts, body) = rendered.into_parts();
        parts.headers.remove(header::CONTENT_LENGTH);
        parts.headers.extend(rendered_parts.headers);
        return Response::from_parts(parts, body);
    }

    if finish.force_json && !response.headers().contains_key(header::CONTENT_TYPE) {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_MIME),
        );
    }
    response
}
