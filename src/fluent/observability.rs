//! Observability middleware: request spans carrying the request id and the
//! API classification.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {axum::body::Body, http::Request, tower_http::trace::TraceLayer as TowerHTTPLayer};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up HTTP request/response logging middleware.
    ///
    /// Every request runs inside an `http_request` span with the method, URI,
    /// `x-request-id` and an `api` field. The `api` field is filled in by the
    /// API negotiation middleware once the request is classified, so log
    /// lines of API and browser traffic can be told apart.
    ///
    /// Log output format is controlled by the `logging.format` configuration.
    #[must_use]
    pub fn setup_logging(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Logging) {
            return self;
        }

        self.inner = self.inner.layer(TowerHTTPLayer::new_for_http().make_span_with(
            |request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                    api = tracing::field::Empty,
                )
            },
        ));

        self
    }
}
