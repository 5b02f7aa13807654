//! Request correlation middleware.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    crate::utils::RequestIdGenerator,
    http::HeaderName,
    tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up request ID generation and propagation.
    ///
    /// Requests without an `x-request-id` header get a UUIDv7; the id is
    /// echoed on the response, including intercepted API redirects and
    /// rendered API errors.
    ///
    /// If a request already has an `x-request-id` header, it is preserved.
    #[must_use]
    pub fn setup_request_id(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::RequestId) {
            return self;
        }

        let x_request_id = HeaderName::from_static("x-request-id");
        self.inner = self
            .inner
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                RequestIdGenerator,
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id));
        self
    }
}
