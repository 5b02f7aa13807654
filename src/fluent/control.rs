//! Panic recovery middleware.

use super::router::FluentRouter;
use crate::{ErrorResponse, HttpMiddleware};

use {
    axum::{
        Json,
        response::{IntoResponse, Response},
    },
    http::StatusCode,
    tower_http::catch_panic::CatchPanicLayer,
};

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(err: &(dyn std::any::Any + Send + 'static)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        format!("Service panicked: {}", s)
    } else if let Some(s) = err.downcast_ref::<&str>() {
        format!("Service panicked: {}", s)
    } else {
        "`CatchPanic` was unable to downcast the panic info".to_string()
    }
}

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up panic recovery.
    ///
    /// A panicking handler yields a `500 Internal Server Error` with a JSON
    /// [`ErrorResponse`] body, for browser and API clients alike. The panic
    /// message is logged and, when configured, sent to the panic notification
    /// channel; it is never exposed to the client.
    ///
    /// This middleware is included in `setup_middleware()` as the outermost
    /// layer so that panics in every other layer are caught too.
    #[must_use]
    pub fn setup_catch_panic(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::CatchPanic) {
            return self;
        }

        let panic_channel = self.panic_channel.clone();
        self.inner = self.inner.layer(CatchPanicLayer::custom(
            move |err: Box<dyn std::any::Any + Send + 'static>| -> Response {
                let msg = panic_message(err.as_ref());

                tracing::error!("{}", msg);
                if let Some(ch) = &panic_channel {
                    ch.try_send(msg).ok();
                }

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "Internal Server Error",
                    )),
                )
                    .into_response()
            },
        ));
        self
    }
}
