//! Orchestration and router delegation: setup_middleware(), start(), layer(), route(), etc.

use super::router::FluentRouter;
use crate::Result;

use {
    axum::{Router, body::Body, routing::Route},
    http::Request,
    std::{convert::Infallible, net::SocketAddr, time::Duration},
    tokio::{signal, sync::watch},
    tower::{Layer, Service},
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up all standard middleware layers in the correct order.
    ///
    /// # Middleware Order
    ///
    /// Middleware is processed outside-in for requests and inside-out for responses.
    /// The **last layer added is the outermost layer** and executes **first** on incoming requests.
    ///
    /// From innermost to outermost:
    /// 1. **API negotiation** - Classify, expose [`ApiContext`](crate::ApiContext), render API errors
    /// 2. **Logging** - Request span, later tagged with the `api` classification
    /// 3. **Request ID** - Generate/extract ID before the span is opened
    /// 4. **Panic catching** - Catch ALL panics from inner layers (outermost)
    ///
    /// Routes must be added before calling this method; layers only wrap
    /// routes that already exist.
    ///
    /// Individual layers can be switched off with `[http] exclude = [...]`:
    ///
    /// ```toml
    /// [http]
    /// exclude = ["error-rendering", "request-id"]
    /// ```
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps room for layers whose setup
    /// can fail.
    pub async fn setup_middleware(self) -> Result<Self> {
        const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        tracing::info!("Starting {PACKAGE_NAME} version {VERSION}...");

        let router = self
            .setup_api_negotiation() // 1. Classification and API error rendering
            .setup_logging() // 2. Request/response logging
            .setup_request_id() // 3. Request ID - before the logging span opens
            .setup_catch_panic(); // 4. Outermost - panic recovery

        Ok(router)
    }

    /// Starts the HTTP server based on the current configuration.
    ///
    /// The server supports both HTTP/1.1 and HTTP/2 protocols automatically.
    ///
    /// # Graceful Shutdown
    ///
    /// On SIGTERM or SIGINT the server stops accepting connections and waits
    /// for in-flight requests, at most `http.shutdown_timeout`. If all
    /// connections drain earlier, shutdown completes early.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.http.full_bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Bound to {}", &bind_addr);
        tracing::info!("Waiting for connections");

        let service = self
            .inner
            .with_state(self.state)
            .into_make_service_with_connect_info::<SocketAddr>();

        let shutdown_timeout = self.config.http.shutdown_timeout;
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let serve_future = axum::serve(listener, service)
            .with_graceful_shutdown(shutdown_signal(shutdown_timeout, shutdown_tx));

        // The timeout only starts once a shutdown signal was received.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                if shutdown_rx.wait_for(|initiated| *initiated).await.is_err() {
                    std::future::pending::<()>().await;
                }
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }

    /// Adds a custom Tower middleware layer to the router.
    ///
    /// ```rust,no_run
    /// use tower::limit::ConcurrencyLimitLayer;
    /// # use axum_api_negotiation::{Config, FluentRouter};
    /// # fn example() -> axum_api_negotiation::Result<()> {
    ///
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .layer(ConcurrencyLimitLayer::new(100));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: axum::response::IntoResponse + 'static,
        <L::Service as Service<Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.inner = self.inner.layer(layer);
        self
    }

    /// Adds a new route to the router at the specified path.
    ///
    /// ```
    /// use axum_api_negotiation::{ApiContext, Config, FluentRouter};
    /// use axum::{response::Response, routing::get};
    ///
    /// async fn index(ctx: ApiContext) -> Response {
    ///     ctx.render(ctx.controller("PostsController"))
    /// }
    ///
    /// let router = FluentRouter::without_state(Config::default())
    ///     .unwrap()
    ///     .route("/posts", get(index))
    ///     .into_inner();
    /// ```
    #[must_use]
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter<State>) -> Self {
        self.inner = self.inner.route(path, route);
        self
    }

    /// Nests another router at a specific path prefix.
    #[must_use]
    pub fn nest(mut self, path: &str, router: Router<State>) -> Self {
        self.inner = self.inner.nest(path, router);
        self
    }

    /// Merges another router into this one.
    #[must_use]
    pub fn merge(mut self, other: Router<State>) -> Self {
        self.inner = self.inner.merge(other);
        self
    }

    /// Consumes the `FluentRouter` and returns the underlying `axum::Router`.
    pub fn into_inner(self) -> Router<State> {
        self.inner
    }
}

/// Resolves once SIGTERM or SIGINT (Ctrl+C) arrives, after flagging the
/// shutdown on `initiated` so the caller can start the grace period.
///
/// If signal registration fails, the function logs a warning and waits
/// indefinitely for the other signal.
async fn shutdown_signal(timeout: Duration, initiated: watch::Sender<bool>) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {
                tracing::debug!("Ctrl+C signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(
        "Shutdown signal received, starting graceful shutdown (timeout: {}s)",
        timeout.as_secs()
    );
    initiated.send_replace(true);
}
