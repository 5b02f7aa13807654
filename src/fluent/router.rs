//! Core FluentRouter struct and initialization methods.

use {
    crate::{Config, HttpMiddleware, RequestClassifier, RequestMeta, Result},
    axum::Router,
    std::sync::Arc,
};

/// Fluent builder for axum::Router with configuration-based middleware setup.
///
/// This wrapper around `axum::Router` provides a fluent API for configuring middleware
/// and routes based on the application configuration. Create instances using
/// [`FluentRouter::without_state`] or [`FluentRouter::with_state`].
///
/// The router owns the [`RequestClassifier`] used by the API negotiation
/// middleware. Replace it with [`FluentRouter::with_classifier`] to register
/// additional API formats before calling `setup_middleware()`.
///
/// ```rust,no_run
/// use axum_api_negotiation::{Config, FluentRouter, RequestClassifier};
///
/// # async fn example() -> axum_api_negotiation::Result<()> {
/// let classifier = RequestClassifier::default()
///     .with_format("xml", |req| req.extension() == Some("xml"));
///
/// FluentRouter::without_state(Config::default())?
///     .with_classifier(classifier)
///     .setup_middleware()
///     .await?
///     .start()
///     .await
/// # }
/// ```
pub struct FluentRouter<State = ()> {
    pub(crate) config: Config,
    pub(crate) state: State,
    pub(crate) inner: Router<State>,
    pub(crate) classifier: Arc<RequestClassifier>,
    pub(crate) panic_channel: Option<tokio::sync::mpsc::Sender<String>>,
}

impl FluentRouter {
    /// Creates a new `FluentRouter` without application state.
    pub fn without_state(config: Config) -> Result<FluentRouter<()>> {
        FluentRouter::<()>::with_state(config, ())
    }
}

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Creates a new `FluentRouter` with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails (bad bind address,
    /// relative `api.base_url`, empty `api.error_controller`, error rendering
    /// enabled without API negotiation).
    pub fn with_state<S: Clone + Send + Sync + 'static>(
        config: Config,
        state: S,
    ) -> Result<FluentRouter<S>> {
        config.validate()?;

        Ok(FluentRouter {
            config,
            state,
            inner: Router::new(),
            classifier: Arc::new(RequestClassifier::default()),
            panic_channel: None,
        })
    }

    /// Replaces the request classifier. Must be called before
    /// `setup_api_negotiation()` (or `setup_middleware()`) to take effect.
    #[must_use]
    pub fn with_classifier(self, classifier: RequestClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
            ..self
        }
    }

    /// Returns the classifier shared by all requests.
    pub fn classifier(&self) -> &RequestClassifier {
        &self.classifier
    }

    /// Returns the configuration this router was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classifies a request the same way the negotiation middleware will.
    pub fn classify(&self, request: &RequestMeta) -> crate::ClassificationResult {
        self.classifier.classify(request)
    }

    /// Helper method to check if a middleware is enabled in the configuration.
    /// Returns true if no middleware config is specified (all enabled by default),
    /// or if the middleware is explicitly enabled/not excluded.
    pub(crate) fn is_middleware_enabled(&self, middleware: HttpMiddleware) -> bool {
        self.config
            .http
            .middleware
            .as_ref()
            .map(|config| config.is_enabled(middleware))
            .unwrap_or(true)
    }

    /// Sets a notification channel for panic messages.
    ///
    /// Any panic caught by the panic handler middleware sends its message to
    /// this channel. Sending never blocks; messages are dropped when full.
    ///
    /// ```rust,no_run
    /// # use axum_api_negotiation::{Config, FluentRouter};
    /// # async fn example() -> axum_api_negotiation::Result<()> {
    /// let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    ///
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .with_panic_notification_channel(tx);
    ///
    /// tokio::spawn(async move {
    ///     while let Some(panic_msg) = rx.recv().await {
    ///         eprintln!("Panic caught: {}", panic_msg);
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_panic_notification_channel(self, ch: tokio::sync::mpsc::Sender<String>) -> Self {
        Self {
            panic_channel: Some(ch),
            ..self
        }
    }
}
