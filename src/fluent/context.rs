//! The handler-side handle on the per-request [`LifecycleCoordinator`].

use {
    crate::{
        ClassificationResult, Controller, Error, LifecycleCoordinator, RedirectDecision,
        RequestMeta, ResponseDecision,
    },
    axum::{
        body::Body,
        extract::FromRequestParts,
        response::{IntoResponse, Response},
    },
    http::{StatusCode, header, request::Parts},
    std::sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Access to the lifecycle hooks of the current request.
///
/// Installed in request extensions by the `api-negotiation` middleware and
/// extracted in handlers:
///
/// ```rust,no_run
/// use axum::response::Response;
/// use axum_api_negotiation::ApiContext;
///
/// async fn view(ctx: ApiContext) -> Response {
///     let mut controller = ctx.controller("PostsController");
///     controller.set("id", 1);
///     ctx.render(controller)
/// }
/// ```
///
/// Clones share the same coordinator.
#[derive(Debug, Clone)]
pub struct ApiContext {
    coordinator: Arc<Mutex<LifecycleCoordinator>>,
    request: Arc<RequestMeta>,
    classification: ClassificationResult,
}

impl ApiContext {
    pub(crate) fn new(
        coordinator: Arc<Mutex<LifecycleCoordinator>>,
        request: Arc<RequestMeta>,
        classification: ClassificationResult,
    ) -> Self {
        Self {
            coordinator,
            request,
            classification,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleCoordinator> {
        // Hooks never leave the coordinator half-updated.
        self.coordinator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn classification(&self) -> ClassificationResult {
        self.classification
    }

    pub fn is_api(&self) -> bool {
        self.classification.is_api
    }

    pub fn request(&self) -> &RequestMeta {
        &self.request
    }

    /// A fresh controller for this request.
    pub fn controller(&self, name: impl Into<String>) -> Controller {
        Controller::new(name, RequestMeta::clone(&self.request))
    }

    pub fn before_render(&self, controller: &mut Controller) -> Option<ResponseDecision> {
        self.lock().before_render(controller)
    }

    pub fn before_redirect(
        &self,
        controller: &mut Controller,
        url: &str,
        status: Option<u16>,
        allow_exit: bool,
    ) -> Option<RedirectDecision> {
        self.lock()
            .before_redirect(controller, url, status, allow_exit)
    }

    /// Runs the pre-render hook and renders the controller. Once processing
    /// was halted the response sent at that point is returned instead.
    pub fn render(&self, mut controller: Controller) -> Response {
        let sent = {
            let mut coordinator = self.lock();
            match coordinator.before_render(&mut controller) {
                Some(_) => None,
                None => coordinator.sent_response().cloned(),
            }
        };
        sent.unwrap_or(controller).into_response()
    }

    /// Redirects. API requests get the intercepted response; everything else
    /// gets a plain redirect with a `Location` header. Once processing was
    /// halted the response sent at that point is returned instead.
    pub fn redirect(&self, mut controller: Controller, url: &str, status: Option<u16>) -> Response {
        let mut coordinator = self.lock();
        match coordinator.before_redirect(&mut controller, url, status, true) {
            Some(RedirectDecision::Passthrough { .. }) => plain_redirect(url, status),
            Some(_) => controller.into_response(),
            None => coordinator
                .sent_response()
                .cloned()
                .unwrap_or(controller)
                .into_response(),
        }
    }

    /// Binds with the configured public actions unless a hook already bound.
    fn bound(&self) -> MutexGuard<'_, LifecycleCoordinator> {
        let mut coordinator = self.lock();
        coordinator.ensure_bound(&self.request, None);
        coordinator
    }

    /// Removes `action` from the public actions of this request.
    pub fn deny_public(&self, action: &str) -> bool {
        self.bound().deny_public(action)
    }

    pub fn is_public(&self, action: &str) -> bool {
        self.bound().public_actions().is_public(action)
    }

    pub fn allow_jsonp(&self, value: bool) {
        self.lock().allow_jsonp(value);
    }

    pub fn is_halted(&self) -> bool {
        self.lock().is_halted()
    }
}

fn plain_redirect(url: &str, status: Option<u16>) -> Response {
    let status = status
        .filter(|s| *s != 0)
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::FOUND);

    Response::builder()
        .status(status)
        .header(header::LOCATION, url)
        .body(Body::empty())
        .unwrap_or_else(|err| {
            Error::invalid_input(format!("invalid redirect target {url:?}: {err}")).into_response()
        })
}

impl<S> FromRequestParts<S> for ApiContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ApiContext>()
            .cloned()
            .ok_or_else(|| Error::internal("API negotiation middleware is not installed"))
    }
}
