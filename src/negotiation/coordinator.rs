//! Per-request orchestration of classification, shaping and redirect interception.
//!
//! ```text
//! Uninitialized ──ensure_bound──▶ Bound ──classify──▶ Classified
//!                                                        │
//!                         API redirect (any status) ─────▶ halted
//! ```
//!
//! Classification happens once and is cached; the middleware may classify
//! up front so that the request span and extensions carry the cached value.
//! Binding happens on whichever hook fires first and exactly once. A halted
//! coordinator ignores every later hook and keeps the response it sent.

use {
    super::{
        ClassificationResult, Controller, PublicActions, RedirectDecision, RedirectInterceptor,
        RequestClassifier, RequestMeta, ResponseDecision, ResponseShaper, UrlResolver,
    },
    crate::ApiConfig,
    std::sync::Arc,
};

/// Which renderer turns faults into responses for the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorRenderer {
    /// The host's own error pages.
    #[default]
    Default,
    /// JSON [`ErrorResponse`](crate::ErrorResponse) bodies.
    Api,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Uninitialized,
    /// Request handle cached, classification pending.
    Bound { request: RequestMeta },
    Classified {
        request: RequestMeta,
        classification: ClassificationResult,
    },
}

#[derive(Debug)]
pub struct LifecycleCoordinator {
    classifier: Arc<RequestClassifier>,
    settings: Arc<ApiConfig>,
    shaper: ResponseShaper,
    interceptor: RedirectInterceptor,
    phase: Phase,
    bound: bool,
    public_actions: PublicActions,
    allow_jsonp: bool,
    error_renderer: ErrorRenderer,
    force_json: bool,
    sent: Option<Controller>,
}

impl LifecycleCoordinator {
    pub fn new(classifier: Arc<RequestClassifier>, settings: Arc<ApiConfig>) -> Self {
        let interceptor = RedirectInterceptor::new(UrlResolver::new(settings.base_url()));
        let allow_jsonp = settings.allow_jsonp;
        Self {
            classifier,
            settings,
            shaper: ResponseShaper,
            interceptor,
            phase: Phase::Uninitialized,
            bound: false,
            public_actions: PublicActions::new(),
            allow_jsonp,
            error_renderer: ErrorRenderer::Default,
            force_json: false,
            sent: None,
        }
    }

    /// One-time setup. Later calls return the cached classification and change
    /// nothing. `seed` is the host-supplied public action list; when `None`,
    /// the configured default list is used.
    pub fn ensure_bound(
        &mut self,
        request: &RequestMeta,
        seed: Option<&[String]>,
    ) -> ClassificationResult {
        let classification = self.classify(request);
        if self.bound {
            return classification;
        }
        self.bound = true;

        if classification.is_api {
            self.error_renderer = ErrorRenderer::Api;
            let seed = seed.unwrap_or(self.settings.public_actions.as_slice());
            if self.public_actions.seed_if_empty(seed.iter().cloned()) {
                tracing::debug!(count = self.public_actions.len(), "Public actions seeded");
            }
            self.force_json = true;
        }

        classification
    }

    /// Classifies `request` unless a classification is already cached, in
    /// which case the cached value is returned and `request` is ignored.
    /// Unlike [`ensure_bound`](Self::ensure_bound) this has no side effects
    /// on renderer, public actions or content type.
    pub fn classify(&mut self, request: &RequestMeta) -> ClassificationResult {
        if let Some(classification) = self.classification() {
            return classification;
        }

        let request = match std::mem::take(&mut self.phase) {
            Phase::Bound { request } => request,
            _ => request.clone(),
        };
        let classification = self.classifier.classify(&request);
        self.phase = Phase::Classified {
            request,
            classification,
        };
        classification
    }

    /// Pre-render hook. Returns `None` once processing was halted.
    pub fn before_render(&mut self, controller: &mut Controller) -> Option<ResponseDecision> {
        if self.is_halted() {
            tracing::debug!(controller = %controller.name(), "Processing halted, render skipped");
            return None;
        }

        let decision = self.shape(controller);
        decision.apply(controller);
        Some(decision)
    }

    fn shape(&mut self, controller: &Controller) -> ResponseDecision {
        let classification =
            self.ensure_bound(controller.request(), controller.public_actions());
        let has_error =
            ResponseShaper::has_error(controller.name(), &self.settings.error_controller);

        self.shaper.shape(
            classification,
            has_error,
            self.settings.debug,
            self.allow_jsonp,
            &self.settings,
        )
    }

    /// Pre-redirect hook. For API requests the controller ends up fully
    /// formed (rendered and sent, or sent bare for 404) and the coordinator
    /// halts. Returns `None` once processing was halted.
    pub fn before_redirect(
        &mut self,
        controller: &mut Controller,
        url: &str,
        status: Option<u16>,
        allow_exit: bool,
    ) -> Option<RedirectDecision> {
        if self.is_halted() {
            tracing::debug!(controller = %controller.name(), "Processing halted, redirect skipped");
            return None;
        }

        let classification =
            self.ensure_bound(controller.request(), controller.public_actions());
        let decision = self.interceptor.intercept(
            classification,
            controller.request(),
            url,
            status,
            allow_exit,
        );

        decision.apply(controller);
        if let RedirectDecision::Render { .. } = decision {
            // The body is exactly the redirect fields.
            self.shape(controller).apply_view(controller);
            controller.render();
            controller.response.send();
        }

        if decision.stops_processing() {
            tracing::info!(
                controller = %controller.name(),
                status = ?decision.status_code(),
                terminal = decision.is_terminal(),
                "API redirect sent, processing halted"
            );
            self.sent = Some(controller.clone());
        }

        Some(decision)
    }

    /// Removes `action` from the public actions of this request.
    pub fn deny_public(&mut self, action: &str) -> bool {
        self.public_actions.deny(action)
    }

    pub fn allow_jsonp(&mut self, value: bool) {
        self.allow_jsonp = value;
    }

    pub fn public_actions(&self) -> &PublicActions {
        &self.public_actions
    }

    pub fn public_actions_mut(&mut self) -> &mut PublicActions {
        &mut self.public_actions
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn classification(&self) -> Option<ClassificationResult> {
        match self.phase {
            Phase::Classified { classification, .. } => Some(classification),
            _ => None,
        }
    }

    pub fn error_renderer(&self) -> ErrorRenderer {
        self.error_renderer
    }

    /// Whether responses of this request must be declared as JSON.
    pub fn forces_json(&self) -> bool {
        self.force_json
    }

    pub fn is_halted(&self) -> bool {
        self.sent.is_some()
    }

    /// The controller as it was when processing halted. Anything rendered
    /// afterwards must be replaced by this.
    pub fn sent_response(&self) -> Option<&Controller> {
        self.sent.as_ref()
    }

    /// Back to `Uninitialized` for reuse with another request.
    pub fn reset(&mut self) {
        self.phase = Phase::Uninitialized;
        self.bound = false;
        self.public_actions.clear();
        self.allow_jsonp = self.settings.allow_jsonp;
        self.error_renderer = ErrorRenderer::Default;
        self.force_json = false;
        self.sent = None;
    }
}
