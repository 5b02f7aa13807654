//! Request classification, response shaping and redirect interception.
//!
//! The pieces are synchronous and host-agnostic; [`crate::fluent`] binds them
//! to axum through middleware and the [`ApiContext`](crate::ApiContext)
//! extractor.

mod classifier;
mod controller;
mod coordinator;
mod public_actions;
mod redirect;
mod request;
mod shaper;

pub use {
    classifier::{ClassificationResult, Detector, DetectorFn, JSON_MIME, RequestClassifier},
    controller::{Controller, DEFAULT_VIEW_CLASS, ResponseHead, ViewState, media_type_for},
    coordinator::{ErrorRenderer, LifecycleCoordinator, Phase},
    public_actions::PublicActions,
    redirect::{
        DEFAULT_REDIRECT_STATUS, REDIRECT_VIEW, RedirectBody, RedirectDecision,
        RedirectInterceptor, UrlResolver,
    },
    request::{RequestMeta, RouteExtension},
    shaper::{API_VIEW_CLASS, ApiShape, DEBUG_HELPER, Layout, ResponseDecision, ResponseShaper},
};
