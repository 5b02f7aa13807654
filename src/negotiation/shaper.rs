//! Response shaping: which view class, layout and variables an API response gets.

use {
    super::{ClassificationResult, Controller},
    crate::ApiConfig,
};

/// View class of API responses.
pub const API_VIEW_CLASS: &str = "Api";

/// Helper appended to API responses while debugging, pretty-printing JSON output.
pub const DEBUG_HELPER: &str = "JsonFormat";

/// Layout of an API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Default,
    Error,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Default => "json/default",
            Layout::Error => "json/error",
        }
    }
}

/// Everything an API response is coerced into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiShape {
    pub content_type: &'static str,
    pub view_class: &'static str,
    pub layout: Layout,
    /// Always `None`: a stale nested path from an earlier phase of the request
    /// would otherwise compose into paths like `json/json/default`.
    pub layout_path: Option<String>,
    pub debug_helper: Option<&'static str>,
    pub allow_jsonp: bool,
    pub show_pagination_links: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDecision {
    /// Not an API request. The host's pipeline stays untouched.
    Passthrough,
    Api(ApiShape),
}

impl ResponseDecision {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, ResponseDecision::Passthrough)
    }

    pub fn shape(&self) -> Option<&ApiShape> {
        match self {
            ResponseDecision::Passthrough => None,
            ResponseDecision::Api(shape) => Some(shape),
        }
    }

    /// Applies the decision to the controller. A passthrough changes nothing.
    pub fn apply(&self, controller: &mut Controller) {
        let ResponseDecision::Api(shape) = self else {
            return;
        };

        self.apply_view(controller);
        controller.set("allowJsonp", shape.allow_jsonp);
        controller.set("showPaginationLinks", shape.show_pagination_links);
    }

    /// Content type, view class, helpers and layout only. Template variables
    /// are left alone, so fixed-shape bodies such as API redirects keep their
    /// exact fields.
    pub fn apply_view(&self, controller: &mut Controller) {
        let ResponseDecision::Api(shape) = self else {
            return;
        };

        controller.response.set_type(shape.content_type);
        controller.view.view_class = shape.view_class.into();
        if let Some(helper) = shape.debug_helper {
            if !controller.view.helpers.iter().any(|h| h == helper) {
                controller.view.helpers.push(helper.into());
            }
        }
        controller.view.layout = Some(shape.layout.as_str().into());
        controller.view.layout_path = shape.layout_path.clone();
    }
}

/// Decides layout, view class and view variables for API responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseShaper;

impl ResponseShaper {
    /// An error is in progress iff the active controller is the host's
    /// designated error controller.
    pub fn has_error(controller_name: &str, error_controller: &str) -> bool {
        controller_name == error_controller
    }

    pub fn shape(
        &self,
        classification: ClassificationResult,
        has_error: bool,
        debug_enabled: bool,
        allow_jsonp: bool,
        settings: &ApiConfig,
    ) -> ResponseDecision {
        if !classification.is_api {
            return ResponseDecision::Passthrough;
        }

        ResponseDecision::Api(ApiShape {
            content_type: "json",
            view_class: API_VIEW_CLASS,
            layout: if has_error { Layout::Error } else { Layout::Default },
            layout_path: None,
            debug_helper: debug_enabled.then_some(DEBUG_HELPER),
            allow_jsonp,
            show_pagination_links: settings.show_pagination_links(),
        })
    }
}
