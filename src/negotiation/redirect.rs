//! Redirect interception for API requests.
//!
//! A browser-style redirect is useless to an API client, so for API requests a
//! redirect is turned into either a bare status (404) or a JSON body
//! `{"success": true, "url": ..., "status": ...}`:
//!
//! | status        | response status | `Location` | body |
//! |---------------|-----------------|------------|------|
//! | unset / 0     | 302             | yes        | yes  |
//! | 301, 302      | same            | yes        | yes  |
//! | 404           | 404             | no         | no   |
//! | anything else | untouched       | no         | yes  |
//!
//! The 404 row is terminal: processing stops without a body. Only 301/302 get
//! a `Location` header, yet every other non-404 status still gets the body.

use {
    super::{ClassificationResult, Controller, RequestMeta},
    http::{StatusCode, header},
    serde::Serialize,
    serde_json::{Map, Value},
    url::Url,
};

/// View rendered for API redirects.
pub const REDIRECT_VIEW: &str = "redirect";

/// Status used when the caller did not supply one.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// JSON body of an API redirect. Field names are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectBody {
    pub success: bool,
    pub url: String,
    pub status: u16,
}

impl RedirectBody {
    /// The body as template variables, nothing else.
    pub fn into_vars(self) -> Map<String, Value> {
        let mut vars = Map::new();
        vars.insert("success".into(), self.success.into());
        vars.insert("url".into(), self.url.into());
        vars.insert("status".into(), self.status.into());
        vars
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Not an API request; the host redirects as usual and exits if `exit`.
    Passthrough { exit: bool },
    /// Bare status, no body, processing stops immediately.
    Halt { url: String, status: StatusCode },
    /// Body is rendered, then processing stops.
    Render {
        url: String,
        status: u16,
        /// Status to set on the response; `None` leaves the caller's status.
        response_status: Option<StatusCode>,
        location: Option<String>,
    },
}

impl RedirectDecision {
    /// True when processing must stop without rendering anything.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RedirectDecision::Halt { .. })
    }

    /// True for every API outcome: after it, no controller logic may run.
    pub fn stops_processing(&self) -> bool {
        !matches!(self, RedirectDecision::Passthrough { .. })
    }

    /// Normalized redirect status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RedirectDecision::Passthrough { .. } => None,
            RedirectDecision::Halt { status, .. } => Some(status.as_u16()),
            RedirectDecision::Render { status, .. } => Some(*status),
        }
    }

    pub fn absolute_url(&self) -> Option<&str> {
        match self {
            RedirectDecision::Passthrough { .. } => None,
            RedirectDecision::Halt { url, .. } | RedirectDecision::Render { url, .. } => Some(url),
        }
    }

    pub fn body(&self) -> Option<RedirectBody> {
        match self {
            RedirectDecision::Render { url, status, .. } => Some(RedirectBody {
                success: true,
                url: url.clone(),
                status: *status,
            }),
            _ => None,
        }
    }

    /// Applies status, `Location` header and template variables. The
    /// variables are replaced by the [`RedirectBody`] fields. A `Halt` is
    /// declared as JSON and sent bodiless so nothing renders afterwards.
    pub fn apply(&self, controller: &mut Controller) {
        match self {
            RedirectDecision::Passthrough { .. } => {}
            RedirectDecision::Halt { status, .. } => {
                controller.view.view = Some(REDIRECT_VIEW.into());
                controller.response.set_status(*status);
                controller.response.set_type("json");
                controller.response.send();
            }
            RedirectDecision::Render {
                response_status,
                location,
                ..
            } => {
                controller.view.view = Some(REDIRECT_VIEW.into());
                if let Some(response_status) = response_status {
                    controller.response.set_status(*response_status);
                }
                if let Some(location) = location {
                    controller.response.set_header(header::LOCATION, location);
                }
                if let Some(body) = self.body() {
                    controller.view.vars = body.into_vars();
                }
            }
        }
    }
}

/// Makes redirect targets absolute. An API client has no page context, so a
/// relative URL in a redirect body would be meaningless.
#[derive(Debug, Clone, Default)]
pub struct UrlResolver {
    base: Option<Url>,
}

impl UrlResolver {
    pub fn new(base: Option<Url>) -> Self {
        Self { base }
    }

    /// Absolute targets pass through. Relative ones are joined onto the
    /// configured base, else onto the request's scheme and host. When neither
    /// works the target is returned verbatim.
    pub fn resolve(&self, target: &str, request: &RequestMeta) -> String {
        if let Ok(url) = Url::parse(target) {
            return url.to_string();
        }

        let base = self.base.clone().or_else(|| {
            let host = request.host()?;
            Url::parse(&format!("{}://{}/", request.scheme(), host)).ok()
        });

        match base.map(|b| b.join(target)) {
            Some(Ok(url)) => url.to_string(),
            Some(Err(err)) => {
                tracing::warn!(target = %target, error = %err, "Unable to resolve redirect target");
                target.to_string()
            }
            None => {
                tracing::warn!(target = %target, "No base URL or Host header, redirect target left relative");
                target.to_string()
            }
        }
    }
}

/// Turns redirects of API requests into API-safe responses.
#[derive(Debug, Clone, Default)]
pub struct RedirectInterceptor {
    resolver: UrlResolver,
}

impl RedirectInterceptor {
    pub fn new(resolver: UrlResolver) -> Self {
        Self { resolver }
    }

    pub fn intercept(
        &self,
        classification: ClassificationResult,
        request: &RequestMeta,
        url: &str,
        status: Option<u16>,
        allow_exit: bool,
    ) -> RedirectDecision {
        if !classification.is_api {
            return RedirectDecision::Passthrough { exit: allow_exit };
        }

        let status = status
            .filter(|s| *s != 0)
            .unwrap_or(DEFAULT_REDIRECT_STATUS);
        let url = self.resolver.resolve(url, request);

        let decision = match status {
            404 => RedirectDecision::Halt {
                url,
                status: StatusCode::NOT_FOUND,
            },
            301 | 302 => RedirectDecision::Render {
                location: Some(url.clone()),
                url,
                status,
                response_status: StatusCode::from_u16(status).ok(),
            },
            _ => RedirectDecision::Render {
                url,
                status,
                response_status: None,
                location: None,
            },
        };

        tracing::debug!(
            status,
            url = ?decision.absolute_url(),
            terminal = decision.is_terminal(),
            "Redirect intercepted"
        );

        decision
    }
}
