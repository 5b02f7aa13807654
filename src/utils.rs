//!
//! Utility types and functions shared by the configuration and middleware layers.
//!
//! This module provides:
//! - [`RequestIdGenerator`] - Generates or preserves request IDs for log correlation
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//! - [`media_type_essence`] - Normalizes a media range for Accept-header comparisons
//!

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::{ContextV7, Timestamp, Uuid},
};

/// Matches `{{ VAR_NAME }}` with optional whitespace around an uppercase variable name.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Request ID generator used by the `request-id` middleware.
///
/// Preserves an incoming `x-request-id` header, otherwise generates a
/// time-ordered UUIDv7 so log lines of one request (including the API
/// classification span field) can be correlated.
#[derive(Debug, Clone, Copy)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        match req.headers().get("x-request-id") {
            Some(value) => Some(RequestId::new(value.clone())),
            None => {
                let cx = ContextV7::new().with_additional_precision();
                let uuid = Uuid::new_v7(Timestamp::now(cx));
                let value = HeaderValue::from_str(&uuid.to_string()).ok()?;
                Some(RequestId::new(value))
            }
        }
    }
}

/// Replaces handlebars-style placeholders with environment variable values.
///
/// `{{VAR}}`, `{{ VAR }}` and `{{  VAR  }}` are equivalent. Unset variables are
/// replaced with an empty string and a warning is logged.
///
/// ```
/// use axum_api_negotiation::replace_handlebars_with_env;
///
/// let result = replace_handlebars_with_env("base_url = \"{{ MISSING_BASE_URL }}\"");
/// assert_eq!(result, "base_url = \"\"");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Returns the `type/subtype` part of a media range, lowercased and without
/// parameters. Returns `None` for blank entries.
///
/// ```
/// use axum_api_negotiation::media_type_essence;
///
/// assert_eq!(media_type_essence(" Application/JSON; q=0.9"), Some("application/json".into()));
/// assert_eq!(media_type_essence("  "), None);
/// ```
pub fn media_type_essence(range: &str) -> Option<String> {
    let essence = range.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}
