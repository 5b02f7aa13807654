use crate::{Error, Result};
use serde::Deserialize;

/// Selects which middleware [`FluentRouter::setup_middleware`](crate::FluentRouter::setup_middleware)
/// installs. Either only the listed ones (`include`) or all but the listed ones (`exclude`).
///
/// ```toml
/// [http]
/// exclude = ["request-id"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMiddlewareConfig {
    Include(Vec<HttpMiddleware>),
    Exclude(Vec<HttpMiddleware>),
}

impl HttpMiddlewareConfig {
    pub fn is_enabled(&self, middleware: HttpMiddleware) -> bool {
        match self {
            HttpMiddlewareConfig::Include(list) => list.contains(&middleware),
            HttpMiddlewareConfig::Exclude(list) => !list.contains(&middleware),
        }
    }

    /// Validates middleware dependencies are satisfied.
    ///
    /// - `ErrorRendering` rewrites responses based on the classification, so it
    ///   needs `ApiNegotiation`.
    pub fn validate(&self) -> Result<()> {
        if self.is_enabled(HttpMiddleware::ErrorRendering)
            && !self.is_enabled(HttpMiddleware::ApiNegotiation)
        {
            return Err(Error::invalid_input(
                "ErrorRendering requires ApiNegotiation. Remove 'api-negotiation' from Exclude list or add both to Include list.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum HttpMiddleware {
    ApiNegotiation,
    ErrorRendering,
    RequestId,
    Logging,
    CatchPanic,
}
