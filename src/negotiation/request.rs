//! Request metadata the classifier and the redirect interceptor read.

use {
    crate::utils::media_type_essence,
    http::{HeaderMap, Request, header, request::Parts},
};

/// Route extension declared by the host router, e.g. the `json` in `/posts/1.json`.
///
/// Insert it into the request extensions when routing already parsed the
/// extension; otherwise it is derived from the last path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExtension(pub String);

/// Snapshot of the parts of an HTTP request that drive classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    path: String,
    extension: Option<String>,
    accept: Vec<String>,
    host: Option<String>,
    scheme: String,
}

impl RequestMeta {
    /// Builds the metadata from a path and raw `Accept` header value.
    ///
    /// ```
    /// use axum_api_negotiation::RequestMeta;
    ///
    /// let meta = RequestMeta::new("/posts/1.json", Some("text/html"));
    /// assert_eq!(meta.extension(), Some("json"));
    /// assert!(meta.accepts("text/html"));
    /// ```
    pub fn new(path: impl Into<String>, accept: Option<&str>) -> Self {
        let path = path.into();
        let extension = extension_from_path(&path);
        Self {
            path,
            extension,
            accept: accept.map(parse_accept).unwrap_or_default(),
            host: None,
            scheme: "http".into(),
        }
    }

    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self::from_uri_and_headers(
            req.uri(),
            req.headers(),
            req.extensions().get::<RouteExtension>(),
        )
    }

    pub fn from_parts(parts: &Parts) -> Self {
        Self::from_uri_and_headers(
            &parts.uri,
            &parts.headers,
            parts.extensions.get::<RouteExtension>(),
        )
    }

    fn from_uri_and_headers(
        uri: &http::Uri,
        headers: &HeaderMap,
        declared: Option<&RouteExtension>,
    ) -> Self {
        let path = uri.path().to_string();
        let extension = match declared {
            Some(RouteExtension(ext)) => Some(ext.clone()),
            None => extension_from_path(&path),
        };

        let accept = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parse_accept)
            .collect();

        let host = uri
            .authority()
            .map(|a| a.to_string())
            .or_else(|| {
                headers
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            });

        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| s == "http" || s == "https")
            .or_else(|| uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".into());

        Self {
            path,
            extension,
            accept,
            host,
            scheme,
        }
    }

    /// Overrides the declared route extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Media types listed in the `Accept` header(s), without parameters.
    pub fn accepted(&self) -> &[String] {
        &self.accept
    }

    /// Whether the client explicitly listed `mime`. Wildcard ranges such as
    /// `*/*` or `application/*` do not count.
    pub fn accepts(&self, mime: &str) -> bool {
        self.accept.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }
}

fn parse_accept(value: &str) -> Vec<String> {
    value.split(',').filter_map(media_type_essence).collect()
}

fn extension_from_path(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}
