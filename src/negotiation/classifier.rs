//! Request classification: is this an API request, and in which format?
//!
//! Classification is a small table of named format detectors evaluated with
//! logical OR. The built-in table only knows `json`, so `is_api == is_json`.
//! Further formats are registered with [`RequestClassifier::with_format`]
//! without touching any call site:
//!
//! ```
//! use axum_api_negotiation::{RequestClassifier, RequestMeta};
//!
//! let classifier = RequestClassifier::default()
//!     .with_format("xml", |req| req.extension() == Some("xml"));
//!
//! let req = RequestMeta::new("/posts.xml", None);
//! assert!(!classifier.is_json(&req));
//! assert!(classifier.is_api(&req));
//! ```

use {super::RequestMeta, serde::Serialize, std::fmt};

/// Media type sniffed from the `Accept` header by the JSON detector.
pub const JSON_MIME: &str = "application/json";

pub type DetectorFn = dyn Fn(&RequestMeta) -> bool + Send + Sync;

/// Named boolean predicate over request metadata.
pub struct Detector {
    name: String,
    check: Box<DetectorFn>,
}

impl Detector {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RequestMeta) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, req: &RequestMeta) -> bool {
        (self.check)(req)
    }
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector").field("name", &self.name).finish()
    }
}

/// Outcome of classifying one request. Computed once, then cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub is_json: bool,
    pub is_api: bool,
}

impl ClassificationResult {
    /// Classification of a request that is plain browser traffic.
    pub const BROWSER: Self = Self {
        is_json: false,
        is_api: false,
    };

    /// Classification of a JSON API request.
    pub const JSON_API: Self = Self {
        is_json: true,
        is_api: true,
    };
}

/// The detector table. Shared read-only across requests.
#[derive(Debug)]
pub struct RequestClassifier {
    formats: Vec<Detector>,
}

impl Default for RequestClassifier {
    fn default() -> Self {
        Self {
            formats: vec![Detector::new("json", detect_json)],
        }
    }
}

/// Declared extension first, then the `Accept` header.
fn detect_json(req: &RequestMeta) -> bool {
    if req.extension() == Some("json") {
        return true;
    }
    req.accepts(JSON_MIME)
}

impl RequestClassifier {
    /// Registers another API format. A detector with an existing name replaces it.
    #[must_use]
    pub fn with_format<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RequestMeta) -> bool + Send + Sync + 'static,
    {
        let detector = Detector::new(name, check);
        match self.formats.iter_mut().find(|d| d.name == detector.name) {
            Some(existing) => *existing = detector,
            None => self.formats.push(detector),
        }
        self
    }

    /// Names of the registered formats, in evaluation order.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(Detector::name)
    }

    /// Evaluates one named detector. `"api"` is the OR over all formats;
    /// unknown names evaluate to false.
    pub fn is(&self, name: &str, req: &RequestMeta) -> bool {
        if name == "api" {
            return self.is_api(req);
        }
        self.formats
            .iter()
            .find(|d| d.name == name)
            .is_some_and(|d| d.matches(req))
    }

    pub fn is_json(&self, req: &RequestMeta) -> bool {
        self.is("json", req)
    }

    pub fn is_api(&self, req: &RequestMeta) -> bool {
        self.formats.iter().any(|d| d.matches(req))
    }

    pub fn classify(&self, req: &RequestMeta) -> ClassificationResult {
        let result = ClassificationResult {
            is_json: self.is_json(req),
            is_api: self.is_api(req),
        };

        tracing::debug!(
            path = %req.path(),
            extension = ?req.extension(),
            is_json = result.is_json,
            is_api = result.is_api,
            "Request classified"
        );

        result
    }
}
