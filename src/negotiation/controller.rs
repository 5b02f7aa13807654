//! The host-side render state the lifecycle hooks operate on.
//!
//! A [`Controller`] stands for the action currently handling a request: its
//! identity, the request metadata, the response head being built and the view
//! state (view class, layout, helpers, template variables). The hooks of the
//! [`LifecycleCoordinator`](crate::LifecycleCoordinator) mutate it; converting
//! it into an axum [`Response`] is the render pipeline.

use {
    super::RequestMeta,
    axum::{
        body::Body,
        response::{IntoResponse, Response},
    },
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    serde_json::{Map, Value},
};

/// View class hosts render with unless told otherwise.
pub const DEFAULT_VIEW_CLASS: &str = "View";

/// Maps a short content type name to its media type.
pub fn media_type_for(kind: &str) -> &str {
    match kind {
        "json" => "application/json",
        "html" => "text/html; charset=utf-8",
        "text" => "text/plain; charset=utf-8",
        other if other.contains('/') => other,
        _ => "application/octet-stream",
    }
}

/// Status, headers and the sent flag of the response under construction.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    status: StatusCode,
    headers: HeaderMap,
    sent: bool,
}

impl Default for ResponseHead {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            sent: false,
        }
    }
}

impl ResponseHead {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Sets a header, replacing earlier values. Values that are not valid
    /// header text are dropped with a warning.
    pub fn set_header(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(err) => {
                tracing::warn!(header = %name, error = %err, "Dropping invalid header value");
            }
        }
    }

    /// Sets the content type from a short name (`json`, `html`) or a media type.
    pub fn set_type(&mut self, kind: &str) {
        self.set_header(header::CONTENT_TYPE, media_type_for(kind));
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE)
    }

    /// Marks the response as sent. Nothing may be rendered afterwards.
    pub fn send(&mut self) {
        self.sent = true;
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }
}

/// View class, view, layout, helpers and template variables.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view_class: String,
    pub view: Option<String>,
    pub layout: Option<String>,
    pub layout_path: Option<String>,
    pub helpers: Vec<String>,
    pub vars: Map<String, Value>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_class: DEFAULT_VIEW_CLASS.into(),
            view: None,
            layout: Some("default".into()),
            layout_path: None,
            helpers: Vec::new(),
            vars: Map::new(),
        }
    }
}

/// The action currently handling a request.
#[derive(Debug, Clone)]
pub struct Controller {
    name: String,
    request: RequestMeta,
    pub response: ResponseHead,
    pub view: ViewState,
    public_actions: Option<Vec<String>>,
    template_output: Option<String>,
    rendered: Option<String>,
}

impl Controller {
    pub fn new(name: impl Into<String>, request: RequestMeta) -> Self {
        Self {
            name: name.into(),
            request,
            response: ResponseHead::default(),
            view: ViewState::default(),
            public_actions: None,
            template_output: None,
            rendered: None,
        }
    }

    /// Public actions this controller declares; seeds the registry of API requests.
    #[must_use]
    pub fn with_public_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    /// Identity compared against the configured error controller.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &RequestMeta {
        &self.request
    }

    pub fn public_actions(&self) -> Option<&[String]> {
        self.public_actions.as_deref()
    }

    /// Binds a template variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.view.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.view.vars.get(key)
    }

    /// Output of the host's own template engine, used by non-API view classes.
    pub fn set_template_output(&mut self, output: impl Into<String>) {
        self.template_output = Some(output.into());
    }

    /// Whether this controller renders with the API view class.
    pub fn renders_api(&self) -> bool {
        self.view.view_class == super::API_VIEW_CLASS
    }

    /// Renders the body now. The API view serializes the template variables;
    /// any other view class uses the host's template output.
    pub fn render(&mut self) {
        if self.response.is_sent() {
            tracing::debug!(controller = %self.name, "Response already sent, skipping render");
            return;
        }

        let body = if self.renders_api() {
            if self.response.content_type().is_none() {
                self.response.set_type("json");
            }
            Value::Object(self.view.vars.clone()).to_string()
        } else {
            if self.response.content_type().is_none() {
                self.response.set_type("html");
            }
            self.template_output.clone().unwrap_or_default()
        };
        self.rendered = Some(body);
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.is_some()
    }
}

impl IntoResponse for Controller {
    fn into_response(mut self) -> Response {
        if self.rendered.is_none() && !self.response.is_sent() {
            self.render();
        }
        let body = self.rendered.take().unwrap_or_default();

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = self.response.status;
        *response.headers_mut() = self.response.headers;
        response
    }
}
