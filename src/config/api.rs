//! API negotiation settings (`[api]` section).

use {
    crate::{Error, Result},
    serde::Deserialize,
    url::Url,
};

/// Configuration of the API negotiation layer.
///
/// ```toml
/// [api]
/// base_url = "https://api.example.com"
/// debug = false
/// allow_jsonp = false
/// show_pagination_links = true
/// error_controller = "ErrorController"
/// public_actions = ["index", "view"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base used to make redirect targets absolute. When unset, the scheme and
    /// `Host` header of the current request are used instead.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Global debug flag. When on, API responses get the JSON formatting helper.
    #[serde(default)]
    pub debug: bool,

    /// Initial value of the `allowJsonp` view variable.
    #[serde(default)]
    pub allow_jsonp: bool,

    /// Value of the `showPaginationLinks` view variable. Unset means `true`.
    #[serde(default)]
    pub show_pagination_links: Option<bool>,

    /// Identity of the controller the host dispatches to when normal dispatch
    /// fails. Rendering from it selects the error layout.
    #[serde(default = "ApiConfig::default_error_controller")]
    pub error_controller: String,

    /// Actions exempt from authentication, used to seed each request's
    /// public-action registry when the controller does not supply its own.
    #[serde(default)]
    pub public_actions: Vec<String>,
}

impl ApiConfig {
    fn default_error_controller() -> String {
        "ErrorController".into()
    }

    pub fn show_pagination_links(&self) -> bool {
        self.show_pagination_links.unwrap_or(true)
    }

    fn configured_base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Parsed `base_url`, if configured and valid. A blank value (e.g. an
    /// unset `{{ VAR }}`) counts as unset.
    pub fn base_url(&self) -> Option<Url> {
        self.configured_base_url().and_then(|u| Url::parse(u).ok())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = self.configured_base_url() {
            let url = Url::parse(base_url)?;
            if url.cannot_be_a_base() {
                return Err(Error::invalid_input(format!(
                    "api.base_url must be an absolute http(s) URL, got '{base_url}'"
                )));
            }
        }

        if self.error_controller.trim().is_empty() {
            return Err(Error::config(
                "api.error_controller must not be empty. The default is \"ErrorController\".",
            ));
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: None,
            debug: false,
            allow_jsonp: false,
            show_pagination_links: None,
            error_controller: Self::default_error_controller(),
            public_actions: Vec::new(),
        }
    }
}
