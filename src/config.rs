//! Client configuration.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via
//! its [`ClientConfigBuilder`]. The size thresholds used by routing are not
//! configurable: they mirror limits enforced by the service itself and live
//! as constants in [`crate::pipeline::route`].

use crate::error::EdudocError;
use crate::lifecycle::{LifecycleObserver, Observer};
use std::fmt;
use std::sync::Arc;

/// Default service location, matching the service's own default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for a [`crate::client::Client`].
///
/// # Example
/// ```rust
/// use edgequake_edudoc::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://pedagogico.example.org")
///     .request_timeout_secs(120)
///     .build()
///     .unwrap();
/// assert_eq!(config.request_timeout_secs, Some(120));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Service root; endpoint paths are appended to it. Default: `http://localhost:8000`.
    pub base_url: String,

    /// Per-request timeout in seconds. Default: `None`.
    ///
    /// With `None` the HTTP client's own behaviour applies and a slow
    /// operation (AI generation on a long text) is never cut short by this
    /// crate.
    pub request_timeout_secs: Option<u64>,

    /// `User-Agent` header value.
    pub user_agent: String,

    /// Receives busy/idle transitions for every operation.
    pub observer: Option<Observer>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            user_agent: concat!("edudoc/", env!("CARGO_PKG_VERSION")).to_string(),
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn LifecycleObserver>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, EdudocError> {
        let c = &self.config;
        let url = reqwest::Url::parse(&c.base_url).map_err(|e| EdudocError::InvalidBaseUrl {
            url: c.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(EdudocError::InvalidBaseUrl {
                url: c.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(EdudocError::InvalidBaseUrl {
                url: c.base_url.clone(),
                reason: "must not carry a query or fragment".into(),
            });
        }
        if c.request_timeout_secs == Some(0) {
            return Err(EdudocError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
