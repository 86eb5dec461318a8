//! Public configuration for the backend client.

use std::time::Duration;

/// Where the inference backend listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Configuration for [`crate::DefaultBackendClient`].
///
/// # Example
///
/// ```
/// use voxclone_http::BackendClientConfig;
/// use std::time::Duration;
///
/// let config = BackendClientConfig::new()
///     .with_base_url("http://gpu-box:5000")
///     .with_timeout(Duration::from_secs(300));
/// ```
#[derive(Debug, Clone)]
pub struct BackendClientConfig {
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    /// Synthesis of long texts can take minutes.
    pub(crate) timeout: Duration,
    pub(crate) token: Option<String>,
}

impl Default for BackendClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("voxclone-http/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(300),
            token: None,
        }
    }
}

impl BackendClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base address. Defaults to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout. Defaults to 5 minutes.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}
