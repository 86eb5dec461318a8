//! Backend client for the voice-cloning inference API.

use crate::config::BackendClientConfig;
use crate::error::HttpError;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::BackendConfig;
use crate::url::parse_base_url;

/// Production client using the reqwest HTTP backend.
pub type DefaultBackendClient = BackendClient<ReqwestBackend>;

/// Client for the inference backend.
///
/// Generic over the HTTP backend so the port implementation can be tested
/// against canned responses. Use [`DefaultBackendClient`] outside tests.
pub struct BackendClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: BackendConfig,
}

impl DefaultBackendClient {
    /// Build a client, validating the base URL up front.
    pub fn new(config: &BackendClientConfig) -> Result<Self, HttpError> {
        let internal = BackendConfig {
            base_url: parse_base_url(&config.base_url)?,
            token: config.token.clone(),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        };
        let backend = ReqwestBackend::new(&internal)?;
        Ok(Self {
            backend,
            config: internal,
        })
    }

    /// The base URL requests are joined against.
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }
}

impl<B: HttpBackend> BackendClient<B> {
    #[cfg(test)]
    pub(crate) const fn with_backend(config: BackendConfig, backend: B) -> Self {
        Self { backend, config }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_default_client_creation() {
        let client = DefaultBackendClient::new(&BackendClientConfig::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/");
        assert_eq!(client.config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = BackendClientConfig::new().with_base_url("localhost 5000");
        assert!(matches!(
            DefaultBackendClient::new(&config),
            Err(HttpError::InvalidUrl(_))
        ));
    }
}
