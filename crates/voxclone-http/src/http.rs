//! HTTP backend abstraction for the inference API.
//!
//! The client is generic over [`HttpBackend`] so the port implementation can
//! be tested against canned responses. The production backend is reqwest.
//! Requests are sent once; there is no retry.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{HttpError, HttpResult};
use crate::models::{BackendConfig, ErrorBody};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// A file plus form fields for a multipart POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    pub file_field: &'static str,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    pub fields: Vec<(&'static str, String)>,
}

/// The verbs the backend API needs.
///
/// Implementation detail; external code goes through `CloneBackendPort`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> HttpResult<T>;

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &B,
    ) -> HttpResult<T>;

    async fn post_multipart<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        upload: MultipartUpload,
    ) -> HttpResult<T>;

    async fn delete(&self, url: &Url) -> HttpResult<()>;

    async fn get_bytes(&self, url: &Url) -> HttpResult<Vec<u8>>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

pub struct ReqwestBackend {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    pub fn new(config: &BackendConfig) -> HttpResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            auth_token: config.token.clone(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        url: &Url,
        request: reqwest::RequestBuilder,
    ) -> HttpResult<reqwest::Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "Backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(HttpError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message: error_message(&body),
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> HttpResult<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// The `error` field of a JSON error body, if the body is one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> HttpResult<T> {
        let response = self.send(url, self.client.get(url.as_str())).await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &B,
    ) -> HttpResult<T> {
        let request = self.client.post(url.as_str()).json(body);
        let response = self.send(url, request).await?;
        Self::decode(response).await
    }

    async fn post_multipart<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        upload: MultipartUpload,
    ) -> HttpResult<T> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime_type)?;
        let form = upload
            .fields
            .into_iter()
            .fold(
                reqwest::multipart::Form::new().part(upload.file_field, part),
                |form, (name, value)| form.text(name, value),
            );
        let request = self.client.post(url.as_str()).multipart(form);
        let response = self.send(url, request).await?;
        Self::decode(response).await
    }

    async fn delete(&self, url: &Url) -> HttpResult<()> {
        self.send(url, self.client.delete(url.as_str())).await?;
        Ok(())
    }

    async fn get_bytes(&self, url: &Url) -> HttpResult<Vec<u8>> {
        let response = self.send(url, self.client.get(url.as_str())).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
