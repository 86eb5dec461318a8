//! Port for the remote voice-cloning backend.
//!
//! The backend ingests references, transcribes them, synthesizes speech and
//! owns the voice catalog. The core only sees the request/response contract;
//! `voxclone-http` provides the concrete client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AudioBlob, ReferenceUpload, VoiceListing, VoiceRecordId};

/// Errors from backend port operations.
///
/// Adapter errors (HTTP status codes, JSON decoding) are mapped to these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendPortError {
    /// The backend answered with a non-success status.
    #[error("Backend rejected the request (status {status}){}", detail_suffix(.message))]
    Rejected {
        status: u16,
        /// The `error` field of the response body, when present.
        message: Option<String>,
    },

    /// The requested resource does not exist.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Connectivity failure; no response was received.
    #[error("Network error: {message}")]
    Network { message: String },

    /// A response arrived but could not be understood.
    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },
}

impl BackendPortError {
    /// Message supplied by the backend itself, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Best reason to show a user: the backend's own text, or a description
    /// of what went wrong on the way.
    pub fn reason(&self) -> String {
        self.backend_message()
            .map_or_else(|| self.to_string(), ToString::to_string)
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Result type alias for backend port operations.
pub type BackendResult<T> = Result<T, BackendPortError>;

/// Multipart upload of a reference clip.
#[derive(Debug, Clone)]
pub struct UploadReferenceRequest {
    pub audio: AudioBlob,
    pub voice_name: String,
}

/// Speech synthesis against an uploaded reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGenerationRequest {
    pub input_text: String,
    pub ref_audio_path: String,
    pub ref_text_path: String,
}

/// Speech synthesis with a catalog voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceGenerationRequest {
    pub voice_name: String,
    pub input_text: String,
}

/// Where the backend left a synthesized clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub output_path: String,
}

/// Remote backend operations.
#[async_trait]
pub trait CloneBackendPort: Send + Sync {
    /// Upload and transcribe a reference clip.
    async fn upload_reference(&self, request: UploadReferenceRequest)
    -> BackendResult<ReferenceUpload>;

    async fn generate_with_reference(
        &self,
        request: &ReferenceGenerationRequest,
    ) -> BackendResult<GeneratedArtifact>;

    async fn generate_with_voice(
        &self,
        request: &VoiceGenerationRequest,
    ) -> BackendResult<GeneratedArtifact>;

    /// Fetch the whole catalog.
    async fn list_voices(&self) -> BackendResult<VoiceListing>;

    async fn delete_voice(&self, id: VoiceRecordId) -> BackendResult<()>;

    /// Public URL of an artifact. `cache_token` defeats caching of earlier
    /// clips that reused the same output path.
    fn artifact_url(&self, output_path: &str, cache_token: i64) -> String;

    /// Fetch the bytes behind an artifact URL.
    async fn download_artifact(&self, audio_url: &str) -> BackendResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_prefers_backend_text() {
        let err = BackendPortError::Rejected {
            status: 500,
            message: Some("Audio processing failed".to_string()),
        };
        assert_eq!(err.reason(), "Audio processing failed");
        assert_eq!(
            err.to_string(),
            "Backend rejected the request (status 500): Audio processing failed"
        );
    }

    #[test]
    fn reason_falls_back_to_description() {
        let err = BackendPortError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.reason(), "Network error: connection refused");

        let err = BackendPortError::Rejected {
            status: 502,
            message: None,
        };
        assert_eq!(err.reason(), "Backend rejected the request (status 502)");
    }
}
