//! `CloneBackendPort` implementation for `BackendClient`.
//!
//! Converts between the backend's wire format and core types, and maps the
//! internal `HttpError` into `BackendPortError`.

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;
use voxclone_core::{
    BackendPortError, BackendResult, CloneBackendPort, GeneratedArtifact,
    ReferenceGenerationRequest, ReferenceUpload, UploadReferenceRequest, VoiceGenerationRequest,
    VoiceListing, VoiceRecordId,
};

use crate::client::BackendClient;
use crate::error::HttpError;
use crate::http::{HttpBackend, MultipartUpload};
use crate::models::{GenerateResponse, UploadResponse, VoicesResponse};
use crate::url::{
    GENERATE_SPEECH, GENERATE_SPEECH_WITH_VOICE, GET_VOICES, UPLOAD_REFERENCE, artifact_url,
    delete_voice_url, endpoint,
};

// ============================================================================
// Error Mapping
// ============================================================================

/// A bare 404 means the path does not exist; one carrying an `{error}` body
/// is the backend refusing the request.
fn map_error(err: HttpError) -> BackendPortError {
    match err {
        HttpError::Status {
            status: 404,
            url,
            message: None,
        } => BackendPortError::NotFound { path: url },
        HttpError::Status {
            status, message, ..
        } => BackendPortError::Rejected { status, message },
        HttpError::Network(e) => BackendPortError::Network {
            message: e.to_string(),
        },
        HttpError::InvalidUrl(e) => BackendPortError::InvalidResponse {
            message: format!("invalid URL: {e}"),
        },
        HttpError::JsonParse(e) => BackendPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

impl<B: HttpBackend> BackendClient<B> {
    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        endpoint(&self.config.base_url, path).map_err(|e| map_error(e.into()))
    }
}

#[async_trait]
impl<B: HttpBackend> CloneBackendPort for BackendClient<B> {
    async fn upload_reference(
        &self,
        request: UploadReferenceRequest,
    ) -> BackendResult<ReferenceUpload> {
        let url = self.endpoint(UPLOAD_REFERENCE)?;
        let audio = request.audio;
        debug!(
            file = audio.file_name(),
            bytes = audio.len(),
            voice = %request.voice_name,
            "Uploading reference clip"
        );

        let upload = MultipartUpload {
            file_field: "audio",
            file_name: audio.file_name().to_string(),
            mime_type: audio.mime_type(),
            bytes: audio.into_bytes(),
            fields: vec![("voice_name", request.voice_name)],
        };
        let reply: UploadResponse = self
            .backend
            .post_multipart(&url, upload)
            .await
            .map_err(map_error)?;
        let reference = reply.into_reference()?;

        info!(reference_id = %reference.reference_id, "Reference transcribed");
        Ok(reference)
    }

    async fn generate_with_reference(
        &self,
        request: &ReferenceGenerationRequest,
    ) -> BackendResult<GeneratedArtifact> {
        let url = self.endpoint(GENERATE_SPEECH)?;
        debug!(chars = request.input_text.len(), "Generating with reference");
        let reply: GenerateResponse = self
            .backend
            .post_json(&url, request)
            .await
            .map_err(map_error)?;
        reply.into_artifact()
    }

    async fn generate_with_voice(
        &self,
        request: &VoiceGenerationRequest,
    ) -> BackendResult<GeneratedArtifact> {
        let url = self.endpoint(GENERATE_SPEECH_WITH_VOICE)?;
        debug!(
            voice = %request.voice_name,
            chars = request.input_text.len(),
            "Generating with catalog voice"
        );
        let reply: GenerateResponse = self
            .backend
            .post_json(&url, request)
            .await
            .map_err(map_error)?;
        reply.into_artifact()
    }

    async fn list_voices(&self) -> BackendResult<VoiceListing> {
        let url = self.endpoint(GET_VOICES)?;
        let reply: VoicesResponse = self.backend.get_json(&url).await.map_err(map_error)?;
        Ok(reply.into_listing())
    }

    async fn delete_voice(&self, id: VoiceRecordId) -> BackendResult<()> {
        let url = delete_voice_url(&self.config.base_url, id).map_err(|e| map_error(e.into()))?;
        self.backend.delete(&url).await.map_err(map_error)?;
        info!(voice_id = %id, "Voice deleted");
        Ok(())
    }

    fn artifact_url(&self, output_path: &str, cache_token: i64) -> String {
        artifact_url(&self.config.base_url, output_path, cache_token).map_or_else(
            |_| {
                format!(
                    "{}download/{output_path}?t={cache_token}",
                    self.config.base_url
                )
            },
            String::from,
        )
    }

    async fn download_artifact(&self, audio_url: &str) -> BackendResult<Vec<u8>> {
        let url = Url::parse(audio_url).map_err(|e| map_error(e.into()))?;
        let bytes = self.backend.get_bytes(&url).await.map_err(map_error)?;
        debug!(bytes = bytes.len(), "Artifact downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use voxclone_core::{AudioBlob, AudioFormat, VoiceKind};

    use super::*;
    use crate::http::testing::{Canned, FakeBackend, Recorded};
    use crate::models::BackendConfig;
    use crate::url::parse_base_url;

    fn test_config() -> BackendConfig {
        BackendConfig {
            base_url: parse_base_url("http://localhost:5000").unwrap(),
            token: None,
            timeout: Duration::from_secs(5),
            user_agent: "test".to_string(),
        }
    }

    fn client(backend: FakeBackend) -> BackendClient<FakeBackend> {
        BackendClient::with_backend(test_config(), backend)
    }

    #[tokio::test]
    async fn test_upload_reference_sends_multipart() {
        let backend = FakeBackend::new().with_response(
            UPLOAD_REFERENCE,
            Canned::Json(json!({
                "audio_path": "uploads/voice_3.wav",
                "text_path": "uploads/voice_3.txt",
                "transcript": "hello world",
                "voice_id": "r1",
                "voice_name": "Custom Voice"
            })),
        );
        let client = client(backend);

        let reference = client
            .upload_reference(UploadReferenceRequest {
                audio: AudioBlob::new(vec![1, 2, 3], "clip.mp3", AudioFormat::Mp3),
                voice_name: "Custom Voice".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reference.reference_id, "r1");
        assert_eq!(reference.transcript, "hello world");
        assert_eq!(reference.audio_path, "uploads/voice_3.wav");

        let recorded = client.backend.recorded();
        let Recorded::Multipart(url, upload) = &recorded[0] else {
            panic!("expected a multipart upload, got {recorded:?}");
        };
        assert_eq!(url, "http://localhost:5000/upload_reference");
        assert_eq!(upload.file_field, "audio");
        assert_eq!(upload.file_name, "clip.mp3");
        assert_eq!(upload.mime_type, "audio/mpeg");
        assert_eq!(upload.bytes, vec![1, 2, 3]);
        assert_eq!(
            upload.fields,
            vec![("voice_name", "Custom Voice".to_string())]
        );
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_backend_message() {
        let backend = FakeBackend::new().with_response(
            UPLOAD_REFERENCE,
            Canned::Status {
                status: 500,
                body: r#"{"error": "Whisper failed"}"#.to_string(),
            },
        );
        let err = client(backend)
            .upload_reference(UploadReferenceRequest {
                audio: AudioBlob::recorded_wav(vec![0; 4]),
                voice_name: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "Whisper failed");
    }

    #[tokio::test]
    async fn test_generate_with_reference_posts_paths() {
        let backend = FakeBackend::new().with_response(
            "generate_speech",
            Canned::Json(json!({"output_path": "output.mp3"})),
        );
        let client = client(backend);
        let request = ReferenceGenerationRequest {
            input_text: "Hi there".to_string(),
            ref_audio_path: "uploads/a.wav".to_string(),
            ref_text_path: "uploads/a.txt".to_string(),
        };

        let artifact = client.generate_with_reference(&request).await.unwrap();
        assert_eq!(artifact.output_path, "output.mp3");
        assert_eq!(
            client.backend.recorded(),
            vec![Recorded::PostJson(
                "http://localhost:5000/generate_speech".to_string(),
                json!({
                    "input_text": "Hi there",
                    "ref_audio_path": "uploads/a.wav",
                    "ref_text_path": "uploads/a.txt"
                })
            )]
        );
    }

    #[tokio::test]
    async fn test_generate_with_voice_rejection() {
        let backend = FakeBackend::new().with_response(
            GENERATE_SPEECH_WITH_VOICE,
            Canned::Status {
                status: 404,
                body: r#"{"error": "Voice not found"}"#.to_string(),
            },
        );
        let err = client(backend)
            .generate_with_voice(&VoiceGenerationRequest {
                voice_name: "Ghost".to_string(),
                input_text: "boo".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BackendPortError::Rejected {
                status: 404,
                message: Some("Voice not found".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_list_voices() {
        let backend = FakeBackend::new().with_response(
            GET_VOICES,
            Canned::Json(json!({
                "predefined_voices": [
                    {"id": 1, "name": "Narrator", "voice_id": "n1", "audio_exists": true}
                ],
                "custom_voices": [
                    {"id": 9, "name": "Mine", "audio_path": "uploads/voice_9.wav"}
                ]
            })),
        );
        let listing = client(backend).list_voices().await.unwrap();
        assert_eq!(listing.predefined.len(), 1);
        assert_eq!(listing.custom[0].kind, VoiceKind::Custom);
        assert!(listing.custom[0].audio_exists);
    }

    #[tokio::test]
    async fn test_list_voices_malformed_reply() {
        let backend = FakeBackend::new()
            .with_response(GET_VOICES, Canned::Json(json!({"custom_voices": "nope"})));
        let err = client(backend).list_voices().await.unwrap_err();
        assert!(matches!(err, BackendPortError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_delete_voice_forbidden() {
        let backend = FakeBackend::new().with_response(
            "delete_voice/1",
            Canned::Status {
                status: 403,
                body: r#"{"error": "Cannot delete predefined voices"}"#.to_string(),
            },
        );
        let client = client(backend);
        let err = client.delete_voice(VoiceRecordId::new(1)).await.unwrap_err();
        assert_eq!(err.reason(), "Cannot delete predefined voices");
        assert_eq!(
            client.backend.recorded(),
            vec![Recorded::Delete(
                "http://localhost:5000/delete_voice/1".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_delete_voice_success() {
        let backend =
            FakeBackend::new().with_response("delete_voice/7", Canned::Json(json!({"ok": true})));
        assert!(client(backend).delete_voice(VoiceRecordId::new(7)).await.is_ok());
    }

    #[tokio::test]
    async fn test_artifact_url_and_download() {
        let backend =
            FakeBackend::new().with_response("download/output.mp3", Canned::Bytes(vec![9, 9]));
        let client = client(backend);
        let url = client.artifact_url("output.mp3", 42);
        assert_eq!(url, "http://localhost:5000/download/output.mp3?t=42");
        assert_eq!(client.download_artifact(&url).await.unwrap(), vec![9, 9]);
    }

    #[tokio::test]
    async fn test_download_missing_artifact_is_not_found() {
        let err = client(FakeBackend::new())
            .download_artifact("http://localhost:5000/download/gone.mp3?t=1")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendPortError::NotFound { .. }));
    }

    #[test]
    fn test_map_error_json() {
        let err: HttpError = serde_json::from_str::<u8>("{").unwrap_err().into();
        assert!(matches!(
            map_error(err),
            BackendPortError::InvalidResponse { .. }
        ));
    }
}
