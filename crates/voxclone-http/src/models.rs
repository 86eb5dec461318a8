//! Internal configuration and wire types for the backend API.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use url::Url;
use voxclone_core::{
    BackendPortError, CatalogVoice, GeneratedArtifact, ReferenceUpload, VoiceKind, VoiceListing,
    VoiceRecordId,
};

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Always ends with `/` so relative joins keep any path prefix.
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Identifier that the backend may send as a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// `POST /upload_reference` reply.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub transcript: Option<String>,
    pub audio_path: Option<String>,
    pub text_path: Option<String>,
    pub ref_id: Option<WireId>,
    /// Older backends name the reference id `voice_id`.
    pub voice_id: Option<WireId>,
    pub voice_name: Option<String>,
}

impl UploadResponse {
    pub fn into_reference(self) -> Result<ReferenceUpload, BackendPortError> {
        let missing = |field: &str| BackendPortError::InvalidResponse {
            message: format!("upload reply is missing '{field}'"),
        };
        Ok(ReferenceUpload {
            reference_id: self
                .ref_id
                .or(self.voice_id)
                .ok_or_else(|| missing("ref_id"))?
                .to_string(),
            transcript: self.transcript.unwrap_or_default(),
            audio_path: self.audio_path.ok_or_else(|| missing("audio_path"))?,
            text_path: self.text_path.ok_or_else(|| missing("text_path"))?,
            voice_name: self.voice_name,
        })
    }
}

/// `POST /generate_speech*` reply.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub output_path: Option<String>,
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn into_artifact(self) -> Result<GeneratedArtifact, BackendPortError> {
        match (self.output_path, self.error) {
            (Some(output_path), _) if !output_path.is_empty() => {
                Ok(GeneratedArtifact { output_path })
            }
            (_, Some(message)) => Err(BackendPortError::Rejected {
                status: 200,
                message: Some(message),
            }),
            _ => Err(BackendPortError::InvalidResponse {
                message: "generation reply has no output_path".to_string(),
            }),
        }
    }
}

/// One voice as listed by `GET /get_voices`.
#[derive(Debug, Deserialize)]
pub struct VoiceRecord {
    pub id: i64,
    pub name: String,
    pub audio_path: Option<String>,
    pub voice_id: Option<String>,
    #[serde(default = "default_true")]
    pub audio_exists: bool,
    pub created_at: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl VoiceRecord {
    /// The list a record arrived in decides its kind.
    pub fn into_catalog_voice(self, kind: VoiceKind) -> CatalogVoice {
        CatalogVoice {
            id: VoiceRecordId::new(self.id),
            name: self.name,
            kind,
            voice_id: self.voice_id.filter(|v| !v.is_empty()),
            audio_exists: self.audio_exists,
            audio_path: self.audio_path,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// `GET /get_voices` reply.
#[derive(Debug, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub predefined_voices: Vec<VoiceRecord>,
    #[serde(default)]
    pub custom_voices: Vec<VoiceRecord>,
}

impl VoicesResponse {
    pub fn into_listing(self) -> VoiceListing {
        VoiceListing::new(
            self.predefined_voices
                .into_iter()
                .map(|v| v.into_catalog_voice(VoiceKind::Predefined))
                .collect(),
            self.custom_voices
                .into_iter()
                .map(|v| v.into_catalog_voice(VoiceKind::Custom))
                .collect(),
        )
    }
}

/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form SQLite produces.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
