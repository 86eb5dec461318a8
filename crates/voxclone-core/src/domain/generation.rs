//! Text-to-speech jobs and what they are bound to.

use serde::{Deserialize, Serialize};

use super::catalog::VoiceRecordId;
use super::lease::LeaseId;
use crate::error::SessionError;
use crate::ports::{ReferenceGenerationRequest, VoiceGenerationRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    ReferenceBound,
    VoiceBound,
}

/// What a generation speaks with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationSource {
    /// A submitted reference uploaded in this session.
    ReferenceBound {
        reference_id: String,
        audio_path: String,
        text_path: String,
    },
    /// A voice from the catalog.
    VoiceBound {
        voice: VoiceRecordId,
        voice_name: String,
    },
}

impl GenerationSource {
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::ReferenceBound { .. } => SourceKind::ReferenceBound,
            Self::VoiceBound { .. } => SourceKind::VoiceBound,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Succeeded {
        audio_url: String,
    },
    Failed {
        message: String,
    },
}

impl JobStatus {
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }
}

/// The request a job issues to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Reference(ReferenceGenerationRequest),
    Voice(VoiceGenerationRequest),
}

/// One generation request and its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    lease: LeaseId,
    source: GenerationSource,
    input_text: String,
    status: JobStatus,
}

impl GenerationJob {
    pub fn new(lease: LeaseId, source: GenerationSource, input_text: impl Into<String>) -> Self {
        Self {
            lease,
            source,
            input_text: input_text.into(),
            status: JobStatus::Idle,
        }
    }

    pub const fn lease(&self) -> LeaseId {
        self.lease
    }

    pub const fn source(&self) -> &GenerationSource {
        &self.source
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub const fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Move to `Running`. Whitespace-only text is treated as empty.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.input_text.trim().is_empty() {
            return Err(SessionError::NotReady("input text is empty".to_string()));
        }
        if self.status.is_running() {
            return Err(SessionError::NotReady("job is already running".to_string()));
        }
        self.status = JobStatus::Running;
        Ok(())
    }

    pub fn succeed(&mut self, audio_url: impl Into<String>) {
        self.status = JobStatus::Succeeded {
            audio_url: audio_url.into(),
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Failed {
            message: message.into(),
        };
    }

    /// Backend request for this job's binding.
    pub fn request(&self) -> GenerationRequest {
        match &self.source {
            GenerationSource::ReferenceBound {
                audio_path,
                text_path,
                ..
            } => GenerationRequest::Reference(ReferenceGenerationRequest {
                input_text: self.input_text.clone(),
                ref_audio_path: audio_path.clone(),
                ref_text_path: text_path.clone(),
            }),
            GenerationSource::VoiceBound { voice_name, .. } => {
                GenerationRequest::Voice(VoiceGenerationRequest {
                    voice_name: voice_name.clone(),
                    input_text: self.input_text.clone(),
                })
            }
        }
    }
}
