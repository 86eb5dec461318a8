//! Observable session transitions.
//!
//! Every state change the orchestrator applies is described by one
//! [`SessionEvent`]. Events are serialized with a `type` tag so hosts can
//! forward them over any JSON transport unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::{SourceKind, VoiceRecordId};
use crate::error::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The busy flag flipped.
    BusyChanged { busy: bool },

    CaptureStarted,

    /// A reference blob was handed to the backend.
    ReferenceUploading { display_name: String },

    ReferenceUploaded {
        reference_id: String,
        transcript: String,
    },

    ReferenceSubmitted { reference_id: String },

    /// The active reference was discarded.
    ReferenceCleared,

    CatalogRefreshed { predefined: usize, custom: usize },

    VoiceSelected { id: VoiceRecordId, name: String },

    SelectionCleared,

    VoiceDeleted { id: VoiceRecordId },

    GenerationStarted { source: SourceKind },

    GenerationSucceeded { audio_url: String },

    GenerationFailed { message: String },

    /// A non-generation operation failed; the message is user-facing.
    OperationFailed { operation: Operation, message: String },

    /// A completion arrived for superseded work and was dropped.
    StaleCompletionDiscarded { operation: Operation, lease: u64 },
}

impl SessionEvent {
    /// Short name for log lines.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BusyChanged { .. } => "busy_changed",
            Self::CaptureStarted => "capture_started",
            Self::ReferenceUploading { .. } => "reference_uploading",
            Self::ReferenceUploaded { .. } => "reference_uploaded",
            Self::ReferenceSubmitted { .. } => "reference_submitted",
            Self::ReferenceCleared => "reference_cleared",
            Self::CatalogRefreshed { .. } => "catalog_refreshed",
            Self::VoiceSelected { .. } => "voice_selected",
            Self::SelectionCleared => "selection_cleared",
            Self::VoiceDeleted { .. } => "voice_deleted",
            Self::GenerationStarted { .. } => "generation_started",
            Self::GenerationSucceeded { .. } => "generation_succeeded",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::OperationFailed { .. } => "operation_failed",
            Self::StaleCompletionDiscarded { .. } => "stale_completion_discarded",
        }
    }
}
