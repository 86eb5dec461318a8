#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod session;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AudioBlob, AudioFormat, CatalogVoice, GenerationJob, GenerationSource, JobStatus, LeaseId,
    ReferenceSession, ReferenceUpload, SourceKind, VoiceCatalog, VoiceKind, VoiceListing,
    VoiceRecordId,
};
pub use error::{Operation, SessionError};
pub use events::SessionEvent;
pub use ports::{
    AudioConstraints, BackendPortError, BackendResult, CaptureError, CaptureHandle,
    CaptureSourcePort, ChannelEmitter, CloneBackendPort, GeneratedArtifact, NoopEmitter,
    ReferenceGenerationRequest, SessionEventEmitter, UnavailableCapture, UploadReferenceRequest,
    VoiceGenerationRequest,
};
pub use session::{Outcome, SessionDeps, SessionOrchestrator, SessionSnapshot, SessionState};
pub use settings::{
    DEFAULT_MAX_REFERENCE_BYTES, DEFAULT_VOICE_NAME, SessionSettings, SettingsError,
    validate_settings,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tokio_test as _;
