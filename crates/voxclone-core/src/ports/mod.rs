//! Port definitions (trait abstractions) for external systems.
//!
//! Ports are expressed in domain types only. Adapters live in other crates
//! (`voxclone-http` for the backend, hosts for capture and events).
//!
//! # Design Rules
//!
//! - No `reqwest`, `clap` or audio-library types in signatures
//! - Traits are `Send + Sync` so they can sit behind `Arc<dyn _>`
//! - Adapter failures are mapped into port errors before they cross here

pub mod backend;
pub mod capture;
pub mod event_emitter;

pub use backend::{
    BackendPortError, BackendResult, CloneBackendPort, GeneratedArtifact,
    ReferenceGenerationRequest, UploadReferenceRequest, VoiceGenerationRequest,
};
pub use capture::{
    AudioConstraints, CaptureError, CaptureHandle, CaptureSourcePort, UnavailableCapture,
};
pub use event_emitter::{ChannelEmitter, NoopEmitter, SessionEventEmitter};
