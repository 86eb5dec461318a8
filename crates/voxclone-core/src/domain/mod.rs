//! Domain types for a voice-cloning session.
//!
//! Everything here is plain data plus the invariants that belong to a single
//! entity. Cross-entity rules (mutual exclusion, the busy flag, supersession)
//! live in [`crate::session`].

mod audio;
mod catalog;
mod generation;
mod lease;
mod reference;

pub use audio::{AudioBlob, AudioFormat};
pub use catalog::{CatalogVoice, VoiceCatalog, VoiceKind, VoiceListing, VoiceRecordId};
pub use generation::{GenerationJob, GenerationRequest, GenerationSource, JobStatus, SourceKind};
pub use lease::{LeaseCounter, LeaseId};
pub use reference::{ReferenceSession, ReferenceStage, ReferenceUpload};
