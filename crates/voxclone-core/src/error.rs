//! User-facing error taxonomy for session operations.
//!
//! Port errors (`BackendPortError`, `CaptureError`) are mapped into these
//! variants at the orchestrator boundary. Every variant is terminal for the
//! single operation that raised it; none of them is fatal to the session.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operations the session can run or reject.
///
/// `Capture`, `Upload` and `Generation` are the heavy operations guarded by
/// the busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Capture,
    Upload,
    Generation,
    Selection,
    Refresh,
    Delete,
}

impl Operation {
    /// Whether this operation holds the busy flag while outstanding.
    pub const fn is_heavy(self) -> bool {
        matches!(self, Self::Capture | Self::Upload | Self::Generation)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Upload => "upload",
            Self::Generation => "generation",
            Self::Selection => "selection",
            Self::Refresh => "refresh",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced to the user by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Microphone missing or permission denied. Not retried.
    #[error("Error accessing microphone: {0}")]
    DeviceUnavailable(String),

    /// The picked file is not an accepted audio container.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Reference upload or transcription failed.
    #[error("Error uploading reference: {0}")]
    Upload(String),

    /// Voice deletion failed; the catalog is unchanged.
    #[error("Error deleting voice: {0}")]
    Delete(String),

    /// Speech generation failed.
    #[error("Error generating speech: {0}")]
    Generation(String),

    /// A precondition of the operation does not hold yet.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Transport-level failure outside the operation-specific variants.
    #[error("Network error: {0}")]
    Network(String),

    /// A heavy operation is outstanding; the request was rejected.
    #[error("Cannot start {requested} while {active} is in progress")]
    Busy {
        /// The operation that was rejected.
        requested: Operation,
        /// The operation currently holding the busy flag.
        active: Operation,
    },
}

impl SessionError {
    /// Short machine-readable category, stable across message changes.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DeviceUnavailable(_) => "device_unavailable",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Upload(_) => "upload_error",
            Self::Delete(_) => "delete_error",
            Self::Generation(_) => "generation_error",
            Self::NotReady(_) => "not_ready",
            Self::Network(_) => "network_error",
            Self::Busy { .. } => "busy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavy_operations() {
        assert!(Operation::Capture.is_heavy());
        assert!(Operation::Upload.is_heavy());
        assert!(Operation::Generation.is_heavy());
        assert!(!Operation::Selection.is_heavy());
        assert!(!Operation::Refresh.is_heavy());
        assert!(!Operation::Delete.is_heavy());
    }

    #[test]
    fn busy_message_names_both_operations() {
        let err = SessionError::Busy {
            requested: Operation::Capture,
            active: Operation::Generation,
        };
        let msg = err.to_string();
        assert!(msg.contains("capture"));
        assert!(msg.contains("generation"));
        assert_eq!(err.kind(), "busy");
    }

    #[test]
    fn upload_message_keeps_reason() {
        let err = SessionError::Upload("Audio processing failed: bad header".to_string());
        assert_eq!(
            err.to_string(),
            "Error uploading reference: Audio processing failed: bad header"
        );
    }
}
