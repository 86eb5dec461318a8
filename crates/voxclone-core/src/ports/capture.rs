//! Port for audio capture: microphone recording or a local file picker.
//!
//! Implementations yield one [`AudioBlob`] per invocation. The session
//! enforces the busy flag; implementations do not need to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AudioBlob, AudioFormat};
use crate::error::SessionError;
use crate::settings::DEFAULT_MAX_REFERENCE_BYTES;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No microphone, or permission denied.
    #[error("{0}")]
    DeviceUnavailable(String),

    /// The picked file is not an accepted audio container.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// The device was opened but recording failed.
    #[error("capture failed: {0}")]
    Failed(String),
}

impl From<CaptureError> for SessionError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::DeviceUnavailable(msg) | CaptureError::Failed(msg) => {
                Self::DeviceUnavailable(msg)
            }
            CaptureError::UnsupportedFormat(msg) => Self::UnsupportedFormat(msg),
        }
    }
}

/// Identifies a running capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureHandle(pub u64);

/// What a picked or recorded blob must satisfy before it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConstraints {
    pub accepted: Vec<AudioFormat>,
    pub max_bytes: u64,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            accepted: vec![AudioFormat::Wav, AudioFormat::Mp3],
            max_bytes: DEFAULT_MAX_REFERENCE_BYTES,
        }
    }
}

impl AudioConstraints {
    /// Classify a picked file by its MIME type, falling back to its name.
    pub fn classify(&self, file_name: &str, mime: Option<&str>) -> Result<AudioFormat, CaptureError> {
        let format = mime
            .and_then(AudioFormat::from_mime)
            .or_else(|| AudioFormat::from_file_name(file_name))
            .ok_or_else(|| {
                CaptureError::UnsupportedFormat(format!(
                    "{file_name} is not a WAV or MP3 file"
                ))
            })?;
        self.accept(format)?;
        Ok(format)
    }

    /// Check an already-built blob.
    pub fn check(&self, blob: &AudioBlob) -> Result<(), CaptureError> {
        self.accept(blob.format())?;
        if blob.is_empty() {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} is empty",
                blob.file_name()
            )));
        }
        if blob.len() as u64 > self.max_bytes {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} is {} bytes, above the {} byte limit",
                blob.file_name(),
                blob.len(),
                self.max_bytes
            )));
        }
        Ok(())
    }

    fn accept(&self, format: AudioFormat) -> Result<(), CaptureError> {
        if self.accepted.contains(&format) {
            Ok(())
        } else {
            Err(CaptureError::UnsupportedFormat(format!(
                "{format} files are not accepted"
            )))
        }
    }
}

/// Audio capture operations.
#[async_trait]
pub trait CaptureSourcePort: Send + Sync {
    /// Open the microphone and start recording.
    async fn start_capture(&self) -> Result<CaptureHandle, CaptureError>;

    /// Stop recording. `None` when `handle` is not an active capture.
    async fn stop_capture(&self, handle: CaptureHandle) -> Result<Option<AudioBlob>, CaptureError>;

    /// Let the user pick an audio file. `None` when the picker is cancelled.
    async fn pick_file(&self, constraints: &AudioConstraints)
    -> Result<Option<AudioBlob>, CaptureError>;
}

/// Capture source for hosts without a microphone or a picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCapture;

#[async_trait]
impl CaptureSourcePort for UnavailableCapture {
    async fn start_capture(&self) -> Result<CaptureHandle, CaptureError> {
        Err(CaptureError::DeviceUnavailable(
            "no audio input device".to_string(),
        ))
    }

    async fn stop_capture(&self, _handle: CaptureHandle) -> Result<Option<AudioBlob>, CaptureError> {
        Ok(None)
    }

    async fn pick_file(
        &self,
        _constraints: &AudioConstraints,
    ) -> Result<Option<AudioBlob>, CaptureError> {
        Ok(None)
    }
}
