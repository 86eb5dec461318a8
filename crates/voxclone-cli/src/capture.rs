//! File-backed capture source.
//!
//! The CLI has no microphone; its "picker" is the path given on the command
//! line. Recording reports `DeviceUnavailable`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use voxclone_core::{
    AudioBlob, AudioConstraints, AudioFormat, CaptureError, CaptureHandle, CaptureSourcePort,
};

pub struct FileCaptureSource {
    path: Option<PathBuf>,
}

impl FileCaptureSource {
    /// A picker that yields `path`, or behaves as cancelled when `None`.
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

/// Read `path` and classify it by extension, then by content.
pub async fn read_audio_file(
    path: &Path,
    constraints: &AudioConstraints,
) -> Result<AudioBlob, CaptureError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("reference")
        .to_string();

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| CaptureError::Failed(format!("{}: {e}", path.display())))?;
    if metadata.len() > constraints.max_bytes {
        return Err(CaptureError::UnsupportedFormat(format!(
            "{file_name} is {} bytes, above the {} byte limit",
            metadata.len(),
            constraints.max_bytes
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CaptureError::Failed(format!("{}: {e}", path.display())))?;
    let format = match constraints.classify(&file_name, None) {
        Ok(format) => format,
        Err(err) => match AudioFormat::sniff(&bytes) {
            Some(format) if constraints.accepted.contains(&format) => format,
            _ => return Err(err),
        },
    };

    let blob = AudioBlob::new(bytes, file_name, format);
    constraints.check(&blob)?;
    debug!(file = blob.file_name(), bytes = blob.len(), %format, "Reference file read");
    Ok(blob)
}

#[async_trait]
impl CaptureSourcePort for FileCaptureSource {
    async fn start_capture(&self) -> Result<CaptureHandle, CaptureError> {
        Err(CaptureError::DeviceUnavailable(
            "microphone capture is not available from the command line".to_string(),
        ))
    }

    async fn stop_capture(&self, _handle: CaptureHandle) -> Result<Option<AudioBlob>, CaptureError> {
        Ok(None)
    }

    async fn pick_file(
        &self,
        constraints: &AudioConstraints,
    ) -> Result<Option<AudioBlob>, CaptureError> {
        match &self.path {
            Some(path) => read_audio_file(path, constraints).await.map(Some),
            None => Ok(None),
        }
    }
}
