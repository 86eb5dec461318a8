//! One voice reference in flight: upload, transcript, confirmation.

use serde::{Deserialize, Serialize};

use super::generation::GenerationSource;
use super::lease::LeaseId;
use crate::error::SessionError;

/// What the backend returns once a reference has been ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceUpload {
    pub reference_id: String,
    pub transcript: String,
    pub audio_path: String,
    pub text_path: String,
    /// Name the backend stored the voice under, when it echoes one.
    pub voice_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceStage {
    /// The blob has been handed to the backend; no reply yet.
    Uploading,
    /// Backend accepted the blob and transcribed it.
    Ready(ReferenceUpload),
}

/// The active reference of a session.
///
/// `submitted` implies `Ready`: [`submit`](Self::submit) refuses otherwise.
#[derive(Debug, Clone)]
pub struct ReferenceSession {
    lease: LeaseId,
    display_name: String,
    stage: ReferenceStage,
    submitted: bool,
}

impl ReferenceSession {
    /// A pending session whose audio is on its way to the backend.
    pub fn create(lease: LeaseId, display_name: impl Into<String>) -> Self {
        Self {
            lease,
            display_name: display_name.into(),
            stage: ReferenceStage::Uploading,
            submitted: false,
        }
    }

    pub const fn lease(&self) -> LeaseId {
        self.lease
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub const fn stage(&self) -> &ReferenceStage {
        &self.stage
    }

    /// Record the backend's reply.
    pub fn populate(&mut self, upload: ReferenceUpload) {
        self.stage = ReferenceStage::Ready(upload);
    }

    pub const fn upload(&self) -> Option<&ReferenceUpload> {
        match &self.stage {
            ReferenceStage::Ready(upload) => Some(upload),
            ReferenceStage::Uploading => None,
        }
    }

    pub const fn is_uploading(&self) -> bool {
        matches!(self.stage, ReferenceStage::Uploading)
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.upload().map(|u| u.reference_id.as_str())
    }

    pub fn transcript(&self) -> Option<&str> {
        self.upload().map(|u| u.transcript.as_str())
    }

    /// Confirm the reference for generation.
    ///
    /// Returns `Ok(true)` on the first confirmation, `Ok(false)` when it was
    /// already submitted.
    pub fn submit(&mut self) -> Result<bool, SessionError> {
        if self.upload().is_none() {
            return Err(SessionError::NotReady(
                "reference has not been uploaded yet".to_string(),
            ));
        }
        if self.submitted {
            return Ok(false);
        }
        self.submitted = true;
        Ok(true)
    }

    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Binding for a reference-bound generation, once submitted.
    pub fn generation_source(&self) -> Option<GenerationSource> {
        if !self.submitted {
            return None;
        }
        self.upload().map(|u| GenerationSource::ReferenceBound {
            reference_id: u.reference_id.clone(),
            audio_path: u.audio_path.clone(),
            text_path: u.text_path.clone(),
        })
    }
}
