//! Async driver over [`SessionState`] and the ports.
//!
//! Each entry point follows the same shape: lock, run a `begin_*`
//! transition, unlock, await the port, lock, run the matching `complete_*`
//! transition, unlock, emit queued events. The lock is never held across a
//! port call, so a slow upload never blocks a catalog refresh.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::state::{Outcome, SessionSnapshot, SessionState, UploadTicket};
use crate::domain::{
    AudioBlob, CatalogVoice, GenerationRequest, ReferenceUpload, VoiceCatalog, VoiceRecordId,
};
use crate::error::SessionError;
#[cfg(test)]
use crate::error::Operation;
use crate::ports::{CaptureSourcePort, CloneBackendPort, SessionEventEmitter};
use crate::settings::SessionSettings;

/// Collaborators injected into a [`SessionOrchestrator`].
#[derive(Clone)]
pub struct SessionDeps {
    pub backend: Arc<dyn CloneBackendPort>,
    pub capture: Arc<dyn CaptureSourcePort>,
    pub emitter: Arc<dyn SessionEventEmitter>,
}

impl SessionDeps {
    pub fn new(
        backend: Arc<dyn CloneBackendPort>,
        capture: Arc<dyn CaptureSourcePort>,
        emitter: Arc<dyn SessionEventEmitter>,
    ) -> Self {
        Self {
            backend,
            capture,
            emitter,
        }
    }
}

/// Top-level controller for one voice-cloning session.
pub struct SessionOrchestrator {
    state: Mutex<SessionState>,
    backend: Arc<dyn CloneBackendPort>,
    capture: Arc<dyn CaptureSourcePort>,
    emitter: Arc<dyn SessionEventEmitter>,
}

impl SessionOrchestrator {
    pub fn new(deps: SessionDeps, settings: SessionSettings) -> Self {
        Self {
            state: Mutex::new(SessionState::new(settings)),
            backend: deps.backend,
            capture: deps.capture,
            emitter: deps.emitter,
        }
    }

    /// Run `f` under the state lock, then emit whatever it queued.
    async fn apply<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let (result, events) = {
            let mut state = self.state.lock().await;
            let result = f(&mut state);
            (result, state.drain_events())
        };
        for event in events {
            self.emitter.emit(event);
        }
        result
    }

    /// Load the catalog. A failure is logged and leaves the catalog empty.
    pub async fn initialize(&self) {
        if self.refresh_catalog().await.is_ok() {
            debug!("Session initialized");
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Copy of the last-known catalog.
    pub async fn catalog(&self) -> VoiceCatalog {
        self.state.lock().await.catalog().clone()
    }

    pub async fn settings(&self) -> SessionSettings {
        self.state.lock().await.settings().clone()
    }

    // ── Capture and upload ─────────────────────────────────────────

    /// Start recording from the microphone.
    pub async fn begin_capture(&self) -> Result<(), SessionError> {
        self.apply(SessionState::begin_capture).await?;
        match self.capture.start_capture().await {
            Ok(handle) => {
                self.apply(|s| s.capture_started(handle)).await;
                info!(?handle, "Capture started");
                Ok(())
            }
            Err(err) => Err(self.apply(|s| s.capture_failed(err)).await),
        }
    }

    /// Stop recording and upload what was captured. A no-op when no
    /// capture is active.
    pub async fn finish_capture(
        &self,
        display_name: Option<&str>,
    ) -> Result<Outcome<ReferenceUpload>, SessionError> {
        let Some(handle) = self.apply(SessionState::take_capture).await else {
            debug!("Stop requested with no active capture");
            return Ok(Outcome::Skipped);
        };
        match self.capture.stop_capture(handle).await {
            Ok(Some(blob)) => {
                let ticket = self
                    .apply(|s| s.capture_to_upload(blob, display_name))
                    .await?;
                self.run_upload(ticket).await
            }
            Ok(None) => {
                self.apply(SessionState::capture_ended).await;
                Ok(Outcome::Skipped)
            }
            Err(err) => Err(self.apply(|s| s.capture_failed(err)).await),
        }
    }

    /// Let the user pick a file and upload it. A cancelled picker is a no-op.
    ///
    /// The busy flag is held while the picker is open.
    pub async fn upload_file(
        &self,
        display_name: Option<&str>,
    ) -> Result<Outcome<ReferenceUpload>, SessionError> {
        let constraints = self.apply(SessionState::begin_pick).await?;
        match self.capture.pick_file(&constraints).await {
            Ok(Some(blob)) => {
                let ticket = self
                    .apply(|s| s.capture_to_upload(blob, display_name))
                    .await?;
                self.run_upload(ticket).await
            }
            Ok(None) => {
                debug!("File picker cancelled");
                self.apply(SessionState::capture_ended).await;
                Ok(Outcome::Skipped)
            }
            Err(err) => Err(self.apply(|s| s.capture_failed(err)).await),
        }
    }

    /// Upload an already-captured blob as the new active reference.
    pub async fn upload_blob(
        &self,
        blob: AudioBlob,
        display_name: Option<&str>,
    ) -> Result<Outcome<ReferenceUpload>, SessionError> {
        let ticket = self.apply(|s| s.begin_upload(blob, display_name)).await?;
        self.run_upload(ticket).await
    }

    async fn run_upload(
        &self,
        ticket: UploadTicket,
    ) -> Result<Outcome<ReferenceUpload>, SessionError> {
        let UploadTicket { lease, request } = ticket;
        let result = self.backend.upload_reference(request).await;
        let stored = result.is_ok();
        let outcome = self.apply(|s| s.complete_upload(lease, result)).await?;
        match &outcome {
            Outcome::Applied(upload) => {
                info!(%lease, reference = %upload.reference_id, "Reference uploaded");
                self.refresh_after_mutation().await;
            }
            // The backend still stored the voice.
            Outcome::Superseded if stored => self.refresh_after_mutation().await,
            Outcome::Superseded | Outcome::Skipped => {}
        }
        Ok(outcome)
    }

    /// Supersede the in-flight upload and release the busy flag.
    pub async fn abandon_upload(&self) -> bool {
        self.apply(SessionState::abandon_upload).await
    }

    /// Confirm the active reference for generation.
    pub async fn submit_reference(&self) -> Result<Outcome<String>, SessionError> {
        self.apply(SessionState::submit_reference).await
    }

    // ── Catalog ────────────────────────────────────────────────────

    /// Fetch the catalog and replace the local copy.
    ///
    /// Failures are logged and returned; the last-known catalog is kept.
    pub async fn refresh_catalog(&self) -> Result<Outcome<usize>, SessionError> {
        let lease = self.apply(SessionState::begin_refresh).await;
        let result = self.backend.list_voices().await;
        let outcome = self.apply(|s| s.complete_refresh(lease, result)).await;
        match &outcome {
            Ok(Outcome::Applied(count)) => debug!(%lease, voices = count, "Catalog refreshed"),
            Ok(_) => {}
            Err(err) => warn!(%lease, error = %err, "Catalog refresh failed; keeping last-known catalog"),
        }
        outcome
    }

    async fn refresh_after_mutation(&self) {
        // Failure is already logged; the mutation itself succeeded.
        let _ = self.refresh_catalog().await;
    }

    pub async fn select_voice(
        &self,
        id: VoiceRecordId,
    ) -> Result<Outcome<CatalogVoice>, SessionError> {
        let outcome = self.apply(|s| s.select_voice(id)).await?;
        if let Outcome::Applied(voice) = &outcome {
            info!(voice = %voice.name, id = %voice.id, "Voice selected");
        }
        Ok(outcome)
    }

    /// Select by display name; custom voices shadow predefined ones.
    pub async fn select_voice_by_name(
        &self,
        name: &str,
    ) -> Result<Outcome<CatalogVoice>, SessionError> {
        self.apply(|s| {
            let id = s
                .catalog()
                .find_by_name(name)
                .map(|voice| voice.id)
                .ok_or_else(|| SessionError::NotReady(format!("no voice named '{name}'")))?;
            s.select_voice(id)
        })
        .await
    }

    pub async fn clear_selection(&self) -> Result<Outcome<()>, SessionError> {
        self.apply(SessionState::clear_selection).await
    }

    /// Delete a custom voice. Confirmation is the caller's job.
    pub async fn delete_voice(&self, id: VoiceRecordId) -> Result<(), SessionError> {
        self.apply(|s| s.check_delete(id)).await?;
        let result = self.backend.delete_voice(id).await;
        self.apply(|s| s.complete_delete(id, result)).await?;
        info!(%id, "Voice deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    // ── Generation ─────────────────────────────────────────────────

    pub async fn set_input_text(&self, text: impl Into<String> + Send) {
        let text = text.into();
        self.apply(|s| s.set_input_text(text)).await;
    }

    /// Generate speech for the draft text with the current binding.
    ///
    /// Returns the artifact URL, `Skipped` when nothing is bound or the text
    /// is blank, and `Superseded` when the text or binding changed while the
    /// request was in flight.
    pub async fn request_generation(&self) -> Result<Outcome<String>, SessionError> {
        let ticket = match self.apply(SessionState::begin_generation).await? {
            Outcome::Applied(ticket) => ticket,
            Outcome::Skipped => return Ok(Outcome::Skipped),
            Outcome::Superseded => return Ok(Outcome::Superseded),
        };

        let result = match &ticket.request {
            GenerationRequest::Reference(request) => {
                self.backend.generate_with_reference(request).await
            }
            GenerationRequest::Voice(request) => self.backend.generate_with_voice(request).await,
        };

        let now_ms = Utc::now().timestamp_millis();
        let outcome = self
            .apply(|s| {
                s.complete_generation(ticket.lease, result, now_ms, |path, token| {
                    self.backend.artifact_url(path, token)
                })
            })
            .await;
        if let Ok(Outcome::Applied(url)) = &outcome {
            info!(lease = %ticket.lease, %url, "Speech generated");
        }
        outcome
    }

    /// Fetch the bytes of a generated clip.
    pub async fn download_artifact(&self, audio_url: &str) -> Result<Vec<u8>, SessionError> {
        self.backend
            .download_artifact(audio_url)
            .await
            .map_err(|err| SessionError::Network(err.reason()))
    }
}
