//! Pure session state machine.
//!
//! `SessionState` holds the state tuple `(reference?, voice?, busy, job?)`
//! plus the draft text and supersession bookkeeping. Every transition is a
//! synchronous method; the async driver in [`super::orchestrator`] calls them
//! under a lock before and after each port call.
//!
//! # Transitions
//!
//! | Method | Guard | Effect |
//! |--------|-------|--------|
//! | `begin_capture` | idle | busy; drop voice, reference, job |
//! | `begin_pick` | idle | busy while the file picker is open |
//! | `take_capture` / `capture_to_upload` | capture active | capture becomes an upload |
//! | `begin_upload` | idle | busy; drop voice, job; new reference |
//! | `complete_upload` | lease current | populate or drop reference; idle |
//! | `abandon_upload` | upload outstanding | drop reference; idle |
//! | `submit_reference` | reference uploaded | submitted |
//! | `select_voice` | idle | voice selected; drop reference, job, draft |
//! | `clear_selection` | idle | drop voice, job |
//! | `set_input_text` | - | store draft; drop job |
//! | `begin_generation` | idle, bound, text | busy; job running |
//! | `complete_generation` | - | idle; apply if lease current |
//! | `begin_refresh` / `complete_refresh` | lease newer than applied | replace catalog |
//! | `check_delete` / `complete_delete` | custom voice | drop selection if it was deleted |
//!
//! Events describing each applied transition are queued and handed out by
//! [`SessionState::drain_events`].

use std::mem;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{
    AudioBlob, CatalogVoice, GenerationJob, GenerationRequest, GenerationSource, JobStatus,
    LeaseCounter, LeaseId, ReferenceSession, ReferenceUpload, SourceKind, VoiceCatalog,
    VoiceKind, VoiceListing, VoiceRecordId,
};
use crate::error::{Operation, SessionError};
use crate::events::SessionEvent;
use crate::ports::{
    AudioConstraints, BackendPortError, BackendResult, CaptureError, CaptureHandle, GeneratedArtifact,
    UploadReferenceRequest,
};
use crate::settings::SessionSettings;

/// Result of applying a transition or a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The transition took effect.
    Applied(T),
    /// Preconditions did not hold; nothing changed.
    Skipped,
    /// A completion arrived for superseded work and was dropped.
    Superseded,
}

impl<T> Outcome<T> {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Skipped | Self::Superseded => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Skipped => Outcome::Skipped,
            Self::Superseded => Outcome::Superseded,
        }
    }
}

/// An upload the driver must send to the backend.
#[derive(Debug)]
pub struct UploadTicket {
    pub lease: LeaseId,
    pub request: UploadReferenceRequest,
}

/// A generation the driver must send to the backend.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub lease: LeaseId,
    pub request: GenerationRequest,
}

/// Read-only view of the session for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub busy: bool,
    pub active_operation: Option<Operation>,
    pub reference_id: Option<String>,
    pub transcript: Option<String>,
    pub reference_uploading: bool,
    pub reference_submitted: bool,
    pub selected_voice: Option<CatalogVoice>,
    pub input_text: String,
    pub job_source: Option<SourceKind>,
    pub job_status: Option<JobStatus>,
}

impl SessionSnapshot {
    /// Whether a reference (uploading or uploaded) is active.
    pub const fn has_reference(&self) -> bool {
        self.reference_uploading || self.reference_id.is_some()
    }
}

#[derive(Debug)]
pub struct SessionState {
    settings: SessionSettings,
    catalog: VoiceCatalog,
    reference: Option<ReferenceSession>,
    selected: Option<CatalogVoice>,
    job: Option<GenerationJob>,
    draft_text: String,
    busy: Option<Operation>,
    capture: Option<CaptureHandle>,
    leases: LeaseCounter,
    pending_upload: Option<LeaseId>,
    applied_refresh: Option<LeaseId>,
    last_cache_token: i64,
    events: Vec<SessionEvent>,
}

impl SessionState {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            catalog: VoiceCatalog::new(),
            reference: None,
            selected: None,
            job: None,
            draft_text: String::new(),
            busy: None,
            capture: None,
            leases: LeaseCounter::new(),
            pending_upload: None,
            applied_refresh: None,
            last_cache_token: 0,
            events: Vec::new(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub const fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub const fn reference(&self) -> Option<&ReferenceSession> {
        self.reference.as_ref()
    }

    pub const fn selected_voice(&self) -> Option<&CatalogVoice> {
        self.selected.as_ref()
    }

    pub const fn job(&self) -> Option<&GenerationJob> {
        self.job.as_ref()
    }

    pub fn input_text(&self) -> &str {
        &self.draft_text
    }

    pub const fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    pub const fn busy_with(&self) -> Option<Operation> {
        self.busy
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let upload = self.reference.as_ref().and_then(ReferenceSession::upload);
        SessionSnapshot {
            busy: self.busy.is_some(),
            active_operation: self.busy,
            reference_id: upload.map(|u| u.reference_id.clone()),
            transcript: upload.map(|u| u.transcript.clone()),
            reference_uploading: self
                .reference
                .as_ref()
                .is_some_and(ReferenceSession::is_uploading),
            reference_submitted: self
                .reference
                .as_ref()
                .is_some_and(ReferenceSession::is_submitted),
            selected_voice: self.selected.clone(),
            input_text: self.draft_text.clone(),
            job_source: self.job.as_ref().map(|j| j.source().kind()),
            job_status: self.job.as_ref().map(|j| j.status().clone()),
        }
    }

    /// Hand out queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    // ── Guards and helpers ─────────────────────────────────────────

    /// Reject `requested` while a heavy operation is outstanding.
    pub fn ensure_idle(&self, requested: Operation) -> Result<(), SessionError> {
        match self.busy {
            Some(active) => Err(SessionError::Busy { requested, active }),
            None => Ok(()),
        }
    }

    fn set_busy(&mut self, busy: Option<Operation>) {
        let was = self.busy.is_some();
        self.busy = busy;
        if was != busy.is_some() {
            self.events.push(SessionEvent::BusyChanged {
                busy: busy.is_some(),
            });
        }
    }

    fn drop_reference(&mut self) {
        if self.reference.take().is_some() {
            self.events.push(SessionEvent::ReferenceCleared);
        }
    }

    fn drop_selection(&mut self) {
        if self.selected.take().is_some() {
            self.events.push(SessionEvent::SelectionCleared);
        }
    }

    fn discard_stale(&mut self, operation: Operation, lease: LeaseId) {
        warn!(%operation, %lease, "Ignoring stale completion (lease mismatch)");
        self.events.push(SessionEvent::StaleCompletionDiscarded {
            operation,
            lease: lease.get(),
        });
    }

    fn fail(&mut self, operation: Operation, err: SessionError) -> SessionError {
        self.events.push(SessionEvent::OperationFailed {
            operation,
            message: err.to_string(),
        });
        err
    }

    // ── Capture ────────────────────────────────────────────────────

    /// Claim the busy flag for a microphone capture.
    ///
    /// Starting a capture discards all uncommitted work.
    pub fn begin_capture(&mut self) -> Result<(), SessionError> {
        self.ensure_idle(Operation::Capture)?;
        self.set_busy(Some(Operation::Capture));
        self.drop_selection();
        self.drop_reference();
        self.job = None;
        debug!("Capture starting");
        Ok(())
    }

    /// Claim the busy flag while the file picker is open. Nothing else
    /// changes, so a cancelled pick leaves the session as it was.
    pub fn begin_pick(&mut self) -> Result<AudioConstraints, SessionError> {
        self.ensure_idle(Operation::Capture)?;
        self.set_busy(Some(Operation::Capture));
        debug!("File picker open");
        Ok(self.settings.constraints.clone())
    }

    pub fn capture_started(&mut self, handle: CaptureHandle) {
        self.capture = Some(handle);
        self.events.push(SessionEvent::CaptureStarted);
    }

    /// Capture could not start or stop. Releases the busy flag.
    pub fn capture_failed(&mut self, err: CaptureError) -> SessionError {
        self.capture = None;
        if self.busy == Some(Operation::Capture) {
            self.set_busy(None);
        }
        self.fail(Operation::Capture, err.into())
    }

    /// Take the active capture handle for stopping. The busy flag stays
    /// held until the capture turns into an upload or ends.
    pub fn take_capture(&mut self) -> Option<CaptureHandle> {
        if self.busy != Some(Operation::Capture) {
            return None;
        }
        self.capture.take()
    }

    /// The capture or picker ended without yielding audio.
    pub fn capture_ended(&mut self) {
        self.capture = None;
        if self.busy == Some(Operation::Capture) {
            self.set_busy(None);
        }
    }

    /// Hand a recorded or picked blob straight to the uploader, keeping busy
    /// held.
    pub fn capture_to_upload(
        &mut self,
        blob: AudioBlob,
        display_name: Option<&str>,
    ) -> Result<UploadTicket, SessionError> {
        if self.busy != Some(Operation::Capture) {
            return Err(SessionError::NotReady("no capture is active".to_string()));
        }
        if let Err(err) = self.settings.constraints.check(&blob) {
            self.set_busy(None);
            return Err(self.fail(Operation::Upload, err.into()));
        }
        Ok(self.start_upload(blob, display_name))
    }

    // ── Upload ─────────────────────────────────────────────────────

    /// Start uploading a picked or supplied blob.
    pub fn begin_upload(
        &mut self,
        blob: AudioBlob,
        display_name: Option<&str>,
    ) -> Result<UploadTicket, SessionError> {
        self.ensure_idle(Operation::Upload)?;
        if let Err(err) = self.settings.constraints.check(&blob) {
            return Err(self.fail(Operation::Upload, err.into()));
        }
        Ok(self.start_upload(blob, display_name))
    }

    fn start_upload(&mut self, blob: AudioBlob, display_name: Option<&str>) -> UploadTicket {
        self.set_busy(Some(Operation::Upload));
        self.drop_selection();
        self.drop_reference();
        self.job = None;

        let lease = self.leases.mint();
        let voice_name = self.settings.voice_name_or_default(display_name);
        self.reference = Some(ReferenceSession::create(lease, voice_name.clone()));
        self.pending_upload = Some(lease);

        debug!(%lease, voice = %voice_name, bytes = blob.len(), "Reference upload starting");
        self.events.push(SessionEvent::ReferenceUploading {
            display_name: voice_name.clone(),
        });
        UploadTicket {
            lease,
            request: UploadReferenceRequest {
                audio: blob,
                voice_name,
            },
        }
    }

    /// Apply an upload result if its lease is still current.
    ///
    /// A failed upload drops the reference entirely; the user may retry at
    /// once.
    pub fn complete_upload(
        &mut self,
        lease: LeaseId,
        result: BackendResult<ReferenceUpload>,
    ) -> Result<Outcome<ReferenceUpload>, SessionError> {
        if self.pending_upload != Some(lease) {
            self.discard_stale(Operation::Upload, lease);
            return Ok(Outcome::Superseded);
        }
        self.pending_upload = None;
        self.set_busy(None);

        match result {
            Ok(upload) => {
                if let Some(session) = self.reference.as_mut().filter(|s| s.lease() == lease) {
                    session.populate(upload.clone());
                }
                self.events.push(SessionEvent::ReferenceUploaded {
                    reference_id: upload.reference_id.clone(),
                    transcript: upload.transcript.clone(),
                });
                Ok(Outcome::Applied(upload))
            }
            Err(err) => {
                self.drop_reference();
                Err(self.fail(Operation::Upload, SessionError::Upload(err.reason())))
            }
        }
    }

    /// Give up on the in-flight upload. Its result will be discarded when
    /// it arrives. Returns whether an upload was outstanding.
    pub fn abandon_upload(&mut self) -> bool {
        let Some(lease) = self.pending_upload.take() else {
            return false;
        };
        debug!(%lease, "Upload abandoned");
        self.drop_reference();
        self.set_busy(None);
        true
    }

    pub fn submit_reference(&mut self) -> Result<Outcome<String>, SessionError> {
        let Some(session) = self.reference.as_mut() else {
            return Err(SessionError::NotReady("no active reference".to_string()));
        };
        let first = session.submit()?;
        let reference_id = session.reference_id().unwrap_or_default().to_string();
        if !first {
            return Ok(Outcome::Skipped);
        }
        self.events.push(SessionEvent::ReferenceSubmitted {
            reference_id: reference_id.clone(),
        });
        Ok(Outcome::Applied(reference_id))
    }

    // ── Catalog selection ──────────────────────────────────────────

    /// Make `id` the sole binding. A predefined voice without audio is a
    /// silent no-op and leaves the previous selection in place.
    pub fn select_voice(&mut self, id: VoiceRecordId) -> Result<Outcome<CatalogVoice>, SessionError> {
        self.ensure_idle(Operation::Selection)?;
        let Some(voice) = self.catalog.get(id).cloned() else {
            return Err(SessionError::NotReady(format!(
                "voice {id} is not in the catalog"
            )));
        };
        if !voice.is_selectable() {
            debug!(voice = %voice.name, "Ignoring selection of voice without audio");
            return Ok(Outcome::Skipped);
        }

        self.drop_reference();
        self.job = None;
        self.draft_text.clear();
        self.selected = Some(voice.clone());
        self.events.push(SessionEvent::VoiceSelected {
            id: voice.id,
            name: voice.name.clone(),
        });
        Ok(Outcome::Applied(voice))
    }

    pub fn clear_selection(&mut self) -> Result<Outcome<()>, SessionError> {
        self.ensure_idle(Operation::Selection)?;
        if self.selected.is_none() {
            return Ok(Outcome::Skipped);
        }
        self.drop_selection();
        self.job = None;
        Ok(Outcome::Applied(()))
    }

    // ── Generation ─────────────────────────────────────────────────

    /// Store the draft text. Any current job is discarded; a running one
    /// will find itself superseded when it completes.
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
        if let Some(job) = self.job.take() {
            debug!(lease = %job.lease(), "Job discarded by text edit");
        }
    }

    fn binding(&self) -> Option<GenerationSource> {
        if let Some(source) = self.reference.as_ref().and_then(ReferenceSession::generation_source) {
            return Some(source);
        }
        self.selected.as_ref().map(|voice| GenerationSource::VoiceBound {
            voice: voice.id,
            voice_name: voice.name.clone(),
        })
    }

    /// Start a generation. Without a binding or with blank text this is a
    /// no-op that leaves status and busy untouched.
    pub fn begin_generation(&mut self) -> Result<Outcome<GenerationTicket>, SessionError> {
        self.ensure_idle(Operation::Generation)?;
        let Some(source) = self.binding() else {
            debug!("Generation skipped: nothing bound");
            return Ok(Outcome::Skipped);
        };
        if self.draft_text.trim().is_empty() {
            debug!("Generation skipped: input text is empty");
            return Ok(Outcome::Skipped);
        }

        let lease = self.leases.mint();
        let kind = source.kind();
        let mut job = GenerationJob::new(lease, source, self.draft_text.clone());
        job.start()?;
        let request = job.request();
        self.job = Some(job);
        self.set_busy(Some(Operation::Generation));
        self.events.push(SessionEvent::GenerationStarted { source: kind });
        debug!(%lease, source = ?kind, "Generation starting");
        Ok(Outcome::Applied(GenerationTicket { lease, request }))
    }

    /// Cache token for an artifact URL: `now_ms`, bumped if needed so it is
    /// strictly greater than every token handed out before.
    pub fn next_cache_token(&mut self, now_ms: i64) -> i64 {
        let token = now_ms.max(self.last_cache_token.saturating_add(1));
        self.last_cache_token = token;
        token
    }

    /// Apply a generation result. Busy is released even when the job was
    /// superseded.
    pub fn complete_generation(
        &mut self,
        lease: LeaseId,
        result: BackendResult<GeneratedArtifact>,
        now_ms: i64,
        artifact_url: impl FnOnce(&str, i64) -> String,
    ) -> Result<Outcome<String>, SessionError> {
        if self.busy == Some(Operation::Generation) {
            self.set_busy(None);
        }
        if self.job.as_ref().map(GenerationJob::lease) != Some(lease) {
            self.discard_stale(Operation::Generation, lease);
            return Ok(Outcome::Superseded);
        }

        match result {
            Ok(artifact) => {
                let token = self.next_cache_token(now_ms);
                let url = artifact_url(&artifact.output_path, token);
                if let Some(job) = self.job.as_mut() {
                    job.succeed(url.clone());
                }
                self.events.push(SessionEvent::GenerationSucceeded {
                    audio_url: url.clone(),
                });
                Ok(Outcome::Applied(url))
            }
            Err(err) => {
                let message = err.reason();
                if let Some(job) = self.job.as_mut() {
                    job.fail(message.clone());
                }
                self.events.push(SessionEvent::GenerationFailed {
                    message: message.clone(),
                });
                Err(SessionError::Generation(message))
            }
        }
    }

    // ── Catalog refresh and deletion ───────────────────────────────

    pub fn begin_refresh(&mut self) -> LeaseId {
        self.leases.mint()
    }

    /// Replace the catalog unless a newer refresh has already landed.
    pub fn complete_refresh(
        &mut self,
        lease: LeaseId,
        result: BackendResult<VoiceListing>,
    ) -> Result<Outcome<usize>, SessionError> {
        if self.applied_refresh.is_some_and(|applied| lease <= applied) {
            self.discard_stale(Operation::Refresh, lease);
            return Ok(Outcome::Superseded);
        }
        match result {
            Ok(listing) => {
                let predefined = listing.predefined.len();
                let custom = listing.custom.len();
                self.catalog.replace(listing);
                self.applied_refresh = Some(lease);
                self.events
                    .push(SessionEvent::CatalogRefreshed { predefined, custom });
                Ok(Outcome::Applied(predefined + custom))
            }
            Err(err) => Err(self.fail(Operation::Refresh, network_error(&err))),
        }
    }

    /// Refuse deletes the backend would never honour.
    pub fn check_delete(&mut self, id: VoiceRecordId) -> Result<(), SessionError> {
        let predefined = self
            .catalog
            .get(id)
            .is_some_and(|voice| voice.kind == VoiceKind::Predefined);
        if predefined {
            return Err(self.fail(
                Operation::Delete,
                SessionError::Delete(format!("voice {id} is predefined and cannot be deleted")),
            ));
        }
        Ok(())
    }

    pub fn complete_delete(
        &mut self,
        id: VoiceRecordId,
        result: BackendResult<()>,
    ) -> Result<(), SessionError> {
        if let Err(err) = result {
            return Err(self.fail(Operation::Delete, SessionError::Delete(err.reason())));
        }
        if self.selected.as_ref().is_some_and(|voice| voice.id == id) {
            self.drop_selection();
            self.job = None;
        }
        self.events.push(SessionEvent::VoiceDeleted { id });
        Ok(())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

/// Map a transport failure that has no operation-specific variant.
pub(crate) fn network_error(err: &BackendPortError) -> SessionError {
    SessionError::Network(err.reason())
}
