//! Shared fakes for session integration tests.
//!
//! `FakeBackend` answers from scripted queues. A scripted reply can be
//! gated on a oneshot so a test decides exactly when a response "arrives".

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;
use voxclone_core::{
    AudioBlob, AudioFormat, BackendPortError, BackendResult, CatalogVoice, ChannelEmitter,
    CloneBackendPort, GeneratedArtifact, ReferenceGenerationRequest, ReferenceUpload,
    SessionDeps, SessionEvent, SessionOrchestrator, SessionSettings, UnavailableCapture,
    UploadReferenceRequest, VoiceGenerationRequest, VoiceKind, VoiceListing, VoiceRecordId,
};

pub enum Scripted<T> {
    Ready(BackendResult<T>),
    Gated(oneshot::Receiver<BackendResult<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> BackendResult<T> {
        match self {
            Self::Ready(result) => result,
            Self::Gated(rx) => rx.await.unwrap_or_else(|_| {
                Err(BackendPortError::Network {
                    message: "gate dropped".to_string(),
                })
            }),
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    uploads: Mutex<VecDeque<Scripted<ReferenceUpload>>>,
    generations: Mutex<VecDeque<Scripted<GeneratedArtifact>>>,
    listing: Mutex<Option<BackendResult<VoiceListing>>>,
    delete_result: Mutex<Option<BackendResult<()>>>,
    upload_requests: Mutex<Vec<String>>,
    reference_requests: Mutex<Vec<ReferenceGenerationRequest>>,
    voice_requests: Mutex<Vec<VoiceGenerationRequest>>,
    deleted: Mutex<Vec<VoiceRecordId>>,
    upload_calls: AtomicUsize,
    generation_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_listing(listing: VoiceListing) -> Arc<Self> {
        let backend = Self::default();
        *backend.listing.lock().unwrap() = Some(Ok(listing));
        Arc::new(backend)
    }

    pub fn push_upload(&self, result: BackendResult<ReferenceUpload>) {
        self.uploads
            .lock()
            .unwrap()
            .push_back(Scripted::Ready(result));
    }

    /// Queue an upload whose reply is sent through the returned sender.
    pub fn gate_upload(&self) -> oneshot::Sender<BackendResult<ReferenceUpload>> {
        let (tx, rx) = oneshot::channel();
        self.uploads.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn push_generation(&self, result: BackendResult<GeneratedArtifact>) {
        self.generations
            .lock()
            .unwrap()
            .push_back(Scripted::Ready(result));
    }

    pub fn gate_generation(&self) -> oneshot::Sender<BackendResult<GeneratedArtifact>> {
        let (tx, rx) = oneshot::channel();
        self.generations
            .lock()
            .unwrap()
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub fn set_listing(&self, result: BackendResult<VoiceListing>) {
        *self.listing.lock().unwrap() = Some(result);
    }

    pub fn set_delete_result(&self, result: BackendResult<()>) {
        *self.delete_result.lock().unwrap() = Some(result);
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_voice_names(&self) -> Vec<String> {
        self.upload_requests.lock().unwrap().clone()
    }

    pub fn reference_requests(&self) -> Vec<ReferenceGenerationRequest> {
        self.reference_requests.lock().unwrap().clone()
    }

    pub fn voice_requests(&self) -> Vec<VoiceGenerationRequest> {
        self.voice_requests.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<VoiceRecordId> {
        self.deleted.lock().unwrap().clone()
    }

    fn next_generation(&self) -> Scripted<GeneratedArtifact> {
        self.generation_calls.fetch_add(1, Ordering::SeqCst);
        self.generations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Scripted::Ready(Ok(GeneratedArtifact {
                    output_path: "output.wav".to_string(),
                }))
            })
    }
}

#[async_trait]
impl CloneBackendPort for FakeBackend {
    async fn upload_reference(
        &self,
        request: UploadReferenceRequest,
    ) -> BackendResult<ReferenceUpload> {
        self.upload_requests
            .lock()
            .unwrap()
            .push(request.voice_name.clone());
        let scripted = self.uploads.lock().unwrap().pop_front();
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(reference("r-default", "default transcript")),
        }
    }

    async fn generate_with_reference(
        &self,
        request: &ReferenceGenerationRequest,
    ) -> BackendResult<GeneratedArtifact> {
        self.reference_requests.lock().unwrap().push(request.clone());
        self.next_generation().resolve().await
    }

    async fn generate_with_voice(
        &self,
        request: &VoiceGenerationRequest,
    ) -> BackendResult<GeneratedArtifact> {
        self.voice_requests.lock().unwrap().push(request.clone());
        self.next_generation().resolve().await
    }

    async fn list_voices(&self) -> BackendResult<VoiceListing> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listing
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(VoiceListing::default()))
    }

    async fn delete_voice(&self, id: VoiceRecordId) -> BackendResult<()> {
        self.deleted.lock().unwrap().push(id);
        self.delete_result.lock().unwrap().clone().unwrap_or(Ok(()))
    }

    fn artifact_url(&self, output_path: &str, cache_token: i64) -> String {
        format!("http://localhost:5000/download/{output_path}?t={cache_token}")
    }

    async fn download_artifact(&self, audio_url: &str) -> BackendResult<Vec<u8>> {
        if audio_url.contains("missing") {
            return Err(BackendPortError::NotFound {
                path: audio_url.to_string(),
            });
        }
        Ok(b"RIFF".to_vec())
    }
}

pub fn reference(id: &str, transcript: &str) -> ReferenceUpload {
    ReferenceUpload {
        reference_id: id.to_string(),
        transcript: transcript.to_string(),
        audio_path: format!("uploads/{id}/reference.wav"),
        text_path: format!("uploads/{id}/reference.txt"),
        voice_name: None,
    }
}

pub fn wav_blob(tag: u8) -> AudioBlob {
    let mut bytes = b"RIFF\x24\x00\x00\x00WAVE".to_vec();
    bytes.push(tag);
    AudioBlob::new(bytes, format!("clip-{tag}.wav"), AudioFormat::Wav)
}

pub fn predefined(id: i64, name: &str, audio_exists: bool) -> CatalogVoice {
    CatalogVoice {
        id: VoiceRecordId::new(id),
        name: name.to_string(),
        kind: VoiceKind::Predefined,
        voice_id: None,
        audio_exists,
        audio_path: Some(format!("predefined_voices/{name}.wav")),
        created_at: None,
    }
}

pub fn custom(id: i64, name: &str) -> CatalogVoice {
    CatalogVoice {
        id: VoiceRecordId::new(id),
        name: name.to_string(),
        kind: VoiceKind::Custom,
        voice_id: Some(format!("voice-{id}")),
        audio_exists: true,
        audio_path: None,
        created_at: None,
    }
}

/// Narrator (usable), Silent (missing audio), and two custom voices.
pub fn sample_listing() -> VoiceListing {
    VoiceListing::new(
        vec![predefined(1, "Narrator", true), predefined(2, "Silent", false)],
        vec![custom(10, "Mine"), custom(11, "Other")],
    )
}

pub struct Harness {
    pub session: Arc<SessionOrchestrator>,
    pub backend: Arc<FakeBackend>,
    pub events: tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
}

impl Harness {
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Orchestrator over `backend`, with the catalog already loaded.
pub async fn harness(backend: Arc<FakeBackend>) -> Harness {
    let (emitter, events) = ChannelEmitter::new();
    let session = Arc::new(SessionOrchestrator::new(
        SessionDeps::new(
            backend.clone(),
            Arc::new(UnavailableCapture),
            Arc::new(emitter),
        ),
        SessionSettings::default(),
    ));
    session.initialize().await;
    Harness {
        session,
        backend,
        events,
    }
}

/// Yield until `condition` holds; spawned tasks get to run in between.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
