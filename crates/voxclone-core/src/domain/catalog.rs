//! The voice catalog: predefined voices shipped with the backend plus the
//! user's own cloned voices.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend record id of a catalog voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceRecordId(i64);

impl VoiceRecordId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for VoiceRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for VoiceRecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    /// Shipped with the backend; cannot be deleted.
    Predefined,
    /// Cloned by the user.
    Custom,
}

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVoice {
    pub id: VoiceRecordId,
    pub name: String,
    pub kind: VoiceKind,
    /// External identifier the user may copy.
    pub voice_id: Option<String>,
    pub audio_exists: bool,
    /// Where the backend expects the reference audio to live.
    pub audio_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CatalogVoice {
    /// Predefined voices are only usable when their audio is present.
    pub const fn is_selectable(&self) -> bool {
        match self.kind {
            VoiceKind::Custom => true,
            VoiceKind::Predefined => self.audio_exists,
        }
    }

    pub const fn is_custom(&self) -> bool {
        matches!(self.kind, VoiceKind::Custom)
    }
}

/// A catalog fetched from the backend in one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceListing {
    pub predefined: Vec<CatalogVoice>,
    pub custom: Vec<CatalogVoice>,
}

impl VoiceListing {
    pub fn new(predefined: Vec<CatalogVoice>, custom: Vec<CatalogVoice>) -> Self {
        Self { predefined, custom }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogVoice> {
        self.predefined.iter().chain(self.custom.iter())
    }
}

/// Last-known catalog. Replaced wholesale on every applied refresh.
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    listing: VoiceListing,
    loaded: bool,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched listing.
    pub fn replace(&mut self, listing: VoiceListing) {
        self.listing = listing;
        self.loaded = true;
    }

    /// Whether any refresh has been applied yet.
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, id: VoiceRecordId) -> Option<&CatalogVoice> {
        self.listing.iter().find(|v| v.id == id)
    }

    /// First voice with this exact name; custom voices shadow predefined ones.
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogVoice> {
        self.listing
            .custom
            .iter()
            .chain(self.listing.predefined.iter())
            .find(|v| v.name == name)
    }

    pub fn find_by_voice_id(&self, voice_id: &str) -> Option<&CatalogVoice> {
        self.listing
            .iter()
            .find(|v| v.voice_id.as_deref() == Some(voice_id))
    }

    pub fn predefined(&self) -> &[CatalogVoice] {
        &self.listing.predefined
    }

    pub fn custom(&self) -> &[CatalogVoice] {
        &self.listing.custom
    }

    pub const fn listing(&self) -> &VoiceListing {
        &self.listing
    }

    pub fn len(&self) -> usize {
        self.listing.predefined.len() + self.listing.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
