//! Session settings and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::AudioConstraints;

/// Voice name sent with an upload when the user gives none.
pub const DEFAULT_VOICE_NAME: &str = "Custom Voice";

/// Largest reference clip accepted before upload (50 MiB).
pub const DEFAULT_MAX_REFERENCE_BYTES: u64 = 50 * 1024 * 1024;

/// Tunables for a [`crate::SessionOrchestrator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub default_voice_name: String,
    pub constraints: AudioConstraints,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_voice_name: DEFAULT_VOICE_NAME.to_string(),
            constraints: AudioConstraints::default(),
        }
    }
}

impl SessionSettings {
    /// Name to upload under: the trimmed user input, or the default.
    pub fn voice_name_or_default(&self, name: Option<&str>) -> String {
        name.map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.default_voice_name)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("default voice name must not be empty")]
    EmptyVoiceName,

    #[error("at least one audio format must be accepted")]
    NoAcceptedFormats,

    #[error("maximum reference size must be greater than zero")]
    ZeroMaxBytes,
}

/// Reject settings the session cannot run with.
pub fn validate_settings(settings: &SessionSettings) -> Result<(), SettingsError> {
    if settings.default_voice_name.trim().is_empty() {
        return Err(SettingsError::EmptyVoiceName);
    }
    if settings.constraints.accepted.is_empty() {
        return Err(SettingsError::NoAcceptedFormats);
    }
    if settings.constraints.max_bytes == 0 {
        return Err(SettingsError::ZeroMaxBytes);
    }
    Ok(())
}
