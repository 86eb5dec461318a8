//! Captured audio payloads and the container formats a reference may use.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Audio container formats understood by the backend's ingestion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Canonical MIME type sent with uploads.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    /// Resolve a format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    /// Resolve a format from a MIME type, ignoring parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    /// Resolve a format from the file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Detect the container from its leading bytes.
    ///
    /// WAV: `RIFF....WAVE`. MP3: an `ID3` tag or an MPEG frame sync.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            return Some(Self::Wav);
        }
        if bytes.starts_with(b"ID3") {
            return Some(Self::Mp3);
        }
        if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0 {
            return Some(Self::Mp3);
        }
        None
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Opaque captured bytes plus what an upload needs to describe them.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioBlob {
    bytes: Vec<u8>,
    file_name: String,
    format: AudioFormat,
}

impl AudioBlob {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, format: AudioFormat) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            format,
        }
    }

    /// A microphone recording, named the way the recorder names it.
    pub fn recorded_wav(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "reference.wav", AudioFormat::Wav)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

// Audio payloads are large; print their shape, not their contents.
impl fmt::Debug for AudioBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBlob")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
