//! URL construction for backend endpoints.
//!
//! The base URL always carries a trailing slash, so every endpoint is joined
//! relative to it and a path prefix (`http://host/tts/`) is preserved.

use url::{ParseError, Url};
use voxclone_core::VoiceRecordId;

pub const UPLOAD_REFERENCE: &str = "upload_reference";
pub const GENERATE_SPEECH: &str = "generate_speech";
pub const GENERATE_SPEECH_WITH_VOICE: &str = "generate_speech_with_voice";
pub const GET_VOICES: &str = "get_voices";

/// Parse an operator-supplied base address.
pub fn parse_base_url(raw: &str) -> Result<Url, ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

pub fn endpoint(base: &Url, path: &str) -> Result<Url, ParseError> {
    base.join(path.trim_start_matches('/'))
}

pub fn delete_voice_url(base: &Url, id: VoiceRecordId) -> Result<Url, ParseError> {
    endpoint(base, &format!("delete_voice/{id}"))
}

/// `<base>/download/<output_path>?t=<token>`.
pub fn artifact_url(base: &Url, output_path: &str, cache_token: i64) -> Result<Url, ParseError> {
    let mut url = endpoint(
        base,
        &format!("download/{}", output_path.trim_start_matches('/')),
    )?;
    url.set_query(Some(&format!("t={cache_token}")));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        parse_base_url("http://localhost:5000").unwrap()
    }

    #[test]
    fn test_parse_base_url_adds_slash() {
        assert_eq!(base().as_str(), "http://localhost:5000/");
        assert_eq!(
            parse_base_url(" http://gpu:5000/tts ").unwrap().as_str(),
            "http://gpu:5000/tts/"
        );
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_endpoint_keeps_prefix() {
        let base = parse_base_url("http://gpu:5000/tts").unwrap();
        assert_eq!(
            endpoint(&base, GET_VOICES).unwrap().as_str(),
            "http://gpu:5000/tts/get_voices"
        );
        assert_eq!(
            endpoint(&base, "/upload_reference").unwrap().as_str(),
            "http://gpu:5000/tts/upload_reference"
        );
    }

    #[test]
    fn test_delete_voice_url() {
        assert_eq!(
            delete_voice_url(&base(), VoiceRecordId::new(12)).unwrap().as_str(),
            "http://localhost:5000/delete_voice/12"
        );
    }

    #[test]
    fn test_artifact_url() {
        assert_eq!(
            artifact_url(&base(), "output.mp3", 1_731_000_000_000)
                .unwrap()
                .as_str(),
            "http://localhost:5000/download/output.mp3?t=1731000000000"
        );
        assert_eq!(
            artifact_url(&base(), "/api_outputs/tts 1.wav", 5)
                .unwrap()
                .as_str(),
            "http://localhost:5000/download/api_outputs/tts%201.wav?t=5"
        );
    }
}
