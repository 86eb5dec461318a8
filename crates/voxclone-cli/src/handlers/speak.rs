//! Speak command handler: clone, submit and generate in one run.

use std::path::Path;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::{clone, generate, require_text};

pub async fn execute(
    ctx: &CliContext,
    text: &str,
    name: Option<&str>,
    out: Option<&Path>,
) -> Result<String, CliError> {
    require_text(text)?;

    let reference = clone::upload(ctx, name).await?;
    println!("Transcript: {}", reference.transcript);
    ctx.session().submit_reference().await?;

    generate(ctx.session(), text, out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{StubBackend, context_with_file, wav_file};

    #[tokio::test]
    async fn test_speak_generates_with_reference() {
        let file = wav_file();
        let backend = StubBackend::with_voices();
        let ctx = context_with_file(backend.clone(), Some(file.path().to_path_buf())).await;
        let out = tempfile::tempdir().unwrap();
        let out_path = out.path().join("speech.mp3");

        let url = execute(&ctx, "Hi there", None, Some(&out_path))
            .await
            .unwrap();

        assert!(url.starts_with("http://stub/download/output.mp3?t="));
        assert_eq!(
            *backend.generated.lock().unwrap(),
            vec!["ref:uploads/r1.wav".to_string()]
        );
        assert_eq!(tokio::fs::read(&out_path).await.unwrap(), b"ID3fake");
    }

    #[tokio::test]
    async fn test_speak_blank_text_uploads_nothing() {
        let file = wav_file();
        let backend = StubBackend::with_voices();
        let ctx = context_with_file(backend.clone(), Some(file.path().to_path_buf())).await;

        let err = execute(&ctx, "   ", None, None).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(backend.uploads.lock().unwrap().is_empty());
    }
}
