//! Say command handler: speak with a catalog voice.

use std::path::Path;

use voxclone_core::{Outcome, SessionError};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::{generate, require_text};

pub async fn execute(
    ctx: &CliContext,
    voice: &str,
    text: &str,
    out: Option<&Path>,
) -> Result<String, CliError> {
    require_text(text)?;

    match ctx.session().select_voice_by_name(voice).await? {
        Outcome::Applied(selected) => println!("Voice: {} ({})", selected.name, selected.id),
        _ => {
            let expected = ctx
                .session()
                .catalog()
                .await
                .find_by_name(voice)
                .and_then(|v| v.audio_path.clone());
            let hint = expected.map_or_else(String::new, |path| format!("; expected at {path}"));
            return Err(SessionError::NotReady(format!(
                "voice '{voice}' has no reference audio{hint}"
            ))
            .into());
        }
    }

    generate(ctx.session(), text, out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{StubBackend, context};

    #[tokio::test]
    async fn test_say_with_predefined_voice() {
        let backend = StubBackend::with_voices();
        let ctx = context(backend.clone()).await;

        let url = execute(&ctx, "Narrator", "Good evening", None).await.unwrap();
        assert!(url.contains("output.mp3"));
        assert_eq!(
            *backend.generated.lock().unwrap(),
            vec!["voice:Narrator".to_string()]
        );
    }

    #[tokio::test]
    async fn test_say_with_voice_missing_audio() {
        let backend = StubBackend::with_voices();
        let ctx = context(backend.clone()).await;

        let err = execute(&ctx, "Silent", "hello", None).await.unwrap_err();
        assert!(err.to_string().contains("expected at voices/2.wav"));
        assert!(backend.generated.lock().unwrap().is_empty());
        assert!(ctx.session().snapshot().await.selected_voice.is_none());
    }

    #[tokio::test]
    async fn test_say_unknown_voice() {
        let ctx = context(StubBackend::with_voices()).await;
        let err = execute(&ctx, "Nobody", "hello", None).await.unwrap_err();
        assert!(matches!(err, CliError::Session(SessionError::NotReady(_))));
    }
}
