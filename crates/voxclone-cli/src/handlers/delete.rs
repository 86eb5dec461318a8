//! Delete command handler.
//!
//! Removes a custom voice from the backend. Predefined voices are refused
//! before any request is sent. Ids missing from the local catalog are still
//! sent, and the backend decides.

use voxclone_core::VoiceRecordId;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::input::prompt_confirmation;

/// Delete voice `id`, asking first unless `yes` is set.
pub async fn execute(ctx: &CliContext, id: i64, yes: bool) -> Result<bool, CliError> {
    let id = VoiceRecordId::new(id);
    let catalog = ctx.session().catalog().await;
    let label = catalog.get(id).map_or_else(
        || format!("voice {id}"),
        |voice| format!("voice '{}' (ID {id})", voice.name),
    );

    if !yes {
        let confirmed =
            prompt_confirmation(&format!("Are you sure you want to delete {label}?"))?;
        if !confirmed {
            println!("Delete cancelled.");
            return Ok(false);
        }
    }

    ctx.session().delete_voice(id).await?;
    println!("Deleted {label}.");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxclone_core::SessionError;

    use crate::handlers::test_support::{StubBackend, context};

    #[tokio::test]
    async fn test_delete_custom_voice() {
        let backend = StubBackend::with_voices();
        let ctx = context(backend.clone()).await;

        assert!(execute(&ctx, 10, true).await.unwrap());
        assert_eq!(*backend.deleted.lock().unwrap(), vec![VoiceRecordId::new(10)]);
        assert!(ctx.session().catalog().await.get(VoiceRecordId::new(10)).is_none());
    }

    #[tokio::test]
    async fn test_delete_predefined_is_refused() {
        let backend = StubBackend::with_voices();
        let ctx = context(backend.clone()).await;

        let err = execute(&ctx, 1, true).await.unwrap_err();
        assert!(matches!(err, CliError::Session(SessionError::Delete(_))));
        assert!(backend.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_sent() {
        let backend = StubBackend::with_voices();
        let ctx = context(backend.clone()).await;
        assert!(execute(&ctx, 99, true).await.unwrap());
        assert_eq!(*backend.deleted.lock().unwrap(), vec![VoiceRecordId::new(99)]);
    }
}
