//! Voices command handler.

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::print_catalog;

/// Refresh the catalog and print both lists.
///
/// Unlike the refresh at startup, a failure here is reported.
pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    ctx.session().refresh_catalog().await?;
    let catalog = ctx.session().catalog().await;

    if catalog.is_empty() {
        println!("No voices found at {}.", ctx.backend_url);
        println!("Use 'voxclone clone <FILE>' to add one.");
        return Ok(());
    }

    print_catalog(&catalog);
    Ok(())
}

#[cfg(test)]
mod tests {
    use voxclone_core::{SessionError, VoiceListing};

    use super::*;
    use crate::handlers::test_support::{StubBackend, context};

    #[tokio::test]
    async fn test_lists_voices() {
        let ctx = context(StubBackend::with_voices()).await;
        execute(&ctx).await.unwrap();
        assert_eq!(ctx.session().catalog().await.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_ok() {
        let backend = StubBackend::with_voices();
        *backend.listing.lock().unwrap() = VoiceListing::default();
        let ctx = context(backend).await;
        assert!(execute(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_catalog_loaded_at_startup() {
        let ctx = context(StubBackend::with_voices()).await;
        let catalog = ctx.session().catalog().await;
        assert!(catalog.find_by_name("Narrator").is_some());
        assert!(!matches!(
            ctx.session().refresh_catalog().await,
            Err(SessionError::Network(_))
        ));
    }
}
