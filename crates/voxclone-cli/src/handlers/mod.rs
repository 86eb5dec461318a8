//! Command handlers that drive the session.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//! - Validate CLI-specific input, call `SessionOrchestrator`, print results
//!
//! State rules (busy flag, mutual exclusion, supersession) belong to the
//! session, not here.

pub mod clone;
pub mod delete;
pub mod say;
pub mod speak;
pub mod voices;

use std::path::Path;

use voxclone_core::{Outcome, SessionError, SessionOrchestrator};

use crate::error::CliError;

/// Reject blank text before any session state changes.
fn require_text(text: &str) -> Result<(), CliError> {
    if text.trim().is_empty() {
        Err(CliError::Arguments("--text must not be empty".to_string()))
    } else {
        Ok(())
    }
}

fn not_ready(message: &str) -> CliError {
    SessionError::NotReady(message.to_string()).into()
}

/// Generate speech for `text` with whatever is bound, print the URL and
/// optionally save the clip.
async fn generate(
    session: &SessionOrchestrator,
    text: &str,
    out: Option<&Path>,
) -> Result<String, CliError> {
    session.set_input_text(text).await;
    let url = match session.request_generation().await? {
        Outcome::Applied(url) => url,
        Outcome::Skipped => return Err(not_ready("no voice or reference is bound")),
        Outcome::Superseded => return Err(not_ready("generation was superseded")),
    };
    println!("Audio: {url}");

    if let Some(path) = out {
        let bytes = session.download_artifact(&url).await?;
        tokio::fs::write(path, &bytes).await?;
        println!("Saved {} bytes to {}", bytes.len(), path.display());
    }
    Ok(url)
}
