//! Clone command handler.
//!
//! Uploads a reference clip. The backend transcribes it and stores it as a
//! custom voice.

use voxclone_core::{Outcome, ReferenceUpload, SessionError};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Upload the picked file, print what the backend heard, and optionally
/// confirm the reference.
pub async fn execute(
    ctx: &CliContext,
    name: Option<&str>,
    submit: bool,
) -> Result<ReferenceUpload, CliError> {
    let reference = upload(ctx, name).await?;

    println!("Reference id: {}", reference.reference_id);
    if let Some(voice_name) = &reference.voice_name {
        println!("Saved as:     {voice_name}");
    }
    println!("Transcript:   {}", reference.transcript);

    if submit {
        ctx.session().submit_reference().await?;
        println!("Reference submitted.");
    }
    Ok(reference)
}

/// Upload via the session's file picker.
pub(crate) async fn upload(
    ctx: &CliContext,
    name: Option<&str>,
) -> Result<ReferenceUpload, CliError> {
    match ctx.session().upload_file(name).await? {
        Outcome::Applied(reference) => Ok(reference),
        Outcome::Skipped => Err(CliError::Arguments("no reference file given".to_string())),
        Outcome::Superseded => {
            Err(SessionError::Upload("upload was superseded".to_string()).into())
        }
    }
}
