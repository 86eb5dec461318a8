//! Subcommands of the `voxclone` binary.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// List predefined and custom voices
    Voices,

    /// Upload a reference clip and print its transcript
    Clone {
        /// WAV or MP3 file to clone
        file: PathBuf,
        /// Name to store the voice under
        #[arg(short, long)]
        name: Option<String>,
        /// Confirm the reference for generation
        #[arg(long)]
        submit: bool,
    },

    /// Clone a clip and speak text with it in one go
    Speak {
        /// WAV or MP3 reference clip
        #[arg(short, long)]
        file: PathBuf,
        /// Text to synthesize
        #[arg(short, long)]
        text: String,
        /// Name to store the voice under
        #[arg(short, long)]
        name: Option<String>,
        /// Save the generated audio here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Speak text with a saved or predefined voice
    Say {
        /// Voice name as shown by `voxclone voices`
        #[arg(long)]
        voice: String,
        /// Text to synthesize
        #[arg(short, long)]
        text: String,
        /// Save the generated audio here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete a custom voice
    Delete {
        /// Voice record id as shown by `voxclone voices`
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
