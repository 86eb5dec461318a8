//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Clone a voice from a short clip and synthesize speech with it.
#[derive(Parser)]
#[command(name = "voxclone")]
#[command(about = "Clone voices and synthesize speech through a voxclone backend")]
#[command(version)]
pub struct Cli {
    /// Base address of the inference backend
    #[arg(
        long = "backend-url",
        env = "VOXCLONE_BACKEND_URL",
        global = true,
        default_value = voxclone_http::DEFAULT_BASE_URL
    )]
    pub backend_url: String,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", global = true, default_value_t = 300)]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[arg(long, env = "VOXCLONE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
