//! CLI-specific error types and mappings.
//!
//! Maps session and adapter errors to exit codes and user-facing messages.

use thiserror::Error;
use voxclone_core::SessionError;
use voxclone_http::HttpError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Session or backend failure.
    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Session(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::from(SessionError::Generation("boom".into())).exit_code(),
            1
        );
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(
            CliError::from(std::io::Error::other("disk full")).exit_code(),
            74
        );
        assert_eq!(CliError::Config("bad url".into()).exit_code(), 78);
    }

    #[test]
    fn test_session_message_passes_through() {
        let err = CliError::from(SessionError::NotReady("no reference".into()));
        assert_eq!(err.to_string(), "Not ready: no reference");
    }
}
