//! CLI bootstrap - the composition root.
//!
//! The only place concrete adapters are instantiated:
//! - HTTP backend client (via voxclone-http)
//! - File-backed capture source
//! - Tracing event emitter
//!
//! Handlers receive the composed [`CliContext`] and drive the session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use voxclone_core::{
    CaptureSourcePort, CloneBackendPort, SessionDeps, SessionOrchestrator, SessionSettings,
    validate_settings,
};
use voxclone_http::{BackendClientConfig, DefaultBackendClient};

use crate::capture::FileCaptureSource;
use crate::emitter::TracingEmitter;
use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub backend_url: String,
    pub timeout: Duration,
    pub token: Option<String>,
    pub settings: SessionSettings,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.timeout_secs == 0 {
            return Err(CliError::Arguments(
                "--timeout-secs must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            backend_url: cli.backend_url.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
            token: cli.token.clone().filter(|t| !t.trim().is_empty()),
            settings: SessionSettings::default(),
        })
    }

    fn client_config(&self) -> BackendClientConfig {
        BackendClientConfig::new()
            .with_base_url(&self.backend_url)
            .with_timeout(self.timeout)
            .with_optional_token(self.token.clone())
    }
}

/// Fully composed session for CLI commands.
pub struct CliContext {
    pub session: Arc<SessionOrchestrator>,
    pub backend_url: String,
}

impl CliContext {
    pub fn session(&self) -> &SessionOrchestrator {
        &self.session
    }
}

/// Build the session and load the catalog.
///
/// `reference_file` is what the file picker yields; `None` makes every pick
/// a cancellation. A catalog that fails to load is logged, not fatal.
pub async fn bootstrap(
    config: CliConfig,
    reference_file: Option<PathBuf>,
) -> Result<CliContext, CliError> {
    validate_settings(&config.settings).map_err(|e| CliError::Config(e.to_string()))?;

    let backend: Arc<dyn CloneBackendPort> =
        Arc::new(DefaultBackendClient::new(&config.client_config())?);
    let capture: Arc<dyn CaptureSourcePort> = Arc::new(FileCaptureSource::new(reference_file));
    Ok(compose(config, backend, capture).await)
}

/// Wire already-built ports into a session.
pub async fn compose(
    config: CliConfig,
    backend: Arc<dyn CloneBackendPort>,
    capture: Arc<dyn CaptureSourcePort>,
) -> CliContext {
    let deps = SessionDeps::new(backend, capture, Arc::new(TracingEmitter));
    let session = Arc::new(SessionOrchestrator::new(deps, config.settings));
    session.initialize().await;
    CliContext {
        session,
        backend_url: config.backend_url,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::parse_from(["voxclone", "--timeout-secs", "12", "--token", " ", "voices"]);
        let config = CliConfig::from_cli(&cli).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert!(config.token.is_none());
        assert_eq!(config.settings, SessionSettings::default());
    }

    #[test]
    fn test_zero_timeout_is_usage_error() {
        let cli = Cli::parse_from(["voxclone", "--timeout-secs", "0", "voices"]);
        let err = CliConfig::from_cli(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_bad_backend_url_is_config_error() {
        let cli = Cli::parse_from(["voxclone", "--backend-url", "not a url", "voices"]);
        let config = CliConfig::from_cli(&cli).unwrap();
        let Err(err) = bootstrap(config, None).await else {
            panic!("expected a configuration error");
        };
        assert_eq!(err.exit_code(), 78);
    }
}
