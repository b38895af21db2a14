use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Config;
use crate::engine::Engine;
use crate::fixture::SessionSpec;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    config_from_file: bool,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf, config_from_file: bool) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            config_from_file,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_from_file(&self) -> bool {
        self.config_from_file
    }

    /// Session file: the explicit flag, else the configured one.
    pub fn session_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config.session.clone())
            .context("no browser session given; pass --session or set WATCHLATER_SESSION")
    }

    pub async fn engine(&self, explicit_session: Option<&Path>) -> Result<Engine> {
        let path = self.session_path(explicit_session)?;
        let session = SessionSpec::load(&path).await?;
        Engine::new(self.config(), &session)
    }

    /// Token cancelled on Ctrl-C. The current attempt finishes; remaining
    /// targets are reported as cancelled.
    pub fn cancellation(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling batch");
                child.cancel();
            }
        });
        token
    }
}
