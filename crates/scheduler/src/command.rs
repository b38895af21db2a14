//! Request/response bridge: JSON command messages in, JSON responses out.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::SchedulerError;
use crate::model::{BatchOptions, BatchSummary, NonActionablePolicy, SuccessPolicy};
use crate::orchestrator::BatchOrchestrator;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandOptions {
    pub close_on_success: bool,
    pub close_non_video: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Run {
        #[serde(default)]
        options: CommandOptions,
    },
    RunActive {
        #[serde(default)]
        options: CommandOptions,
    },
}

impl Command {
    pub fn parse(raw: &str) -> Result<Self, SchedulerError> {
        serde_json::from_str(raw).map_err(|e| SchedulerError::InvalidCommand(e.to_string()))
    }

    pub fn batch_options(&self) -> BatchOptions {
        let (base, options) = match self {
            Command::Run { options } => (BatchOptions::all(), options),
            Command::RunActive { options } => (BatchOptions::active(), options),
        };
        base.with_non_actionable(if options.close_non_video {
            NonActionablePolicy::Remove
        } else {
            NonActionablePolicy::Leave
        })
        .with_on_success(if options.close_on_success {
            SuccessPolicy::Remove
        } else {
            SuccessPolicy::Keep
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandResponse {
    Ok { ok: bool, res: BatchSummary },
    Err { ok: bool, error: String },
}

impl CommandResponse {
    pub fn success(res: BatchSummary) -> Self {
        CommandResponse::Ok { ok: true, res }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        CommandResponse::Err {
            ok: false,
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResponse::Ok { .. })
    }
}

/// Execute one command. Never fails: batch-level faults become
/// `{ok: false, error}`.
pub async fn handle_command(
    orchestrator: &BatchOrchestrator,
    command: &Command,
    cancel: &CancellationToken,
) -> CommandResponse {
    info!(?command, "Handling command");
    match orchestrator.run(command.batch_options(), cancel).await {
        Ok(report) => CommandResponse::success(report.summary()),
        Err(err) => {
            warn!(error = %err, "Command failed");
            CommandResponse::failure(err.to_string())
        }
    }
}

/// Parse and execute a raw JSON message.
pub async fn handle_raw(
    orchestrator: &BatchOrchestrator,
    raw: &str,
    cancel: &CancellationToken,
) -> CommandResponse {
    match Command::parse(raw) {
        Ok(command) => handle_command(orchestrator, &command, cancel).await,
        Err(err) => CommandResponse::failure(err.to_string()),
    }
}
