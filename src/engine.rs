//! Wiring of configuration and a browser session into a batch orchestrator

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use watchlater_core_types::VideoUrlIdentifier;
use watchlater_scheduler::{
    handle_command, handle_raw, BatchOptions, BatchOrchestrator, BatchReport, BatchSettings, Command,
    CommandResponse, NonActionablePolicy, SuccessPolicy,
};

use crate::config::Config;
use crate::fixture::{build_locator, SessionSpec, SimulatedBrowser, TabSnapshot};

pub struct Engine {
    browser: Arc<SimulatedBrowser>,
    orchestrator: BatchOrchestrator,
}

impl Engine {
    pub fn new(config: &Config, session: &SessionSpec) -> Result<Self> {
        session.validate().context("invalid browser session")?;
        let settings = BatchSettings::new(config.timing.clone())?
            .with_domain_filter(&config.domain_filter)
            .context("invalid domain_filter")?
            .with_option_label(config.option_label.clone());

        let browser = SimulatedBrowser::new(session);
        let locator = Arc::new(build_locator(browser.clone()));
        let orchestrator = BatchOrchestrator::new(
            browser.clone(),
            locator,
            Arc::new(VideoUrlIdentifier::new()),
            settings,
        )
        .context("invalid engine settings")?;

        Ok(Self {
            browser,
            orchestrator,
        })
    }

    pub async fn run(&self, options: BatchOptions, cancel: &CancellationToken) -> Result<BatchReport> {
        let report = self.orchestrator.run(options, cancel).await?;
        Ok(report)
    }

    pub async fn handle(&self, command: &Command, cancel: &CancellationToken) -> CommandResponse {
        handle_command(&self.orchestrator, command, cancel).await
    }

    /// Answer one raw JSON command message.
    pub async fn handle_raw(&self, raw: &str, cancel: &CancellationToken) -> CommandResponse {
        handle_raw(&self.orchestrator, raw, cancel).await
    }

    pub fn tabs(&self) -> Vec<TabSnapshot> {
        self.browser.snapshot()
    }
}

/// Batch options from configured policy, with CLI flags able to switch
/// either removal on.
pub fn batch_options(
    base: BatchOptions,
    config: &Config,
    close_on_success: bool,
    close_non_actionable: bool,
) -> BatchOptions {
    let non_actionable = if close_non_actionable {
        NonActionablePolicy::Remove
    } else {
        config.policy.non_actionable
    };
    let on_success = if close_on_success || config.policy.close_on_success {
        SuccessPolicy::Remove
    } else {
        SuccessPolicy::Keep
    };
    base.with_non_actionable(non_actionable)
        .with_on_success(on_success)
}
