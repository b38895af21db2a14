use std::sync::Arc;

use action_flow::{HostError, TargetHost, TargetRunner};
use action_gate::{settle_for, TimingPolicy, ToggleVerifier, DEFAULT_OPTION_LABEL};
use action_locator::ActionSurfaceLocator;
use regex::Regex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use watchlater_core_types::{Target, TargetIdentifier};

use crate::error::SchedulerError;
use crate::metrics;
use crate::model::{BatchOptions, BatchReport, DetailEntry, NonActionablePolicy, SuccessPolicy};

pub const DEFAULT_DOMAIN_FILTER: &str = r"youtube\.com|youtu\.be";

/// Engine-level settings shared by every batch.
#[derive(Clone, Debug)]
pub struct BatchSettings {
    pub domain_filter: Regex,
    pub option_label: String,
    pub timing: TimingPolicy,
}

impl BatchSettings {
    pub fn new(timing: TimingPolicy) -> Result<Self, SchedulerError> {
        Ok(Self {
            domain_filter: Regex::new(DEFAULT_DOMAIN_FILTER)?,
            option_label: DEFAULT_OPTION_LABEL.to_string(),
            timing,
        })
    }

    pub fn with_domain_filter(mut self, pattern: &str) -> Result<Self, SchedulerError> {
        self.domain_filter = Regex::new(pattern)?;
        Ok(self)
    }

    pub fn with_option_label(mut self, label: impl Into<String>) -> Self {
        self.option_label = label.into();
        self
    }
}

pub struct BatchOrchestrator {
    host: Arc<dyn TargetHost>,
    identifier: Arc<dyn TargetIdentifier>,
    runner: TargetRunner,
    settings: BatchSettings,
}

impl BatchOrchestrator {
    pub fn new(
        host: Arc<dyn TargetHost>,
        locator: Arc<dyn ActionSurfaceLocator>,
        identifier: Arc<dyn TargetIdentifier>,
        settings: BatchSettings,
    ) -> Result<Self, SchedulerError> {
        settings.timing.validate()?;
        let verifier = ToggleVerifier::new(locator, settings.timing.clone())
            .with_label(settings.option_label.clone())?;
        let runner = TargetRunner::new(verifier, Arc::clone(&host));
        Ok(Self {
            host,
            identifier,
            runner,
            settings,
        })
    }

    /// Run one batch. Only enumeration can fail the batch; everything that
    /// goes wrong for a single target ends up in its detail entry.
    #[instrument(skip_all, fields(scope = ?options.scope))]
    pub async fn run(
        &self,
        options: BatchOptions,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, SchedulerError> {
        metrics::record_batch();
        let candidates = self.candidates(&options).await?;
        info!(candidates = candidates.len(), "Starting batch");

        let mut report = BatchReport::begin(candidates.len());
        let total = candidates.len();

        for (index, target) in candidates.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(target = %target.id, "Batch cancelled, target not started");
                metrics::record_cancelled();
                report.record(DetailEntry::cancelled(&target));
                continue;
            }

            if !target.is_actionable() {
                let entry = self
                    .process_non_actionable(&target, options.non_actionable)
                    .await;
                report.record(entry);
                continue;
            }

            let entry = self.process_actionable(target, &options, cancel).await;
            report.record(entry);

            // cooldown only follows targets that were driven through the dialog
            if index + 1 < total {
                settle_for(self.settings.timing.cooldown()).await;
            }
        }

        let report = report.finish();
        let counters = metrics::snapshot();
        info!(
            run_id = %report.run_id,
            processed = report.processed_count,
            confirmed = report.confirmed_count,
            errors = report.error_count,
            skipped = report.skipped_count,
            closed = report.closed(),
            total_processed = counters.processed,
            total_escalations = counters.escalations,
            "Batch finished"
        );
        Ok(report)
    }

    /// Enumerate, keep matching addresses, classify.
    async fn candidates(&self, options: &BatchOptions) -> Result<Vec<Target>, SchedulerError> {
        let limit = self.settings.timing.open_timeout();
        let refs = timeout(limit, self.host.enumerate(options.scope))
            .await
            .map_err(|_| SchedulerError::EnumerationTimeout(limit.as_millis() as u64))??;

        Ok(refs
            .into_iter()
            .filter(|r| self.settings.domain_filter.is_match(&r.address))
            .map(|r| Target::classify(r, self.identifier.as_ref()))
            .collect())
    }

    async fn process_non_actionable(
        &self,
        target: &Target,
        policy: NonActionablePolicy,
    ) -> DetailEntry {
        match policy {
            NonActionablePolicy::Leave => {
                debug!(target = %target.id, "Leaving non-actionable target");
                DetailEntry::non_actionable(target, false)
            }
            NonActionablePolicy::Remove => match self.remove(target).await {
                Ok(()) => {
                    info!(target = %target.id, address = %target.address, "Closed non-actionable target");
                    metrics::record_removal();
                    DetailEntry::non_actionable(target, true)
                }
                Err(err) => {
                    warn!(target = %target.id, error = %err, "Could not close non-actionable target");
                    DetailEntry::removal_failed(target, err.to_string())
                }
            },
        }
    }

    async fn process_actionable(
        &self,
        target: Target,
        options: &BatchOptions,
        cancel: &CancellationToken,
    ) -> DetailEntry {
        let run = self.runner.run(target, cancel).await;
        let outcome = &run.outcome;
        metrics::record_processed(outcome.confirmed);
        metrics::record_escalations(outcome.escalations);

        if !outcome.confirmed {
            warn!(
                target = %run.target.id,
                error = %outcome.error_message().unwrap_or_default(),
                attempts = outcome.attempts_used,
                "Target not confirmed"
            );
            return DetailEntry::from_outcome(&run.target, outcome);
        }

        info!(
            target = %run.target.id,
            via = outcome.via.map(|v| v.name()).unwrap_or("unknown"),
            attempts = outcome.attempts_used,
            "Target saved"
        );

        let closed = match options.on_success {
            SuccessPolicy::Keep => false,
            SuccessPolicy::Remove => match self.remove(&run.target).await {
                Ok(()) => {
                    metrics::record_removal();
                    true
                }
                Err(err) => {
                    warn!(target = %run.target.id, error = %err, "Could not close saved target");
                    false
                }
            },
        };
        DetailEntry::from_outcome(&run.target, outcome).with_closed(closed)
    }

    async fn remove(&self, target: &Target) -> Result<(), HostError> {
        let limit = self.settings.timing.control_timeout();
        timeout(limit, self.host.remove(target))
            .await
            .map_err(|_| HostError::Timeout(format!("remove exceeded {}ms", limit.as_millis())))?
    }
}
