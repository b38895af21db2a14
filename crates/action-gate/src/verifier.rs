//! Bounded open / toggle / reopen / re-read loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use action_locator::{ActionSurfaceLocator, LocatorError, OpenOutcome, OptionHandle, SurfaceHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use watchlater_core_types::{AttemptOutcome, ErrorKind, Target, ToggleVia};

use crate::errors::GateError;
use crate::timing::{settle_for, TimingPolicy};
use crate::types::{AttemptStep, VerifyPass, DEFAULT_OPTION_LABEL};

/// Drives one target through the verified toggle.
///
/// The re-read after a full close/reopen cycle is the only signal trusted as
/// success; the click itself proves nothing.
pub struct ToggleVerifier {
    locator: Arc<dyn ActionSurfaceLocator>,
    timing: TimingPolicy,
    label: String,
}

impl ToggleVerifier {
    pub fn new(locator: Arc<dyn ActionSurfaceLocator>, timing: TimingPolicy) -> Self {
        Self {
            locator,
            timing,
            label: DEFAULT_OPTION_LABEL.to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Result<Self, GateError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(GateError::InvalidLabel("label must not be empty".to_string()));
        }
        self.label = label;
        Ok(self)
    }

    pub fn timing(&self) -> &TimingPolicy {
        &self.timing
    }

    /// Run the loop once with no escalation; a missing surface region is
    /// reported as `SurfaceUnavailable`.
    pub async fn verify(&self, target: &Target, cancel: &CancellationToken) -> AttemptOutcome {
        self.run_pass(target, cancel).await.into_outcome()
    }

    /// Run attempts `1..=max_attempts` until confirmation, exhaustion, a
    /// fault, cancellation, or a structurally absent surface.
    #[instrument(skip_all, fields(target = %target.id, item = ?target.item_id))]
    pub async fn run_pass(&self, target: &Target, cancel: &CancellationToken) -> VerifyPass {
        let max_attempts = self.timing.max_attempts.max(1);
        let mut last_via: Option<ToggleVia> = None;
        let mut last_failure: Option<(ErrorKind, String)> = None;

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                info!(attempt, "Cancelled before attempt");
                return VerifyPass::Finished(
                    AttemptOutcome::failed(
                        ErrorKind::Cancelled,
                        attempt - 1,
                        format!("cancelled before attempt {}", attempt),
                    )
                    .with_via(last_via),
                );
            }

            debug!(attempt, max_attempts, "Starting toggle attempt");

            let step = match self.attempt(target).await {
                Ok(step) => step,
                Err(err) => {
                    warn!(attempt, error = %err, "Collaborator fault during attempt");
                    self.dismiss_quietly(target).await;
                    return VerifyPass::Finished(
                        AttemptOutcome::failed(ErrorKind::UnknownException, attempt, err.to_string())
                            .with_via(last_via),
                    );
                }
            };

            match step {
                AttemptStep::Confirmed(via) => {
                    info!(attempt, via = %via, "Toggle confirmed by re-read");
                    return VerifyPass::Finished(AttemptOutcome::confirmed(via, attempt));
                }
                AttemptStep::Structural { outcome, via } => {
                    if via.is_some() {
                        last_via = via;
                    }
                    info!(
                        attempt,
                        reason = outcome.reason().unwrap_or_default(),
                        "Surface region missing, handing back for escalation"
                    );
                    return VerifyPass::SurfaceMissing {
                        outcome,
                        attempts_used: attempt,
                        via: last_via,
                    };
                }
                AttemptStep::Retry { kind, reason, via } => {
                    if via.is_some() {
                        last_via = via;
                    }
                    debug!(attempt, kind = %kind, reason = %reason, "Attempt did not confirm");
                    last_failure = Some((kind, reason));
                    settle_for(self.timing.retry_backoff()).await;
                }
            }
        }

        let detail = match last_failure {
            Some((kind, reason)) => format!("{} ({})", reason, kind),
            None => "re-read never matched".to_string(),
        };
        warn!(max_attempts, detail = %detail, "Toggle not confirmed after all attempts");
        VerifyPass::Finished(
            AttemptOutcome::failed(ErrorKind::Unconfirmed, max_attempts, detail).with_via(last_via),
        )
    }

    /// One full open / toggle / close / reopen / verify cycle.
    async fn attempt(&self, target: &Target) -> Result<AttemptStep, LocatorError> {
        // Opening
        let surface = match self.open(target).await? {
            OpenOutcome::Opened { surface } => surface,
            outcome @ OpenOutcome::StructurallyAbsent { .. } => {
                return Ok(AttemptStep::Structural { outcome, via: None });
            }
            OpenOutcome::TransientAbsent { reason } => {
                return Ok(AttemptStep::Retry {
                    kind: ErrorKind::TransientAbsent,
                    reason,
                    via: None,
                });
            }
        };
        let via = surface.via;
        settle_for(self.timing.delay_open()).await;

        // Locating option
        let option = match self.find_option(target, &surface).await? {
            Some(option) => option,
            None => {
                self.dismiss(target).await?;
                return Ok(AttemptStep::Retry {
                    kind: ErrorKind::OptionNotFound,
                    reason: format!("option '{}' not found via {} path", self.label, via),
                    via: Some(via),
                });
            }
        };

        // Toggling
        if self.is_checked(target, &option).await? {
            debug!("Option already checked, leaving it alone");
        } else {
            self.bounded(self.locator.toggle(target, &option)).await?;
        }
        settle_for(self.timing.delay_click()).await;

        // Closing
        self.dismiss(target).await?;
        settle_for(self.timing.delay_close()).await;

        // Reopening
        let reopened = match self.open(target).await? {
            OpenOutcome::Opened { surface } => surface,
            outcome @ OpenOutcome::StructurallyAbsent { .. } => {
                return Ok(AttemptStep::Structural {
                    outcome,
                    via: Some(via),
                });
            }
            OpenOutcome::TransientAbsent { reason } => {
                return Ok(AttemptStep::Retry {
                    kind: ErrorKind::TransientAbsent,
                    reason: format!("reopen: {}", reason),
                    via: Some(via),
                });
            }
        };
        settle_for(self.timing.delay_reopen()).await;

        // Verifying
        let verified = match self.find_option(target, &reopened).await? {
            Some(option) => self.is_checked(target, &option).await?,
            None => {
                self.dismiss(target).await?;
                return Ok(AttemptStep::Retry {
                    kind: ErrorKind::OptionNotFound,
                    reason: format!("option '{}' missing after reopen", self.label),
                    via: Some(via),
                });
            }
        };

        self.dismiss(target).await?;
        settle_for(self.timing.settle()).await;

        if verified {
            Ok(AttemptStep::Confirmed(via))
        } else {
            Ok(AttemptStep::Retry {
                kind: ErrorKind::Unconfirmed,
                reason: "option unchecked on re-read".to_string(),
                via: Some(via),
            })
        }
    }

    /// Open with the open timeout; a timeout means the surface has not
    /// rendered yet.
    async fn open(&self, target: &Target) -> Result<OpenOutcome, LocatorError> {
        let limit = self.timing.open_timeout();
        match tokio::time::timeout(limit, self.locator.open(target)).await {
            Ok(result) => result,
            Err(_) => Ok(OpenOutcome::transient(format!(
                "surface did not open within {}ms",
                limit.as_millis()
            ))),
        }
    }

    async fn find_option(
        &self,
        target: &Target,
        surface: &SurfaceHandle,
    ) -> Result<Option<OptionHandle>, LocatorError> {
        self.bounded(self.locator.find_option(target, surface, &self.label))
            .await
    }

    async fn is_checked(&self, target: &Target, option: &OptionHandle) -> Result<bool, LocatorError> {
        self.bounded(self.locator.is_checked(target, option)).await
    }

    async fn dismiss(&self, target: &Target) -> Result<(), LocatorError> {
        self.bounded(self.locator.dismiss(target)).await
    }

    async fn dismiss_quietly(&self, target: &Target) {
        if let Err(err) = self.dismiss(target).await {
            debug!(error = %err, "Dismiss after fault failed");
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, LocatorError>
    where
        F: Future<Output = Result<T, LocatorError>>,
    {
        let limit: Duration = self.timing.control_timeout();
        tokio::time::timeout(limit, call).await.map_err(|_| {
            LocatorError::Timeout(format!("control call exceeded {}ms", limit.as_millis()))
        })?
    }
}
