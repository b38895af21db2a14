//! Per-target runner: verifier passes interleaved with refresh escalation

use std::sync::Arc;

use action_gate::{ToggleVerifier, VerifyPass};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use watchlater_core_types::{AttemptOutcome, ErrorKind, Target};

use crate::escalation::EscalationController;
use crate::ports::TargetHost;

/// Final state of one target after the runner is done with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRun {
    /// Latest handle; differs from the input when a refresh happened.
    pub target: Target,
    pub outcome: AttemptOutcome,
}

/// Runs the verified toggle for one target at a time.
pub struct TargetRunner {
    verifier: ToggleVerifier,
    host: Arc<dyn TargetHost>,
}

impl TargetRunner {
    pub fn new(verifier: ToggleVerifier, host: Arc<dyn TargetHost>) -> Self {
        Self { verifier, host }
    }

    /// Verify the target, refreshing it whenever the surface region is
    /// missing and budget remains. Each refresh restarts at attempt 1.
    #[instrument(skip_all, fields(target = %target.id))]
    pub async fn run(&self, target: Target, cancel: &CancellationToken) -> TargetRun {
        let mut escalation = EscalationController::new(self.host.clone(), self.verifier.timing());
        let mut current = target;

        loop {
            match self.verifier.run_pass(&current, cancel).await {
                VerifyPass::Finished(outcome) => {
                    let outcome = outcome.with_escalations(escalation.performed());
                    debug!(
                        confirmed = outcome.confirmed,
                        attempts = outcome.attempts_used,
                        escalations = outcome.escalations,
                        "Target finished"
                    );
                    return TargetRun {
                        target: current,
                        outcome,
                    };
                }
                VerifyPass::SurfaceMissing {
                    outcome,
                    attempts_used,
                    via,
                } => {
                    if escalation.should_escalate(&outcome) {
                        if cancel.is_cancelled() {
                            info!(
                                escalations = escalation.performed(),
                                "Cancelled before refresh"
                            );
                            let outcome = AttemptOutcome::failed(
                                ErrorKind::Cancelled,
                                attempts_used,
                                "cancelled before refresh",
                            )
                            .with_via(via)
                            .with_escalations(escalation.performed());
                            return TargetRun {
                                target: current,
                                outcome,
                            };
                        }
                        current = escalation.escalate(&current).await;
                        continue;
                    }

                    info!(
                        escalations = escalation.performed(),
                        "Surface still missing, giving up on target"
                    );
                    let outcome = VerifyPass::SurfaceMissing {
                        outcome,
                        attempts_used,
                        via,
                    }
                    .into_outcome()
                    .with_escalations(escalation.performed());
                    return TargetRun {
                        target: current,
                        outcome,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HostError;
    use action_gate::TimingPolicy;
    use action_locator::{ActionSurfaceLocator, LocatorError, OpenOutcome, OptionHandle, SurfaceHandle};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use watchlater_core_types::{
        ErrorKind, ItemId, SurfaceKind, TargetId, TargetRef, TargetScope, ToggleVia,
    };

    /// Page whose player region only appears after `broken_loads` refreshes.
    struct Page {
        broken_loads: u32,
        loads: Mutex<u32>,
        checked: Mutex<bool>,
        refresh_fails: bool,
        cancel_on_open: Option<CancellationToken>,
    }

    impl Page {
        fn new(broken_loads: u32) -> Arc<Self> {
            Arc::new(Self {
                broken_loads,
                loads: Mutex::new(0),
                checked: Mutex::new(false),
                refresh_fails: false,
                cancel_on_open: None,
            })
        }

        fn loads(&self) -> u32 {
            *self.loads.lock()
        }
    }

    #[async_trait]
    impl TargetHost for Page {
        async fn enumerate(&self, _scope: TargetScope) -> Result<Vec<TargetRef>, HostError> {
            Ok(Vec::new())
        }

        async fn remove(&self, _target: &Target) -> Result<(), HostError> {
            Ok(())
        }

        async fn refresh(&self, target: &Target) -> Result<TargetRef, HostError> {
            if self.refresh_fails {
                return Err(HostError::TargetGone(target.id.to_string()));
            }
            *self.loads.lock() += 1;
            Ok(TargetRef::new(target.id.clone(), target.address.clone()))
        }
    }

    #[async_trait]
    impl ActionSurfaceLocator for Page {
        async fn open(&self, _target: &Target) -> Result<OpenOutcome, LocatorError> {
            if let Some(cancel) = &self.cancel_on_open {
                cancel.cancel();
            }
            if self.loads() < self.broken_loads {
                return Ok(OpenOutcome::structural("player region missing"));
            }
            Ok(OpenOutcome::Opened {
                surface: SurfaceHandle::new("dlg", ToggleVia::DirectPath),
            })
        }

        async fn find_option(
            &self,
            _target: &Target,
            _surface: &SurfaceHandle,
            label: &str,
        ) -> Result<Option<OptionHandle>, LocatorError> {
            Ok(Some(OptionHandle::new("opt", label)))
        }

        async fn is_checked(
            &self,
            _target: &Target,
            _option: &OptionHandle,
        ) -> Result<bool, LocatorError> {
            Ok(*self.checked.lock())
        }

        async fn toggle(&self, _target: &Target, _option: &OptionHandle) -> Result<(), LocatorError> {
            let mut checked = self.checked.lock();
            *checked = !*checked;
            Ok(())
        }

        async fn dismiss(&self, _target: &Target) -> Result<(), LocatorError> {
            Ok(())
        }
    }

    fn runner(page: Arc<Page>) -> TargetRunner {
        let verifier = ToggleVerifier::new(page.clone(), TimingPolicy::immediate());
        TargetRunner::new(verifier, page)
    }

    fn target() -> Target {
        Target::new(
            TargetId("tab-7".into()),
            "https://www.youtube.com/shorts/xyz",
            Some(ItemId("xyz".into())),
            SurfaceKind::Short,
        )
    }

    #[tokio::test]
    async fn test_recovers_after_three_refreshes() {
        let page = Page::new(3);
        let run = runner(page.clone())
            .run(target(), &CancellationToken::new())
            .await;

        assert!(run.outcome.confirmed);
        assert_eq!(run.outcome.attempts_used, 1);
        assert_eq!(run.outcome.escalations, 3);
        assert_eq!(run.outcome.via, Some(ToggleVia::DirectPath));
        assert_eq!(page.loads(), 3);
    }

    #[tokio::test]
    async fn test_always_missing_surface_is_unavailable() {
        let page = Page::new(u32::MAX);
        let run = runner(page.clone())
            .run(target(), &CancellationToken::new())
            .await;

        assert!(!run.outcome.confirmed);
        assert_eq!(run.outcome.error, Some(ErrorKind::SurfaceUnavailable));
        assert_eq!(run.outcome.escalations, 3);
        assert_eq!(run.outcome.via, None);
        assert_eq!(page.loads(), 3);
    }

    #[tokio::test]
    async fn test_healthy_page_never_refreshes() {
        let page = Page::new(0);
        let run = runner(page.clone())
            .run(target(), &CancellationToken::new())
            .await;

        assert!(run.outcome.confirmed);
        assert_eq!(run.outcome.escalations, 0);
        assert_eq!(page.loads(), 0);
    }

    #[tokio::test]
    async fn test_failing_refresh_exhausts_budget() {
        let page = Arc::new(Page {
            broken_loads: 1,
            loads: Mutex::new(0),
            checked: Mutex::new(false),
            refresh_fails: true,
            cancel_on_open: None,
        });
        let run = runner(page).run(target(), &CancellationToken::new()).await;

        assert_eq!(run.outcome.error, Some(ErrorKind::SurfaceUnavailable));
        assert_eq!(run.outcome.escalations, 3);
        assert_eq!(run.target, target());
    }

    #[tokio::test]
    async fn test_cancelled_token_skips_escalation() {
        let page = Page::new(u32::MAX);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let run = runner(page.clone()).run(target(), &cancel).await;

        assert_eq!(run.outcome.error, Some(ErrorKind::Cancelled));
        assert_eq!(page.loads(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_missing_surface_is_cancelled() {
        let cancel = CancellationToken::new();
        let page = Arc::new(Page {
            broken_loads: u32::MAX,
            loads: Mutex::new(0),
            checked: Mutex::new(false),
            refresh_fails: false,
            cancel_on_open: Some(cancel.clone()),
        });
        let run = runner(page.clone()).run(target(), &cancel).await;

        assert_eq!(run.outcome.error, Some(ErrorKind::Cancelled));
        assert_eq!(run.outcome.attempts_used, 1);
        assert_eq!(run.outcome.escalations, 0);
        assert_eq!(page.loads(), 0);
    }
}
