//! Refresh escalation for a missing surface region

use std::sync::Arc;
use std::time::Duration;

use action_gate::{settle_for, TimingPolicy};
use action_locator::OpenOutcome;
use tokio::time::timeout;
use tracing::{info, warn};
use watchlater_core_types::Target;

use crate::errors::HostError;
use crate::ports::TargetHost;

/// Per-target escalation budget.
///
/// Created fresh for every target; the counter never carries over.
pub struct EscalationController {
    host: Arc<dyn TargetHost>,
    max_escalations: u32,
    delay_reload: Duration,
    refresh_timeout: Duration,
    performed: u32,
}

impl EscalationController {
    pub fn new(host: Arc<dyn TargetHost>, timing: &TimingPolicy) -> Self {
        Self {
            host,
            max_escalations: timing.max_escalations,
            delay_reload: timing.delay_reload(),
            refresh_timeout: timing.open_timeout(),
            performed: 0,
        }
    }

    /// Escalations spent so far.
    pub fn performed(&self) -> u32 {
        self.performed
    }

    pub fn remaining(&self) -> u32 {
        self.max_escalations.saturating_sub(self.performed)
    }

    /// Only a structurally absent surface escalates, and only while budget
    /// remains.
    pub fn should_escalate(&self, outcome: &OpenOutcome) -> bool {
        outcome.is_structurally_absent() && self.performed < self.max_escalations
    }

    /// Hard-reload the target and wait for it to settle.
    ///
    /// A failed refresh still consumes budget; the previous handle is
    /// returned so the next pass has something to work on.
    pub async fn escalate(&mut self, target: &Target) -> Target {
        self.performed += 1;
        info!(
            target = %target.id,
            escalation = self.performed,
            max = self.max_escalations,
            "Refreshing target to recover missing surface"
        );

        let result = timeout(self.refresh_timeout, self.host.refresh(target))
            .await
            .unwrap_or_else(|_| {
                Err(HostError::Timeout(format!(
                    "refresh exceeded {}ms",
                    self.refresh_timeout.as_millis()
                )))
            });
        let refreshed = match result {
            Ok(reference) => target.refreshed(reference),
            Err(err) => {
                warn!(target = %target.id, error = %err, "Refresh failed, keeping previous handle");
                target.clone()
            }
        };

        settle_for(self.delay_reload).await;
        refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use watchlater_core_types::{ItemId, SurfaceKind, TargetId, TargetRef, TargetScope};

    struct ReloadHost {
        fail: bool,
        hang: bool,
        refreshes: Mutex<u32>,
    }

    #[async_trait]
    impl TargetHost for ReloadHost {
        async fn enumerate(&self, _scope: TargetScope) -> Result<Vec<TargetRef>, HostError> {
            Ok(Vec::new())
        }

        async fn remove(&self, _target: &Target) -> Result<(), HostError> {
            Ok(())
        }

        async fn refresh(&self, target: &Target) -> Result<TargetRef, HostError> {
            *self.refreshes.lock() += 1;
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(HostError::operation("refresh", "tab crashed"));
            }
            Ok(TargetRef::new(
                TargetId(format!("{}-r", target.id)),
                target.address.clone(),
            ))
        }
    }

    fn target() -> Target {
        Target::new(
            TargetId("tab-1".into()),
            "https://www.youtube.com/shorts/xyz",
            Some(ItemId("xyz".into())),
            SurfaceKind::Short,
        )
    }

    #[test]
    fn test_only_structural_outcomes_escalate() {
        let host = Arc::new(ReloadHost {
            fail: false,
            hang: false,
            refreshes: Mutex::new(0),
        });
        let controller = EscalationController::new(host, &TimingPolicy::immediate());
        assert!(controller.should_escalate(&OpenOutcome::structural("gone")));
        assert!(!controller.should_escalate(&OpenOutcome::transient("slow")));
    }

    #[test]
    fn test_budget_is_bounded() {
        let host = Arc::new(ReloadHost {
            fail: false,
            hang: false,
            refreshes: Mutex::new(0),
        });
        let mut controller = EscalationController::new(
            host.clone(),
            &TimingPolicy::immediate().with_max_escalations(2),
        );
        let target = target();
        let missing = OpenOutcome::structural("gone");

        tokio_test::block_on(async {
            while controller.should_escalate(&missing) {
                controller.escalate(&target).await;
            }
        });

        assert_eq!(controller.performed(), 2);
        assert_eq!(controller.remaining(), 0);
        assert_eq!(*host.refreshes.lock(), 2);
    }

    #[tokio::test]
    async fn test_refresh_keeps_identity() {
        let host = Arc::new(ReloadHost {
            fail: false,
            hang: false,
            refreshes: Mutex::new(0),
        });
        let mut controller = EscalationController::new(host, &TimingPolicy::immediate());
        let refreshed = controller.escalate(&target()).await;

        assert_eq!(refreshed.id, TargetId("tab-1-r".into()));
        assert_eq!(refreshed.item_id, Some(ItemId("xyz".into())));
        assert_eq!(refreshed.kind, SurfaceKind::Short);
    }

    #[tokio::test]
    async fn test_failed_refresh_still_counts() {
        let host = Arc::new(ReloadHost {
            fail: true,
            hang: false,
            refreshes: Mutex::new(0),
        });
        let mut controller = EscalationController::new(host, &TimingPolicy::immediate());
        let original = target();
        let kept = controller.escalate(&original).await;

        assert_eq!(kept, original);
        assert_eq!(controller.performed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_refresh_times_out_and_counts() {
        let host = Arc::new(ReloadHost {
            fail: false,
            hang: true,
            refreshes: Mutex::new(0),
        });
        let mut controller = EscalationController::new(host.clone(), &TimingPolicy::immediate());
        let original = target();
        let kept = controller.escalate(&original).await;

        assert_eq!(kept, original);
        assert_eq!(controller.performed(), 1);
        assert_eq!(*host.refreshes.lock(), 1);
    }
}
