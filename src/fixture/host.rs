use action_flow::{HostError, TargetHost};
use async_trait::async_trait;
use tracing::debug;
use watchlater_core_types::{Target, TargetId, TargetRef, TargetScope};

use super::SimulatedBrowser;

#[async_trait]
impl TargetHost for SimulatedBrowser {
    async fn enumerate(&self, scope: TargetScope) -> Result<Vec<TargetRef>, HostError> {
        if self.fail_enumeration {
            return Err(HostError::Enumeration("browser window unavailable".into()));
        }
        let tabs = self.tabs.lock();
        Ok(tabs
            .iter()
            .filter(|tab| !tab.removed)
            .filter(|tab| scope == TargetScope::All || tab.active)
            .map(|tab| {
                TargetRef::new(TargetId(tab.id.clone()), tab.address.clone())
                    .with_active(tab.active)
            })
            .collect())
    }

    async fn remove(&self, target: &Target) -> Result<(), HostError> {
        self.with_tab(&target.id.0, |tab| {
            if tab.behaviour.remove_fails {
                return Err(HostError::operation("remove", "tab refused to close"));
            }
            tab.removed = true;
            tab.dialog_open = false;
            debug!(tab = %tab.id, "Simulated tab closed");
            Ok(())
        })
        .unwrap_or_else(|| Err(HostError::TargetGone(target.id.to_string())))
    }

    async fn refresh(&self, target: &Target) -> Result<TargetRef, HostError> {
        self.with_tab(&target.id.0, |tab| {
            if tab.behaviour.refresh_fails {
                return Err(HostError::operation("refresh", "reload aborted"));
            }
            tab.loads += 1;
            tab.dialog_open = false;
            debug!(tab = %tab.id, loads = tab.loads, "Simulated tab reloaded");
            Ok(TargetRef::new(TargetId(tab.id.clone()), tab.address.clone()).with_active(tab.active))
        })
        .unwrap_or_else(|| Err(HostError::TargetGone(target.id.to_string())))
    }
}
