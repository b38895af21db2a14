//! Simulated browser session
//!
//! Stands in for a real browser so the engine can be driven end to end from
//! the CLI and from tests. Tabs and their dialog behaviour come from a
//! [`SessionSpec`] file.

pub mod host;
pub mod locator;
pub mod session;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

pub use locator::{build_locator, SimulatedControls, SimulatedPath};
pub use session::{FaultPoint, SessionError, SessionSpec, TabBehaviour, TabSpec};

/// Live state of one simulated tab.
#[derive(Clone, Debug)]
pub(crate) struct TabState {
    pub id: String,
    pub address: String,
    pub active: bool,
    pub behaviour: TabBehaviour,
    pub loads: u32,
    pub transient_left: u32,
    pub option_missing_left: u32,
    pub checked: bool,
    pub clicks: u32,
    pub dialog_open: bool,
    pub removed: bool,
}

impl TabState {
    fn from_spec(index: usize, spec: &TabSpec) -> Self {
        Self {
            id: spec.resolved_id(index),
            address: spec.address.clone(),
            active: spec.active,
            behaviour: spec.behaviour.clone(),
            loads: 0,
            transient_left: spec.behaviour.transient_opens,
            option_missing_left: spec.behaviour.option_missing,
            checked: spec.behaviour.already_saved,
            clicks: 0,
            dialog_open: false,
            removed: false,
        }
    }
}

/// Externally visible state of a tab after a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabSnapshot {
    pub id: String,
    pub address: String,
    pub saved: bool,
    pub removed: bool,
    pub refreshes: u32,
    pub clicks: u32,
}

/// Shared simulated window. Host and locator handles all point at the same
/// state.
pub struct SimulatedBrowser {
    tabs: Mutex<Vec<TabState>>,
    fail_enumeration: bool,
}

impl SimulatedBrowser {
    pub fn new(spec: &SessionSpec) -> Arc<Self> {
        Arc::new(Self {
            tabs: Mutex::new(
                spec.tabs
                    .iter()
                    .enumerate()
                    .map(|(index, tab)| TabState::from_spec(index, tab))
                    .collect(),
            ),
            fail_enumeration: spec.fail_enumeration,
        })
    }

    pub fn snapshot(&self) -> Vec<TabSnapshot> {
        self.tabs
            .lock()
            .iter()
            .map(|tab| TabSnapshot {
                id: tab.id.clone(),
                address: tab.address.clone(),
                saved: tab.checked,
                removed: tab.removed,
                refreshes: tab.loads,
                clicks: tab.clicks,
            })
            .collect()
    }

    /// Run `f` against the live tab with this id.
    pub(crate) fn with_tab<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut TabState) -> T,
    ) -> Option<T> {
        let mut tabs = self.tabs.lock();
        tabs.iter_mut()
            .find(|tab| tab.id == id && !tab.removed)
            .map(f)
    }
}
