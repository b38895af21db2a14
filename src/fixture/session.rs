use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use watchlater_core_types::ToggleVia;

/// Description of a browser window: its tabs and how each tab's save dialog
/// behaves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSpec {
    pub tabs: Vec<TabSpec>,
    /// Every enumeration fails.
    pub fail_enumeration: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSpec {
    /// Defaults to `tab-<n>` (1-based position).
    #[serde(default)]
    pub id: Option<String>,
    pub address: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub behaviour: TabBehaviour,
}

/// Scripted dialog behaviour for one tab. The default is a tab that saves on
/// the first click.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabBehaviour {
    /// Page loads (refreshes) needed before the player region exists.
    pub structural_until_refresh: u32,
    /// Opens that find the region but no rendered dialog yet.
    pub transient_opens: u32,
    /// Paths that render a dialog. Empty means every applicable path.
    pub paths: Vec<ToggleVia>,
    /// Option lookups that come back empty before the option shows up.
    pub option_missing: u32,
    /// Item is already in the list.
    pub already_saved: bool,
    /// Clicks that are swallowed before one sticks.
    pub stubborn_clicks: u32,
    /// No click ever sticks.
    pub never_sticks: bool,
    /// Step at which the page-side script throws.
    pub fault: Option<FaultPoint>,
    pub remove_fails: bool,
    pub refresh_fails: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPoint {
    Open,
    FindOption,
    Toggle,
    Dismiss,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("duplicate tab id '{0}'")]
    DuplicateId(String),
    #[error("tab {0} has an empty address")]
    EmptyAddress(usize),
    #[error("tabs '{0}' and '{1}' are both active; a window has one focused tab")]
    MultipleActive(String, String),
}

impl SessionSpec {
    /// Load from YAML, or JSON when the file ends in `.json`.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        let spec = Self::parse(&raw, is_json(path))
            .with_context(|| format!("failed to parse session file {}", path.display()))?;
        spec.validate()
            .with_context(|| format!("invalid session file {}", path.display()))?;
        Ok(spec)
    }

    pub fn parse(raw: &str, json: bool) -> Result<Self> {
        let spec = if json {
            serde_json::from_str(raw)?
        } else {
            serde_yaml::from_str(raw)?
        };
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        let mut seen = HashSet::new();
        let mut active: Option<String> = None;
        for (index, tab) in self.tabs.iter().enumerate() {
            if tab.address.trim().is_empty() {
                return Err(SessionError::EmptyAddress(index + 1));
            }
            let id = tab.resolved_id(index);
            if !seen.insert(id.clone()) {
                return Err(SessionError::DuplicateId(id));
            }
            if tab.active {
                if let Some(first) = active.take() {
                    return Err(SessionError::MultipleActive(first, id));
                }
                active = Some(id);
            }
        }
        Ok(())
    }
}

impl TabSpec {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_behaviour(mut self, behaviour: TabBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn resolved_id(&self, index: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("tab-{}", index + 1))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
