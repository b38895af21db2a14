//! Application configuration
//!
//! Loaded from YAML; every section falls back to its defaults when absent.

use std::path::PathBuf;

use action_gate::{TimingPolicy, DEFAULT_OPTION_LABEL};
use serde::{Deserialize, Serialize};
use watchlater_scheduler::{NonActionablePolicy, DEFAULT_DOMAIN_FILTER};

pub const ENV_SESSION: &str = "WATCHLATER_SESSION";
pub const ENV_MAX_ATTEMPTS: &str = "WATCHLATER_MAX_ATTEMPTS";
pub const ENV_FAST: &str = "WATCHLATER_FAST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Regex an address must match to become a candidate.
    pub domain_filter: String,
    /// Label of the toggle inside the save dialog.
    pub option_label: String,
    pub timing: TimingPolicy,
    pub policy: PolicyConfig,
    /// Simulated browser session to drive.
    pub session: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub close_on_success: bool,
    pub non_actionable: NonActionablePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain_filter: DEFAULT_DOMAIN_FILTER.to_string(),
            option_label: DEFAULT_OPTION_LABEL.to_string(),
            timing: TimingPolicy::default(),
            policy: PolicyConfig::default(),
            session: None,
        }
    }
}

impl Config {
    /// Apply `WATCHLATER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();

        if let Some(path) = lookup(ENV_SESSION).filter(|v| !v.trim().is_empty()) {
            self.session = Some(PathBuf::from(path));
            applied.push(ENV_SESSION.to_string());
        }

        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            if let Ok(max) = raw.trim().parse::<u32>() {
                self.timing.max_attempts = max;
                applied.push(ENV_MAX_ATTEMPTS.to_string());
            }
        }

        if lookup(ENV_FAST)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
        {
            let max_attempts = self.timing.max_attempts;
            let max_escalations = self.timing.max_escalations;
            self.timing = TimingPolicy::immediate()
                .with_max_attempts(max_attempts)
                .with_max_escalations(max_escalations);
            applied.push(ENV_FAST.to_string());
        }

        applied
    }

    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}
