use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::GateError;

/// Settle times and bounds for the verified toggle.
///
/// Every `delay_*` value is the time given to the remote interface to settle
/// after one UI transition. They are policy, not measured truths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPolicy {
    /// After the surface first opens, before looking for the option.
    pub delay_open_ms: u64,
    /// After toggling, so the remote state can commit.
    pub delay_click_ms: u64,
    /// After dismissing the surface.
    pub delay_close_ms: u64,
    /// After reopening, before the verifying read.
    pub delay_reopen_ms: u64,
    /// After a full target refresh.
    pub delay_reload_ms: u64,
    /// Between a failed step and the next attempt.
    pub retry_backoff_ms: u64,
    /// After the final dismiss of an attempt.
    pub settle_ms: u64,
    /// Between two targets of a batch.
    pub cooldown_ms: u64,
    /// Upper bound on one open call; exceeding it counts as not yet rendered.
    pub open_timeout_ms: u64,
    /// Upper bound on every other collaborator call.
    pub control_timeout_ms: u64,
    pub max_attempts: u32,
    pub max_escalations: u32,
}

impl TimingPolicy {
    /// Same bounds with every settle delay removed.
    pub fn immediate() -> Self {
        Self {
            delay_open_ms: 0,
            delay_click_ms: 0,
            delay_close_ms: 0,
            delay_reopen_ms: 0,
            delay_reload_ms: 0,
            retry_backoff_ms: 0,
            settle_ms: 0,
            cooldown_ms: 0,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_escalations(mut self, max_escalations: u32) -> Self {
        self.max_escalations = max_escalations;
        self
    }

    pub fn validate(&self) -> Result<(), GateError> {
        if self.max_attempts == 0 {
            return Err(GateError::InvalidTiming(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.open_timeout_ms == 0 || self.control_timeout_ms == 0 {
            return Err(GateError::InvalidTiming(
                "open and control timeouts must be greater than 0".to_string(),
            ));
        }
        let longest_step = [
            self.delay_open_ms,
            self.delay_click_ms,
            self.delay_close_ms,
            self.delay_reopen_ms,
            self.retry_backoff_ms,
            self.settle_ms,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        if self.delay_reload_ms < longest_step {
            return Err(GateError::InvalidTiming(format!(
                "delay_reload_ms ({}) must not be shorter than any per-attempt delay ({})",
                self.delay_reload_ms, longest_step
            )));
        }
        Ok(())
    }

    pub fn delay_open(&self) -> Duration {
        Duration::from_millis(self.delay_open_ms)
    }

    pub fn delay_click(&self) -> Duration {
        Duration::from_millis(self.delay_click_ms)
    }

    pub fn delay_close(&self) -> Duration {
        Duration::from_millis(self.delay_close_ms)
    }

    pub fn delay_reopen(&self) -> Duration {
        Duration::from_millis(self.delay_reopen_ms)
    }

    pub fn delay_reload(&self) -> Duration {
        Duration::from_millis(self.delay_reload_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    pub fn control_timeout(&self) -> Duration {
        Duration::from_millis(self.control_timeout_ms)
    }
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            delay_open_ms: 2474,
            delay_click_ms: 2474,
            delay_close_ms: 2474,
            delay_reopen_ms: 4747,
            delay_reload_ms: 4747,
            retry_backoff_ms: 350,
            settle_ms: 220,
            cooldown_ms: 220,
            // region wait (9s) + dialog wait (7s)
            open_timeout_ms: 16_000,
            control_timeout_ms: 5_000,
            max_attempts: 7,
            max_escalations: 3,
        }
    }
}

/// Sleep unless the delay is zero.
pub async fn settle_for(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
